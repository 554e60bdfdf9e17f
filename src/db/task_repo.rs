//! Lagring av uppgiftslistor: en tabell per lista

use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use super::colour_repo::{delete_colour_rows, forget_cached, move_colour_row};
use super::{lock, ColourCache};
use super::schema::{create_task_table_sql, is_reserved_table, quote_ident, TASK_COLUMNS};
use crate::models::{is_combined_list, SortCriterion, Task};
use crate::utils::date::{
    decode_due_date, decode_modified_date, encode_due_date, encode_modified_date,
};
use crate::utils::AppError;

pub struct TaskStore {
    conn: Arc<Mutex<Connection>>,
    colour_cache: ColourCache,
}

impl TaskStore {
    pub fn new(conn: Arc<Mutex<Connection>>, colour_cache: ColourCache) -> Self {
        Self { conn, colour_cache }
    }

    /// Skapa en ny tom lista. Namnet måste vara unikt (skiftlägesokänsligt).
    pub fn create_list(&self, name: &str) -> Result<()> {
        validate_list_name(name)?;

        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        if list_exists(&tx, name)? {
            return Err(AppError::already_exists(format!("Listan '{}'", name)).into());
        }

        tx.execute(&create_task_table_sql(name), [])?;
        tx.commit()?;

        info!("Skapade lista '{}'", name);
        Ok(())
    }

    /// Byt namn på en lista och flytta med dess färg.
    ///
    /// SQLite jämför tabellnamn utan hänsyn till skiftläge, så ett byte som
    /// bara ändrar skiftläge går via ett temporärt namn. Tabell och färg
    /// ändras i samma transaktion.
    pub fn rename_list(&self, old_name: &str, new_name: &str) -> Result<()> {
        validate_existing_name(old_name)?;
        validate_list_name(new_name)?;

        if old_name == new_name {
            return Ok(());
        }

        let mut cache = lock(&self.colour_cache)?;
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        let Some(stored_name) = stored_list_name(&tx, old_name)? else {
            return Err(AppError::not_found(format!("Listan '{}'", old_name)).into());
        };

        let case_only = stored_name.eq_ignore_ascii_case(new_name);
        if !case_only && list_exists(&tx, new_name)? {
            return Err(AppError::already_exists(format!("Listan '{}'", new_name)).into());
        }

        if case_only {
            let temp_name = temporary_name(&tx, &stored_name)?;
            debug!("Byter namn via temporärt namn '{}'", temp_name);
            rename_table(&tx, &stored_name, &temp_name)?;
            rename_table(&tx, &temp_name, new_name)?;
        } else {
            rename_table(&tx, &stored_name, new_name)?;
        }

        let colour = move_colour_row(&tx, &stored_name, new_name)?;
        tx.commit()?;

        if let (Some(colours), Some(colour)) = (cache.as_mut(), colour) {
            forget_cached(colours, &stored_name);
            colours.insert(new_name.to_string(), colour);
        }

        info!("Bytte namn på lista '{}' till '{}'", stored_name, new_name);
        Ok(())
    }

    /// Ta bort en lista, alla dess uppgifter och dess färg
    pub fn delete_list(&self, name: &str) -> Result<()> {
        validate_existing_name(name)?;

        let mut cache = lock(&self.colour_cache)?;
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        let Some(stored_name) = stored_list_name(&tx, name)? else {
            return Err(AppError::not_found(format!("Listan '{}'", name)).into());
        };

        tx.execute(&format!("DROP TABLE {}", quote_ident(&stored_name)), [])?;
        delete_colour_rows(&tx, &stored_name)?;
        tx.commit()?;

        if let Some(colours) = cache.as_mut() {
            forget_cached(colours, &stored_name);
        }

        info!("Tog bort lista '{}'", stored_name);
        Ok(())
    }

    /// Namnen på alla listor, utan systemtabeller
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .filter(|name| !is_reserved_table(name))
            .collect();

        Ok(names)
    }

    /// Kontrollera om en lista finns (skiftlägesokänsligt)
    pub fn exists(&self, name: &str) -> Result<bool> {
        let conn = lock(&self.conn)?;
        list_exists(&conn, name)
    }

    /// Hämta uppgifter från en eller flera listor.
    ///
    /// Resultaten slås ihop med UNION ALL och märks med källistans namn.
    /// Sorteringen följer kriterierna i ordning; första kriteriet är
    /// primär nyckel. En tom namnlista ger ett tomt resultat utan fråga.
    pub fn find_tasks(&self, list_names: &[&str], sort_order: &[SortCriterion]) -> Result<Vec<Task>> {
        let mut names: Vec<&str> = Vec::with_capacity(list_names.len());
        for &name in list_names {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name);
            }
        }

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = build_select(&names, sort_order);
        debug!("Hämtar uppgifter: {}", sql);

        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&sql)?;

        let tasks = stmt
            .query_map(params_from_iter(names.iter()), Self::row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tasks)
    }

    /// Hämta en uppgift via ID
    pub fn find_task(&self, list_name: &str, id: i64) -> Result<Option<Task>> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "SELECT {}, ?1 AS \"table_name\" FROM {} WHERE \"Identity\" = ?2",
            TASK_COLUMNS,
            quote_ident(list_name)
        );

        let task = conn
            .query_row(&sql, params![list_name, id], Self::row_to_task)
            .optional()?;

        Ok(task)
    }

    /// Spara en uppgift i listan `task.list_name`.
    ///
    /// En ny uppgift (utan ID) läggs in och får sitt tilldelade ID;
    /// annars uppdateras raden. Returnerar antal påverkade rader.
    pub fn save(&self, task: &mut Task) -> Result<usize> {
        let conn = lock(&self.conn)?;
        save_task(&conn, task)
    }

    /// Ta bort en uppgift. Returnerar antal borttagna rader.
    pub fn delete(&self, list_name: &str, id: i64) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute(
            &format!("DELETE FROM {} WHERE \"Identity\" = ?1", quote_ident(list_name)),
            [id],
        )?;

        debug!("Tog bort uppgift {} från '{}' ({} rader)", id, list_name, rows);
        Ok(rows)
    }

    /// Flytta en uppgift till en annan lista (borttag + infogning i en transaktion)
    pub fn move_task(&self, task: &mut Task, to_list: &str) -> Result<usize> {
        let id = task
            .id
            .ok_or_else(|| AppError::validation("Uppgiften har inget ID"))?;

        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        let removed = tx.execute(
            &format!("DELETE FROM {} WHERE \"Identity\" = ?1", quote_ident(&task.list_name)),
            [id],
        )?;
        if removed == 0 {
            return Err(AppError::not_found(format!(
                "Uppgift {} i listan '{}'",
                id, task.list_name
            ))
            .into());
        }

        let mut moved = task.copy_to(to_list);
        let rows = save_task(&tx, &mut moved)?;
        tx.commit()?;

        info!(
            "Flyttade uppgift {} från '{}' till '{}'",
            id, task.list_name, to_list
        );
        *task = moved;
        Ok(rows)
    }

    fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        let list_name: String = row.get(8)?;
        let due_raw: Option<String> = row.get(6)?;
        let due_raw = due_raw.unwrap_or_default();

        let due_date = match decode_due_date(&due_raw) {
            Ok(due) => due,
            Err(e) => {
                warn!("{} i listan '{}', behandlas som inget förfallodatum", e, list_name);
                None
            }
        };

        let modified_raw: Option<String> = row.get(7)?;

        Ok(Task {
            id: Some(row.get(0)?),
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            notes: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            done: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
            notification_required: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
            priority: row.get::<_, Option<i32>>(5)?.unwrap_or(0),
            due_date,
            modified_date: modified_raw.as_deref().and_then(decode_modified_date),
            list_name,
        })
    }
}

/// Validera ett namn för en ny eller omdöpt lista
pub fn validate_list_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Listnamnet får inte vara tomt"));
    }
    if is_combined_list(name) {
        return Err(AppError::validation(format!("'{}' är reserverat", name)));
    }
    if is_reserved_table(name) {
        return Err(AppError::validation(format!("'{}' är en systemtabell", name)));
    }
    Ok(())
}

/// Validera namnet på en lista som redan ska finnas
fn validate_existing_name(name: &str) -> Result<(), AppError> {
    if is_combined_list(name) {
        return Err(AppError::validation(format!("'{}' är ingen lagrad lista", name)));
    }
    if is_reserved_table(name) {
        return Err(AppError::validation(format!("'{}' är en systemtabell", name)));
    }
    Ok(())
}

/// Tabellens namn som det är lagrat, sökt utan hänsyn till skiftläge
fn stored_list_name(conn: &Connection, name: &str) -> Result<Option<String>> {
    let stored = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(stored)
}

fn list_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn rename_table(conn: &Connection, from: &str, to: &str) -> Result<()> {
    conn.execute(
        &format!("ALTER TABLE {} RENAME TO {}", quote_ident(from), quote_ident(to)),
        [],
    )?;
    Ok(())
}

/// Hitta ett ledigt temporärt tabellnamn
fn temporary_name(conn: &Connection, base: &str) -> Result<String> {
    let mut counter = 1;
    loop {
        let candidate = format!("{}.rename{}", base, counter);
        if !list_exists(conn, &candidate)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

fn save_task(conn: &Connection, task: &mut Task) -> Result<usize> {
    if task.list_name.trim().is_empty() {
        return Err(AppError::validation("Uppgiften saknar lista").into());
    }

    let table = quote_ident(&task.list_name);
    let due_date = encode_due_date(task.due_date);
    let modified_date = encode_modified_date(task.modified_date);

    let rows = match task.id {
        Some(id) => conn.execute(
            &format!(
                "UPDATE {} SET \"Name\" = ?1, \"Notes\" = ?2, \"Done\" = ?3, \"NotificationRequired\" = ?4,
                 \"Priority\" = ?5, \"DueDate\" = ?6, \"ModifiedDate\" = ?7
                 WHERE \"Identity\" = ?8",
                table
            ),
            params![
                task.name,
                task.notes,
                task.done,
                task.notification_required,
                task.priority,
                due_date,
                modified_date,
                id,
            ],
        )?,
        None => {
            let rows = conn.execute(
                &format!(
                    "INSERT INTO {} (\"Name\", \"Notes\", \"Done\", \"NotificationRequired\", \"Priority\", \"DueDate\", \"ModifiedDate\")
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    table
                ),
                params![
                    task.name,
                    task.notes,
                    task.done,
                    task.notification_required,
                    task.priority,
                    due_date,
                    modified_date,
                ],
            )?;

            // Samma lås hålls, så ingen annan kan ha skrivit emellan
            task.id = Some(conn.last_insert_rowid());
            rows
        }
    };

    debug!("Sparade uppgift {:?} i '{}'", task.id, task.list_name);
    Ok(rows)
}

fn build_select(list_names: &[&str], sort_order: &[SortCriterion]) -> String {
    let mut sql = list_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                "SELECT {}, ?{} AS \"table_name\" FROM {}",
                TASK_COLUMNS,
                i + 1,
                quote_ident(name)
            )
        })
        .collect::<Vec<_>>()
        .join(" UNION ALL ");

    sql.push_str(&order_by_clause(sort_order));
    sql
}

/// ORDER BY-klausul för sorteringskriterierna (tom om inga kriterier)
pub fn order_by_clause(sort_order: &[SortCriterion]) -> String {
    if sort_order.is_empty() {
        return String::new();
    }

    let terms: Vec<&str> = sort_order.iter().map(|c| c.order_by()).collect();
    format!(" ORDER BY {}", terms.join(", "))
}
