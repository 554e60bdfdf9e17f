//! Samlad åtkomstpunkt för listor, uppgifter, färger och inställningar

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::db::Database;
use crate::models::{
    is_combined_list, AppConfig, GeneralOptions, ListColour, SortCriterion, Task,
};

/// Påverkade rader för en lyckad enradsändring
const SINGLE_ROW_UPDATED: usize = 1;

/// Fasad över lagringen. Skapas en gång vid start och skickas vidare
/// till de delar som behöver den.
#[derive(Clone)]
pub struct TaskRepository {
    db: Database,
    default_tone: String,
}

impl TaskRepository {
    pub fn new(db: Database, config: &AppConfig) -> Self {
        Self {
            db,
            default_tone: config.default_notification_tone.clone(),
        }
    }

    /// Öppna databasen som konfigurationen pekar ut
    pub fn open(config: &AppConfig) -> Result<Self> {
        let db = Database::open(&config.database_path())?;
        Ok(Self::new(db, config))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ------------------------------------------------------------
    // Listor
    // ------------------------------------------------------------

    pub fn list_names(&self) -> Result<Vec<String>> {
        self.db.tasks().list_tables()
    }

    pub fn create_list(&self, name: &str) -> Result<bool> {
        self.db.tasks().create_list(name)?;
        Ok(true)
    }

    /// Byt namn på en lista; färgen följer med i samma transaktion
    pub fn rename_list(&self, old_name: &str, new_name: &str) -> Result<bool> {
        self.db.tasks().rename_list(old_name, new_name)?;
        Ok(true)
    }

    /// Ta bort en lista med alla uppgifter och dess färg
    pub fn delete_list(&self, name: &str) -> Result<bool> {
        self.db.tasks().delete_list(name)?;
        Ok(true)
    }

    // ------------------------------------------------------------
    // Uppgifter
    // ------------------------------------------------------------

    pub fn tasks(&self, list_names: &[&str], sort_order: &[SortCriterion]) -> Result<Vec<Task>> {
        self.db.tasks().find_tasks(list_names, sort_order)
    }

    /// Uppgifter för en lista; den kombinerade listan ger alla listor
    pub fn tasks_for_list(&self, list_name: &str, sort_order: &[SortCriterion]) -> Result<Vec<Task>> {
        if is_combined_list(list_name) {
            let names = self.list_names()?;
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            return self.tasks(&refs, sort_order);
        }

        self.tasks(&[list_name], sort_order)
    }

    pub fn task(&self, list_name: &str, id: i64) -> Result<Option<Task>> {
        self.db.tasks().find_task(list_name, id)
    }

    pub fn save_task(&self, task: &mut Task) -> Result<bool> {
        Ok(self.db.tasks().save(task)? == SINGLE_ROW_UPDATED)
    }

    pub fn delete_task(&self, list_name: &str, id: i64) -> Result<bool> {
        Ok(self.db.tasks().delete(list_name, id)? == SINGLE_ROW_UPDATED)
    }

    /// Flytta en uppgift till en annan lista. Uppgiften får ett nytt ID.
    pub fn move_task(&self, task: &mut Task, to_list: &str) -> Result<bool> {
        Ok(self.db.tasks().move_task(task, to_list)? == SINGLE_ROW_UPDATED)
    }

    /// Kopiera en uppgift till en lista och returnera kopian
    pub fn copy_task(&self, task: &Task, to_list: &str) -> Result<Task> {
        let mut copy = task.copy_to(to_list);
        self.db.tasks().save(&mut copy)?;
        Ok(copy)
    }

    /// Alla uppgifter i alla listor som väntar på en notifiering
    pub fn notification_tasks(&self) -> Result<Vec<Task>> {
        let tasks = self.tasks_for_list(crate::models::COMBINED_LIST_NAME, &[])?;
        Ok(tasks.into_iter().filter(|t| t.notification_required).collect())
    }

    /// Kvittera en notifiering: flaggan tas bort och klockslaget nollställs.
    /// Returnerar `None` om uppgiften inte finns.
    pub fn acknowledge_notification(&self, list_name: &str, id: i64) -> Result<Option<Task>> {
        let Some(mut task) = self.task(list_name, id)? else {
            return Ok(None);
        };

        if task.notification_required {
            task.clear_notification();
            self.save_task(&mut task)?;
            info!("Notifiering kvitterad för uppgift {} i '{}'", id, list_name);
        }

        Ok(Some(task))
    }

    /// Förfallna uppgifter i en lista (eller alla listor)
    pub fn overdue_tasks(&self, list_name: &str, today: NaiveDate) -> Result<Vec<Task>> {
        let tasks = self.tasks_for_list(list_name, &[SortCriterion::DueDate])?;
        Ok(tasks.into_iter().filter(|t| t.is_overdue(today)).collect())
    }

    // ------------------------------------------------------------
    // Färger
    // ------------------------------------------------------------

    /// Färgen för en lista; saknas den sparas standardfärgen
    pub fn colour(&self, list_name: &str) -> Result<ListColour> {
        self.db.colours().get_colour(list_name)
    }

    pub fn set_colour(&self, list_name: &str, colour: ListColour) -> Result<()> {
        self.db.colours().set_colour(list_name, colour)
    }

    pub fn remove_colour(&self, list_name: &str) -> Result<bool> {
        Ok(self.db.colours().remove_colour(list_name)? == SINGLE_ROW_UPDATED)
    }

    pub fn colours(&self) -> Result<HashMap<String, ListColour>> {
        self.db.colours().all()
    }

    // ------------------------------------------------------------
    // Inställningar
    // ------------------------------------------------------------

    pub fn options(&self) -> Result<GeneralOptions> {
        self.db.options().get_or_init(&self.default_tone)
    }

    pub fn set_options(&self, options: &GeneralOptions) -> Result<()> {
        self.db.options().save(options)
    }
}
