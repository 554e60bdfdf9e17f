//! Repository för listfärger

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{lock, ColourCache};
use crate::models::ListColour;

/// Listfärger med en processlokal cache.
///
/// Cachen fylls från databasen vid första åtkomst och uppdateras sedan
/// bara av anrop via detta lager. Lås tas alltid i ordningen cache,
/// sedan anslutning.
pub struct ListColourStore {
    conn: Arc<Mutex<Connection>>,
    cache: ColourCache,
}

impl ListColourStore {
    pub fn new(conn: Arc<Mutex<Connection>>, cache: ColourCache) -> Self {
        Self { conn, cache }
    }

    /// Hämta färgen för en lista.
    ///
    /// Saknas en post sparas och returneras standardfärgen, så anropet är
    /// inte rent läsande första gången.
    pub fn get_colour(&self, list_name: &str) -> Result<ListColour> {
        self.with_cache(|conn, colours| {
            if let Some(colour) = colours.get(list_name) {
                return Ok(*colour);
            }

            let colour = ListColour::default();
            upsert(conn, list_name, colour)?;
            colours.insert(list_name.to_string(), colour);

            debug!("Standardfärg {} sparad för '{}'", colour, list_name);
            Ok(colour)
        })
    }

    /// Sätt färgen för en lista (skapar posten om den saknas)
    pub fn set_colour(&self, list_name: &str, colour: ListColour) -> Result<()> {
        self.with_cache(|conn, colours| {
            upsert(conn, list_name, colour)?;
            colours.insert(list_name.to_string(), colour);
            Ok(())
        })
    }

    /// Ta bort färgposten för en lista (skiftlägesokänsligt, som listnamn).
    /// Returnerar antal borttagna rader.
    pub fn remove_colour(&self, list_name: &str) -> Result<usize> {
        self.with_cache(|conn, colours| {
            let rows = delete_colour_rows(conn, list_name)?;
            forget_cached(colours, list_name);
            Ok(rows)
        })
    }

    /// Flytta färgposten till ett nytt listnamn. Har listan ingen post
    /// händer ingenting.
    pub fn rename_colour(&self, old_name: &str, new_name: &str) -> Result<Option<ListColour>> {
        self.with_cache(|conn, colours| {
            let moved = move_colour_row(conn, old_name, new_name)?;
            if let Some(colour) = moved {
                forget_cached(colours, old_name);
                colours.insert(new_name.to_string(), colour);
            }
            Ok(moved)
        })
    }

    /// Alla sparade färger
    pub fn all(&self) -> Result<HashMap<String, ListColour>> {
        self.with_cache(|_, colours| Ok(colours.clone()))
    }

    fn with_cache<T>(
        &self,
        f: impl FnOnce(&Connection, &mut HashMap<String, ListColour>) -> Result<T>,
    ) -> Result<T> {
        let mut cache = lock(&self.cache)?;
        let conn = lock(&self.conn)?;

        if cache.is_none() {
            let loaded = load_all(&conn)?;
            info!("Läste in {} listfärger", loaded.len());
            *cache = Some(loaded);
        }

        let colours = cache.get_or_insert_with(HashMap::new);
        f(&conn, colours)
    }
}

fn load_all(conn: &Connection) -> Result<HashMap<String, ListColour>> {
    let mut stmt = conn.prepare(r#"SELECT "ListName", "Colour" FROM "ListColour.Table""#)?;

    let colours = stmt
        .query_map([], |row| {
            let name: String = row.get(0)?;
            let colour: Option<String> = row.get(1)?;
            Ok((name, ListColour::from_db_str(colour.as_deref().unwrap_or_default())))
        })?
        .collect::<rusqlite::Result<HashMap<_, _>>>()?;

    Ok(colours)
}

/// Ta bort alla färgposter vars namn matchar `list_name` utan hänsyn
/// till skiftläge, precis som tabellnamn jämförs
pub(super) fn delete_colour_rows(conn: &Connection, list_name: &str) -> Result<usize> {
    let rows = conn.execute(
        r#"DELETE FROM "ListColour.Table" WHERE "ListName" = ?1 COLLATE NOCASE"#,
        [list_name],
    )?;
    Ok(rows)
}

/// Flytta färgposten för `old_name` till `new_name` och returnera färgen
pub(super) fn move_colour_row(
    conn: &Connection,
    old_name: &str,
    new_name: &str,
) -> Result<Option<ListColour>> {
    let stored: Option<Option<String>> = conn
        .query_row(
            r#"SELECT "Colour" FROM "ListColour.Table" WHERE "ListName" = ?1 COLLATE NOCASE LIMIT 1"#,
            [old_name],
            |row| row.get(0),
        )
        .optional()?;

    let Some(stored) = stored else {
        return Ok(None);
    };

    let colour = ListColour::from_db_str(stored.as_deref().unwrap_or_default());
    delete_colour_rows(conn, old_name)?;
    upsert(conn, new_name, colour)?;
    Ok(Some(colour))
}

/// Glöm cachade poster för `list_name` (skiftlägesokänsligt)
pub(super) fn forget_cached(colours: &mut HashMap<String, ListColour>, list_name: &str) {
    colours.retain(|name, _| !name.eq_ignore_ascii_case(list_name));
}

fn upsert(conn: &Connection, list_name: &str, colour: ListColour) -> Result<()> {
    conn.execute(
        r#"INSERT INTO "ListColour.Table" ("ListName", "Colour") VALUES (?1, ?2)
           ON CONFLICT("ListName") DO UPDATE SET "Colour" = excluded."Colour""#,
        params![list_name, colour.as_str()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn row_count(db: &Database) -> i64 {
        db.with_connection(|conn| {
            Ok(conn.query_row(r#"SELECT COUNT(*) FROM "ListColour.Table""#, [], |row| row.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn test_get_colour_persists_default_once() {
        let db = Database::open_in_memory().unwrap();
        let colours = db.colours();

        assert_eq!(colours.get_colour("Work").unwrap(), ListColour::Yellow);
        assert_eq!(row_count(&db), 1);

        // Ändra bakom cachens rygg: andra anropet ska varken läsa eller skriva
        db.with_connection(|conn| {
            conn.execute(r#"UPDATE "ListColour.Table" SET "Colour" = 'Green'"#, [])?;
            Ok(())
        })
        .unwrap();

        assert_eq!(colours.get_colour("Work").unwrap(), ListColour::Yellow);
        assert_eq!(row_count(&db), 1);
    }

    #[test]
    fn test_set_colour_upserts() {
        let db = Database::open_in_memory().unwrap();
        let colours = db.colours();

        colours.set_colour("Home", ListColour::Pink).unwrap();
        colours.set_colour("Home", ListColour::Blue).unwrap();

        assert_eq!(colours.get_colour("Home").unwrap(), ListColour::Blue);
        assert_eq!(row_count(&db), 1);
    }

    #[test]
    fn test_cache_is_loaded_from_storage() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute(
                r#"INSERT INTO "ListColour.Table" VALUES ('Work', 'Beige'), ('Home', 'Okänd')"#,
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let colours = db.colours();
        assert_eq!(colours.get_colour("Work").unwrap(), ListColour::Beige);
        assert_eq!(colours.get_colour("Home").unwrap(), ListColour::Yellow);
        assert_eq!(colours.all().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_colour() {
        let db = Database::open_in_memory().unwrap();
        let colours = db.colours();
        colours.set_colour("Work", ListColour::Green).unwrap();

        assert_eq!(colours.remove_colour("Work").unwrap(), 1);
        assert_eq!(row_count(&db), 0);
        assert!(colours.all().unwrap().is_empty());

        // Nästa läsning ger standardfärgen igen
        assert_eq!(colours.get_colour("Work").unwrap(), ListColour::Yellow);
    }

    #[test]
    fn test_rename_colour() {
        let db = Database::open_in_memory().unwrap();
        let colours = db.colours();
        colours.set_colour("Foo", ListColour::Green).unwrap();

        assert_eq!(
            colours.rename_colour("Foo", "foo").unwrap(),
            Some(ListColour::Green)
        );

        let all = colours.all().unwrap();
        assert_eq!(all.get("foo"), Some(&ListColour::Green));
        assert!(!all.contains_key("Foo"));
        assert_eq!(row_count(&db), 1);

        assert_eq!(colours.rename_colour("Saknas", "Ny").unwrap(), None);
    }

    #[test]
    fn test_remove_and_rename_ignore_case() {
        let db = Database::open_in_memory().unwrap();
        let colours = db.colours();
        colours.set_colour("Work", ListColour::Pink).unwrap();
        colours.set_colour("Home", ListColour::Blue).unwrap();

        assert_eq!(colours.remove_colour("work").unwrap(), 1);
        assert_eq!(
            colours.rename_colour("HOME", "Hemma").unwrap(),
            Some(ListColour::Blue)
        );

        let all = colours.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get("Hemma"), Some(&ListColour::Blue));
        assert_eq!(row_count(&db), 1);
    }

    #[test]
    fn test_cache_shared_between_handles() {
        let db = Database::open_in_memory().unwrap();
        db.colours().set_colour("Work", ListColour::Blue).unwrap();

        assert_eq!(db.clone().colours().get_colour("Work").unwrap(), ListColour::Blue);
    }
}
