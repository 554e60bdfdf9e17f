use anyhow::Result;
use rusqlite::{params, Connection};
use tracing::info;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::models::GeneralOptions;

pub struct OptionsStore {
    conn: Arc<Mutex<Connection>>,
}

impl OptionsStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta inställningarna (skapar default om de inte finns).
    ///
    /// Ett tomt ljudnamn ersätts också med `default_tone`. Kontroll och
    /// sådd sker i samma transaktion, så en samtidig `save` skrivs aldrig över.
    pub fn get_or_init(&self, default_tone: &str) -> Result<GeneralOptions> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        let seeded = tx.execute(
            r#"INSERT INTO "Options.Table" ("Id", "ToneName", "Overdue") VALUES (1, ?1, 0)
               ON CONFLICT("Id") DO NOTHING"#,
            [default_tone],
        )?;
        let repaired = tx.execute(
            r#"UPDATE "Options.Table" SET "ToneName" = ?1 WHERE "Id" = 1 AND "ToneName" = ''"#,
            [default_tone],
        )?;

        let options = tx.query_row(
            r#"SELECT "ToneName", "Overdue" FROM "Options.Table" WHERE "Id" = 1"#,
            [],
            |row| Ok(GeneralOptions::new(row.get::<_, String>(0)?, row.get::<_, bool>(1)?)),
        )?;
        tx.commit()?;

        if seeded + repaired > 0 {
            info!("Skapade standardinställningar (ljud '{}')", default_tone);
        }
        Ok(options)
    }

    /// Spara inställningarna (singleton-rad, Id = 1)
    pub fn save(&self, options: &GeneralOptions) -> Result<()> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"INSERT INTO "Options.Table" ("Id", "ToneName", "Overdue") VALUES (1, ?1, ?2)
               ON CONFLICT("Id") DO UPDATE SET "ToneName" = excluded."ToneName", "Overdue" = excluded."Overdue""#,
            params![options.notification_tone, options.highlight_overdue_tasks],
        )?;

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn row_count(db: &Database) -> i64 {
        db.with_connection(|conn| {
            Ok(conn.query_row(r#"SELECT COUNT(*) FROM "Options.Table""#, [], |row| row.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn test_get_creates_default() {
        let db = Database::open_in_memory().unwrap();
        let store = db.options();

        let options = store.get_or_init("ding").unwrap();

        assert_eq!(options, GeneralOptions::new("ding", false));
        assert_eq!(row_count(&db), 1);
    }

    #[test]
    fn test_save_and_get() {
        let db = Database::open_in_memory().unwrap();
        let store = db.options();

        store.save(&GeneralOptions::new("chime", true)).unwrap();
        store.save(&GeneralOptions::new("bell", true)).unwrap();

        let loaded = store.get_or_init("ding").unwrap();
        assert_eq!(loaded, GeneralOptions::new("bell", true));
        assert_eq!(row_count(&db), 1);
    }

    #[test]
    fn test_empty_tone_is_replaced() {
        let db = Database::open_in_memory().unwrap();
        let store = db.options();
        store.save(&GeneralOptions::new("", true)).unwrap();

        let loaded = store.get_or_init("ding").unwrap();
        assert_eq!(loaded, GeneralOptions::new("ding", true));
    }

    #[test]
    fn test_get_never_overwrites_saved_options() {
        let db = Database::open_in_memory().unwrap();
        let reader = db.options();
        let writer = db.clone().options();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = db.clone().options();
                std::thread::spawn(move || {
                    if i == 3 {
                        store.save(&GeneralOptions::new("bell", true)).unwrap();
                    } else {
                        store.get_or_init("ding").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Sparade värden vinner alltid över sådden, oavsett ordning
        assert_eq!(reader.get_or_init("ding").unwrap(), GeneralOptions::new("bell", true));

        writer.save(&GeneralOptions::new("chime", false)).unwrap();
        assert_eq!(reader.get_or_init("ding").unwrap(), GeneralOptions::new("chime", false));
        assert_eq!(row_count(&db), 1);
    }
}
