use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use super::schema::{
    CREATE_LIST_COLOUR_TABLE, CREATE_MIGRATIONS_TABLE, CREATE_TABLES, OPTIONS_TABLE,
    SCHEMA_VERSION,
};

/// Kör alla nödvändiga migrationer
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_current_version(conn)?;

    if current_version == 0 {
        // Ny databas - skapa allt
        info!("Skapar ny databas med schema version {}", SCHEMA_VERSION);
        initial_setup(conn)?;
    } else if current_version < SCHEMA_VERSION {
        // Uppdatera befintlig databas
        info!(
            "Migrerar databas från version {} till {}",
            current_version, SCHEMA_VERSION
        );
        migrate_from(conn, current_version)?;
    } else {
        info!("Databas är uppdaterad (version {})", current_version);
    }

    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn get_current_version(conn: &Connection) -> Result<i32> {
    if !table_exists(conn, "schema_migrations")? {
        // Databaser från före versionstabellen har en inställningstabell
        // i det gamla formatet (ToneName som primärnyckel)
        if table_exists(conn, OPTIONS_TABLE)? {
            return Ok(1);
        }
        return Ok(0);
    }

    // Hämta senaste version
    let version: Option<i32> = conn
        .query_row::<Option<i32>, _, _>(
            "SELECT MAX(version) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .ok()
        .flatten();

    Ok(version.unwrap_or(0))
}

fn initial_setup(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(CREATE_TABLES)?;

    tx.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;
    tx.commit()?;

    info!("Initial setup klar");
    Ok(())
}

/// Kör migrationer stegvis. Varje steg och dess versionsrad skrivs i en
/// egen transaktion, så ett misslyckat steg lämnar databasen orörd.
fn migrate_from(conn: &Connection, from_version: i32) -> Result<()> {
    for version in (from_version + 1)..=SCHEMA_VERSION {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(CREATE_MIGRATIONS_TABLE)?;

        match version {
            2 => migrate_v1_to_v2(&tx)?,
            _ => {}
        }

        // Markera version som migrerad
        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )?;
        tx.commit()?;

        info!("Migrerade till version {}", version);
    }

    Ok(())
}

/// Migration v1 -> v2: Inställningstabellen blir en riktig singleton
///
/// Det gamla formatet hade ToneName som primärnyckel och skrevs om genom
/// att tabellen släpptes och skapades på nytt. Första raden behålls.
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    info!("Migration v2: Gör inställningstabellen till singleton");

    conn.execute_batch(CREATE_LIST_COLOUR_TABLE)?;
    conn.execute_batch(
        r#"
        ALTER TABLE "Options.Table" RENAME TO "Options.Table.old";
        CREATE TABLE "Options.Table" (
            "Id" INTEGER PRIMARY KEY CHECK ("Id" = 1),
            "ToneName" TEXT NOT NULL,
            "Overdue" INTEGER NOT NULL DEFAULT 0
        );
        INSERT INTO "Options.Table" ("Id", "ToneName", "Overdue")
            SELECT 1, COALESCE("ToneName", ''), COALESCE("Overdue", 0)
            FROM "Options.Table.old" LIMIT 1;
        DROP TABLE "Options.Table.old";
        "#,
    )?;

    Ok(())
}
