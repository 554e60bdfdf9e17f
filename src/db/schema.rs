/// SQL-schema för AutoNag
/// En tabell per uppgiftslista plus två systemtabeller i samma databasfil.

pub const SCHEMA_VERSION: i32 = 2;

/// Systemtabell för listfärger
pub const LIST_COLOUR_TABLE: &str = "ListColour.Table";

/// Systemtabell för globala inställningar
pub const OPTIONS_TABLE: &str = "Options.Table";

/// Versionstabell för migrationer
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

pub const CREATE_MIGRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

pub const CREATE_LIST_COLOUR_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "ListColour.Table" (
    "ListName" TEXT PRIMARY KEY ASC,
    "Colour" TEXT
);
"#;

pub const CREATE_TABLES: &str = r#"
-- Migrationer
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Listfärger (en rad per lista)
CREATE TABLE IF NOT EXISTS "ListColour.Table" (
    "ListName" TEXT PRIMARY KEY ASC,
    "Colour" TEXT
);

-- Globala inställningar (singleton, Id=1)
CREATE TABLE IF NOT EXISTS "Options.Table" (
    "Id" INTEGER PRIMARY KEY CHECK ("Id" = 1),
    "ToneName" TEXT NOT NULL,
    "Overdue" INTEGER NOT NULL DEFAULT 0
);
"#;

/// Kolumner i en listtabell, i lagringsordning
pub const TASK_COLUMNS: &str = r#""Identity", "Name", "Notes", "Done", "NotificationRequired", "Priority", "DueDate", "ModifiedDate""#;

/// CREATE TABLE för en ny lista
pub fn create_task_table_sql(list_name: &str) -> String {
    format!(
        "CREATE TABLE {} (
            \"Identity\" INTEGER PRIMARY KEY ASC,
            \"Name\" TEXT NOT NULL DEFAULT '',
            \"Notes\" TEXT NOT NULL DEFAULT '',
            \"Done\" INTEGER NOT NULL DEFAULT 0,
            \"NotificationRequired\" INTEGER NOT NULL DEFAULT 0,
            \"Priority\" INTEGER NOT NULL DEFAULT 0,
            \"DueDate\" TEXT,
            \"ModifiedDate\" TEXT
        )",
        quote_ident(list_name)
    )
}

/// Citera ett tabellnamn för SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Tabeller som inte är uppgiftslistor
pub fn is_reserved_table(name: &str) -> bool {
    [LIST_COLOUR_TABLE, OPTIONS_TABLE, MIGRATIONS_TABLE]
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
        || name.to_ascii_lowercase().starts_with("sqlite_")
}
