pub mod schema;
pub mod migrations;
pub mod task_repo;
pub mod colour_repo;
pub mod options_repo;

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::ListColour;

pub use task_repo::TaskStore;
pub use colour_repo::ListColourStore;
pub use options_repo::OptionsStore;

/// Cache för listfärger, delad mellan alla kloner av en `Database`
pub(crate) type ColourCache = Arc<Mutex<Option<HashMap<String, ListColour>>>>;

/// Lås en delad mutex och rapportera förgiftning som fel
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| anyhow!("Databaslåset är förgiftat"))
}

/// Huvuddatabas-wrapper med thread-safe access.
///
/// All lagring går via en och samma anslutning bakom en mutex, så
/// operationer serialiseras i hela processen.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    colour_cache: ColourCache,
}

impl Database {
    /// Öppna eller skapa databas
    pub fn open(path: &Path) -> Result<Self> {
        // Skapa katalog om den inte finns
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Konfigurera SQLite
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            "
        )?;

        tracing::info!("Öppnade databas {}", path.display());

        let db = Self::from_connection(conn);
        db.migrate()?;
        Ok(db)
    }

    /// Öppna in-memory databas (för tester)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self::from_connection(conn);
        db.migrate()?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            colour_cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Kör databasmigrationer
    pub fn migrate(&self) -> Result<()> {
        let conn = lock(&self.conn)?;
        migrations::run_migrations(&conn)
    }

    /// Hämta uppgifts- och listlagret
    pub fn tasks(&self) -> TaskStore {
        TaskStore::new(Arc::clone(&self.conn), Arc::clone(&self.colour_cache))
    }

    /// Hämta listfärgslagret
    pub fn colours(&self) -> ListColourStore {
        ListColourStore::new(Arc::clone(&self.conn), Arc::clone(&self.colour_cache))
    }

    /// Hämta inställningslagret
    pub fn options(&self) -> OptionsStore {
        OptionsStore::new(Arc::clone(&self.conn))
    }

    /// Direkt tillgång till connection (för avancerade operationer)
    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = lock(&self.conn)?;
        f(&conn)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            colour_cache: Arc::clone(&self.colour_cache),
        }
    }
}
