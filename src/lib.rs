//! AutoNag - lagringskärna för uppgiftslistor
//!
//! Uppgifter, listfärger och inställningar i en SQLite-databas samt
//! sorteringsordning och widgetstatus i inställningsfiler.

pub mod models;
pub mod db;
pub mod prefs;
pub mod services;
pub mod utils;

// Re-exports
pub use db::Database;
pub use models::*;
pub use prefs::Preferences;
pub use services::TaskRepository;
