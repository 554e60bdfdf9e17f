//! Tjänster för AutoNag
//!
//! Innehåller logik som kombinerar databasen och inställningsfilerna.

pub mod export;
pub mod task_repository;
pub mod widget;

pub use export::{ExportResult, ExportService};
pub use task_repository::TaskRepository;
pub use widget::WidgetService;
