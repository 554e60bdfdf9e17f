//! AutoNag - Entry Point
//!
//! Skriver ut alla listor med färg och uppgifter.

use anyhow::Result;

use autonag::models::{AppConfig, SortCriterion};
use autonag::services::TaskRepository;
use autonag::utils::date::{format_date, now};
use autonag::utils::path::display_path;

fn main() -> Result<()> {
    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    tracing::info!("Startar AutoNag v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    let repo = TaskRepository::open(&config)?;
    let today = now().date();

    println!("Databas: {}", display_path(&config.database_path()));

    let lists = repo.list_names()?;
    if lists.is_empty() {
        println!("Inga listor");
        return Ok(());
    }

    let sort_order = [SortCriterion::Done, SortCriterion::DueDate, SortCriterion::Priority];
    for list in &lists {
        let tasks = repo.tasks(&[list.as_str()], &sort_order)?;
        println!("\n{} [{}] ({} uppgifter)", list, repo.colour(list)?, tasks.len());

        for task in &tasks {
            let due = task
                .due_day()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            let marker = if task.done {
                "x"
            } else if task.is_overdue(today) {
                "!"
            } else {
                " "
            };
            println!("  [{}] {:<40} prio {} förfaller {}", marker, task.name, task.priority, due);
        }
    }

    let pending = repo.notification_tasks()?;
    if !pending.is_empty() {
        println!("\n{} uppgifter väntar på notifiering", pending.len());
    }

    Ok(())
}
