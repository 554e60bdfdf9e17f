//! Export av alla listor och uppgifter till JSON

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::models::{ListColour, Task};
use crate::services::TaskRepository;
use crate::utils::date::{DUE_DATE_FORMAT, MODIFIED_DATE_FORMAT};

/// Exporterbar lista
#[derive(Debug, Serialize)]
pub struct ListExport {
    pub name: String,
    pub colour: ListColour,
    pub tasks: Vec<TaskExport>,
}

/// Exporterbar uppgift (datum som text, utan listnamn)
#[derive(Debug, Serialize)]
pub struct TaskExport {
    pub id: Option<i64>,
    pub name: String,
    pub notes: String,
    pub done: bool,
    pub priority: i32,
    pub due_date: Option<String>,
    pub modified_date: Option<String>,
    pub notification_required: bool,
}

impl From<&Task> for TaskExport {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            notes: t.notes.clone(),
            done: t.done,
            priority: t.priority,
            due_date: t.due_date.map(|d| d.format(DUE_DATE_FORMAT).to_string()),
            modified_date: t.modified_date.map(|d| d.format(MODIFIED_DATE_FORMAT).to_string()),
            notification_required: t.notification_required,
        }
    }
}

/// Export-tjänst
pub struct ExportService<'a> {
    repo: &'a TaskRepository,
}

impl<'a> ExportService<'a> {
    pub fn new(repo: &'a TaskRepository) -> Self {
        Self { repo }
    }

    /// Generera filnamn för export
    pub fn generate_filename() -> String {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        format!("autonag_lists_{}.json", timestamp)
    }

    /// Samla alla listor med färg och uppgifter
    pub fn collect(&self) -> Result<Vec<ListExport>> {
        let names = self.repo.list_names()?;
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        self.collect_lists(&refs)
    }

    /// Samla utvalda listor i given ordning
    pub fn collect_lists(&self, list_names: &[&str]) -> Result<Vec<ListExport>> {
        let mut exports = Vec::with_capacity(list_names.len());

        for &name in list_names {
            let tasks = self.repo.tasks(&[name], &[])?;
            exports.push(ListExport {
                name: name.to_string(),
                colour: self.repo.colour(name)?,
                tasks: tasks.iter().map(TaskExport::from).collect(),
            });
        }

        Ok(exports)
    }

    pub fn export_json(&self) -> Result<String> {
        let exports = self.collect()?;
        serde_json::to_string_pretty(&exports).context("JSON serialisering misslyckades")
    }

    /// Exportera alla listor till fil
    pub fn export_to_file(&self, path: &Path) -> Result<ExportResult> {
        let exports = self.collect()?;
        let content =
            serde_json::to_string_pretty(&exports).context("JSON serialisering misslyckades")?;

        std::fs::write(path, &content).context("Kunde inte skriva fil")?;

        let result = ExportResult {
            list_count: exports.len(),
            task_count: exports.iter().map(|l| l.tasks.len()).sum(),
            file_size: content.len(),
        };
        info!("{} till {}", result.summary(), path.display());

        Ok(result)
    }
}

/// Resultat av export
#[derive(Debug)]
pub struct ExportResult {
    pub list_count: usize,
    pub task_count: usize,
    pub file_size: usize,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} listor exporterade: {} uppgifter, {} bytes",
            self.list_count, self.task_count, self.file_size
        )
    }
}
