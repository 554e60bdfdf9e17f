//! Laddning av uppgifter till en hemskärmswidget

use anyhow::Result;
use tracing::debug;

use crate::models::Task;
use crate::prefs::{Preferences, SortOrderStore, WidgetStateStore};
use crate::services::TaskRepository;

/// Kopplar ihop en widgets sparade tillstånd med lagringen
pub struct WidgetService<'a> {
    repo: &'a TaskRepository,
    sort_orders: SortOrderStore,
    state: WidgetStateStore,
}

impl<'a> WidgetService<'a> {
    pub fn new(repo: &'a TaskRepository, prefs: &Preferences) -> Self {
        Self {
            repo,
            sort_orders: SortOrderStore::new(prefs.clone()),
            state: WidgetStateStore::new(prefs.clone()),
        }
    }

    pub fn sort_orders(&self) -> &SortOrderStore {
        &self.sort_orders
    }

    pub fn state(&self) -> &WidgetStateStore {
        &self.state
    }

    /// Hämta widgetens uppgifter sorterade enligt dess sorteringsordning
    /// och spara antalet för renderingen. En widget utan vald lista får
    /// en tom lista.
    pub fn load_tasks(&self, widget_id: i32) -> Result<Vec<Task>> {
        let list_name = self.state.list_name(widget_id)?;

        let tasks = if list_name.is_empty() {
            Vec::new()
        } else {
            self.sort_orders.ensure_sort_order(widget_id)?;
            let sort_order = self.sort_orders.task_sort_order(widget_id)?;
            self.repo.tasks_for_list(&list_name, &sort_order)?
        };

        self.state.set_task_count(widget_id, tasks.len())?;
        debug!("Widget {} laddade {} uppgifter från '{}'", widget_id, tasks.len(), list_name);

        Ok(tasks)
    }

    /// Byt namn på listan i alla widgetar som visar den
    pub fn rename_list(&self, old_name: &str, new_name: &str) -> Result<usize> {
        self.state.rename_list(old_name, new_name)
    }

    /// Glöm allt sparat om en borttagen widget
    pub fn remove_widget(&self, widget_id: i32) -> Result<()> {
        self.sort_orders.remove(widget_id)?;
        self.state.remove(widget_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{sort_order::default_sort_order, AppConfig, SortCriterion, COMBINED_LIST_NAME};
    use tempfile::tempdir;

    fn repo() -> TaskRepository {
        TaskRepository::new(Database::open_in_memory().unwrap(), &AppConfig::default())
    }

    fn add(repo: &TaskRepository, list: &str, name: &str, priority: i32, done: bool) {
        let mut task = Task::new(list, name);
        task.priority = priority;
        task.done = done;
        repo.save_task(&mut task).unwrap();
    }

    #[test]
    fn test_widget_without_list_is_empty() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::open(dir.path()).unwrap();
        let repo = repo();
        let service = WidgetService::new(&repo, &prefs);

        assert!(service.load_tasks(1).unwrap().is_empty());
        assert_eq!(service.state().task_count(1).unwrap(), 0);
        assert!(service.sort_orders().get_sort_order(1).unwrap().is_empty());
    }

    #[test]
    fn test_load_tasks_initializes_sort_order() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::open(dir.path()).unwrap();
        let repo = repo();
        repo.create_list("Work").unwrap();
        add(&repo, "Work", "Låg", 1, false);
        add(&repo, "Work", "Hög", 3, false);

        let service = WidgetService::new(&repo, &prefs);
        service.state().set_list_name(5, "Work").unwrap();

        let tasks = service.load_tasks(5).unwrap();

        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Hög", "Låg"]);
        assert_eq!(service.state().task_count(5).unwrap(), 2);
        assert_eq!(service.sort_orders().get_sort_order(5).unwrap(), default_sort_order());
    }

    #[test]
    fn test_load_tasks_follows_clicked_order() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::open(dir.path()).unwrap();
        let repo = repo();
        repo.create_list("Work").unwrap();
        add(&repo, "Work", "Klar", 3, true);
        add(&repo, "Work", "Öppen", 1, false);

        let service = WidgetService::new(&repo, &prefs);
        service.state().set_list_name(2, "Work").unwrap();
        service.sort_orders().ensure_sort_order(2).unwrap();

        // Done slås på och hamnar efter de redan påslagna kriterierna
        service.sort_orders().process_click(2, 2).unwrap();
        assert_eq!(
            service.sort_orders().task_sort_order(2).unwrap(),
            vec![SortCriterion::Priority, SortCriterion::DueDate, SortCriterion::Done]
        );

        // Priority slås av; Done blir viktigare än prioritet
        service.sort_orders().process_click(2, 0).unwrap();
        let tasks = service.load_tasks(2).unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Öppen", "Klar"]);
    }

    #[test]
    fn test_combined_list_widget() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::open(dir.path()).unwrap();
        let repo = repo();
        repo.create_list("Work").unwrap();
        repo.create_list("Home").unwrap();
        add(&repo, "Work", "A", 0, false);
        add(&repo, "Home", "B", 0, false);

        let service = WidgetService::new(&repo, &prefs);
        service.state().set_list_name(1, COMBINED_LIST_NAME).unwrap();

        assert_eq!(service.load_tasks(1).unwrap().len(), 2);
        assert_eq!(service.state().task_count(1).unwrap(), 2);
    }

    #[test]
    fn test_rename_and_remove_widget() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::open(dir.path()).unwrap();
        let repo = repo();
        let service = WidgetService::new(&repo, &prefs);

        service.state().set_list_name(1, "Foo").unwrap();
        service.sort_orders().ensure_sort_order(1).unwrap();

        assert_eq!(service.rename_list("Foo", "Bar").unwrap(), 1);
        assert_eq!(service.state().list_name(1).unwrap(), "Bar");

        service.remove_widget(1).unwrap();
        assert_eq!(service.state().list_name(1).unwrap(), "");
        assert!(service.sort_orders().get_sort_order(1).unwrap().is_empty());
    }
}
