//! Listnamn och uppgiftsantal per widget

use anyhow::Result;

use super::Preferences;

const LIST_NAME_NAMESPACE: &str = "ListNamePersistence";
const TASK_COUNT_NAMESPACE: &str = "TaskCountPersistence";

fn list_name_key(widget_id: i32) -> String {
    format!("{}ListName", widget_id)
}

fn task_count_key(widget_id: i32) -> String {
    format!("{}TaskCount", widget_id)
}

/// Widgetens valda lista skrivs av inställningsvyn; antalet uppgifter
/// skrivs när uppgifterna laddas och läses vid rendering.
pub struct WidgetStateStore {
    prefs: Preferences,
}

impl WidgetStateStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// Listan som visas i widgeten (tom sträng om ingen valts)
    pub fn list_name(&self, widget_id: i32) -> Result<String> {
        self.prefs
            .read(LIST_NAME_NAMESPACE, |f| f.get_string(&list_name_key(widget_id), ""))
    }

    pub fn set_list_name(&self, widget_id: i32, list_name: &str) -> Result<()> {
        self.prefs.edit(LIST_NAME_NAMESPACE, |f| {
            f.put_string(list_name_key(widget_id), list_name)
        })
    }

    pub fn task_count(&self, widget_id: i32) -> Result<usize> {
        let count = self
            .prefs
            .read(TASK_COUNT_NAMESPACE, |f| f.get_int(&task_count_key(widget_id), 0))?;
        Ok(count.max(0) as usize)
    }

    pub fn set_task_count(&self, widget_id: i32, count: usize) -> Result<()> {
        self.prefs.edit(TASK_COUNT_NAMESPACE, |f| {
            f.put_int(task_count_key(widget_id), count as i64)
        })
    }

    /// Byt listnamn i alla widgetar som visar `old_name`
    pub fn rename_list(&self, old_name: &str, new_name: &str) -> Result<usize> {
        self.prefs.edit(LIST_NAME_NAMESPACE, |f| f.replace_text(old_name, new_name))
    }

    /// Ta bort all widgetstatus för en widget
    pub fn remove(&self, widget_id: i32) -> Result<()> {
        self.prefs.edit(LIST_NAME_NAMESPACE, |f| {
            f.remove(&list_name_key(widget_id));
        })?;
        self.prefs.edit(TASK_COUNT_NAMESPACE, |f| {
            f.remove(&task_count_key(widget_id));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn store() -> (TempDir, WidgetStateStore) {
        let dir = tempdir().unwrap();
        let prefs = Preferences::open(dir.path()).unwrap();
        (dir, WidgetStateStore::new(prefs))
    }

    #[test]
    fn test_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.list_name(1).unwrap(), "");
        assert_eq!(store.task_count(1).unwrap(), 0);
    }

    #[test]
    fn test_list_name_per_widget() {
        let (_dir, store) = store();
        store.set_list_name(1, "Work").unwrap();
        store.set_list_name(2, "Combined list").unwrap();

        assert_eq!(store.list_name(1).unwrap(), "Work");
        assert_eq!(store.list_name(2).unwrap(), "Combined list");
    }

    #[test]
    fn test_task_count() {
        let (_dir, store) = store();
        store.set_task_count(3, 12).unwrap();
        assert_eq!(store.task_count(3).unwrap(), 12);
        assert_eq!(store.task_count(4).unwrap(), 0);
    }

    #[test]
    fn test_rename_list() {
        let (_dir, store) = store();
        store.set_list_name(1, "Foo").unwrap();
        store.set_list_name(2, "Bar").unwrap();
        store.set_list_name(3, "Foo").unwrap();

        assert_eq!(store.rename_list("Foo", "foo").unwrap(), 2);

        assert_eq!(store.list_name(1).unwrap(), "foo");
        assert_eq!(store.list_name(2).unwrap(), "Bar");
        assert_eq!(store.list_name(3).unwrap(), "foo");
    }

    #[test]
    fn test_remove() {
        let (_dir, store) = store();
        store.set_list_name(1, "Work").unwrap();
        store.set_task_count(1, 4).unwrap();

        store.remove(1).unwrap();

        assert_eq!(store.list_name(1).unwrap(), "");
        assert_eq!(store.task_count(1).unwrap(), 0);
    }
}
