use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Namnet på den virtuella listan som visar alla listor samtidigt
pub const COMBINED_LIST_NAME: &str = "Combined list";

/// Kontrollera om ett namn är den kombinerade listan (skiftlägesokänsligt)
pub fn is_combined_list(name: &str) -> bool {
    name.eq_ignore_ascii_case(COMBINED_LIST_NAME)
}

/// Sorteringskriterium med fast riktning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortCriterion {
    Priority,
    DueDate,
    Done,
}

impl SortCriterion {
    pub fn all() -> &'static [Self] {
        &[Self::Priority, Self::DueDate, Self::Done]
    }

    /// Namnet som lagras i inställningsfilen
    pub fn name(&self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::DueDate => "DueDate",
            Self::Done => "Done",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "Priority" => Some(Self::Priority),
            "DueDate" => Some(Self::DueDate),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }

    /// ORDER BY-fragment för kriteriet
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::Done => "\"Done\" ASC",
            Self::Priority => "\"Priority\" DESC",
            Self::DueDate => "\"DueDate\" ASC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// `None` för en uppgift som inte sparats ännu
    pub id: Option<i64>,
    pub name: String,
    pub notes: String,
    pub done: bool,
    pub priority: i32,
    pub due_date: Option<NaiveDateTime>,
    pub modified_date: Option<NaiveDateTime>,
    pub notification_required: bool,
    /// Listan (tabellen) som äger uppgiften. Lagras inte som kolumn.
    pub list_name: String,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            notes: String::new(),
            done: false,
            priority: 0,
            due_date: None,
            modified_date: None,
            notification_required: false,
            list_name: String::new(),
        }
    }
}

impl Task {
    pub fn new(list_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            list_name: list_name.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Sätt ändringstiden till nu. Anroparen ansvarar för detta före varje sparning.
    pub fn touch(&mut self) {
        self.modified_date = Some(crate::utils::date::now());
    }

    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date())
    }

    /// Förfallen: ej klar och förfallodagen ligger före `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.done && self.due_day().map(|d| d < today).unwrap_or(false)
    }

    /// Ta bort notifieringen och nollställ klockslaget på förfallodatumet
    pub fn clear_notification(&mut self) {
        self.notification_required = false;
        if let Some(due) = self.due_date {
            self.due_date = Some(due.date().and_time(NaiveTime::MIN));
        }
    }

    /// Kopia utan ID, riktad mot en annan lista
    pub fn copy_to(&self, list_name: impl Into<String>) -> Self {
        Self {
            id: None,
            list_name: list_name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Work", "Ring banken");
        assert!(task.is_new());
        assert_eq!(task.notes, "");
        assert_eq!(task.list_name, "Work");
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_is_overdue() {
        let today = day(2024, 5, 10);
        let mut task = Task::new("Work", "Deklarera");

        assert!(!task.is_overdue(today));

        task.due_date = day(2024, 5, 9).and_hms_opt(23, 59, 0);
        assert!(task.is_overdue(today));

        // Samma dag räknas inte som förfallen
        task.due_date = day(2024, 5, 10).and_hms_opt(0, 0, 0);
        assert!(!task.is_overdue(today));

        task.due_date = day(2024, 5, 1).and_hms_opt(8, 0, 0);
        task.done = true;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_clear_notification() {
        let mut task = Task::new("Home", "Vattna");
        task.notification_required = true;
        task.due_date = day(2024, 6, 1).and_hms_opt(18, 45, 0);

        task.clear_notification();

        assert!(!task.notification_required);
        assert_eq!(task.due_date, day(2024, 6, 1).and_hms_opt(0, 0, 0));
    }

    #[test]
    fn test_copy_to_resets_id() {
        let mut task = Task::new("Home", "Handla");
        task.id = Some(7);
        task.priority = 1;

        let copy = task.copy_to("Work");
        assert_eq!(copy.id, None);
        assert_eq!(copy.list_name, "Work");
        assert_eq!(copy.priority, 1);
        assert_eq!(copy.name, "Handla");
    }

    #[test]
    fn test_sort_criterion_name_roundtrip() {
        for criterion in SortCriterion::all() {
            assert_eq!(SortCriterion::from_name(criterion.name()), Some(*criterion));
        }
        assert_eq!(SortCriterion::from_name("Name"), None);
    }

    #[test]
    fn test_combined_list_name() {
        assert!(is_combined_list("Combined list"));
        assert!(is_combined_list("combined LIST"));
        assert!(!is_combined_list("Combined"));
    }
}
