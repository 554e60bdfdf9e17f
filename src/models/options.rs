use serde::{Deserialize, Serialize};

/// Globala inställningar (en enda rad i databasen)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralOptions {
    /// Identifierare för notifieringsljudet (t.ex. en URI)
    pub notification_tone: String,
    pub highlight_overdue_tasks: bool,
}

impl GeneralOptions {
    pub fn new(notification_tone: impl Into<String>, highlight_overdue_tasks: bool) -> Self {
        Self {
            notification_tone: notification_tone.into(),
            highlight_overdue_tasks,
        }
    }
}
