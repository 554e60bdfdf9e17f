use std::fmt;

use serde::{Deserialize, Serialize};

/// Visningsfärg för en lista
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ListColour {
    #[default]
    Yellow,
    Green,
    Blue,
    Pink,
    Beige,
}

impl ListColour {
    pub fn all() -> &'static [Self] {
        &[Self::Yellow, Self::Green, Self::Blue, Self::Pink, Self::Beige]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Pink => "Pink",
            Self::Beige => "Beige",
        }
    }

    /// Tolka lagrat färgnamn. Okända värden ger standardfärgen.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "Yellow" => Self::Yellow,
            "Green" => Self::Green,
            "Blue" => Self::Blue,
            "Pink" => Self::Pink,
            "Beige" => Self::Beige,
            _ => Self::default(),
        }
    }
}

impl fmt::Display for ListColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
