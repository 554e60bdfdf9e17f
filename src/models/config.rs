use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::path::{get_config_path, get_database_path, get_preferences_dir};

/// Standardljud för notifieringar när inget har valts
pub const DEFAULT_NOTIFICATION_TONE: &str = "content://settings/system/notification_sound";

/// Applikationskonfiguration från `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Åsidosätter standardsökvägen till databasen
    pub database_path: Option<PathBuf>,
    /// Åsidosätter katalogen för inställningsfiler
    pub preferences_dir: Option<PathBuf>,
    pub default_notification_tone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            preferences_dir: None,
            default_notification_tone: DEFAULT_NOTIFICATION_TONE.to_string(),
        }
    }
}

impl AppConfig {
    /// Ladda från standardplatsen, eller defaults om filen saknas eller är trasig
    pub fn load() -> Self {
        Self::load_from(&get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Kunde inte tolka {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(get_database_path)
    }

    pub fn preferences_dir(&self) -> PathBuf {
        self.preferences_dir.clone().unwrap_or_else(get_preferences_dir)
    }
}
