use std::path::{Path, PathBuf};

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("uk", "autonag", "AutoNag")
}

/// Hämta databassökväg
pub fn get_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("TaskDatabase.db3"))
        .unwrap_or_else(|| PathBuf::from("TaskDatabase.db3"))
}

/// Hämta katalog för inställningsfiler (sorteringsordning, widgetstatus)
pub fn get_preferences_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("preferences"))
        .unwrap_or_else(|| PathBuf::from("preferences"))
}

/// Hämta konfigurationssökväg
pub fn get_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Normalisera sökväg för visning
pub fn display_path(path: &Path) -> String {
    // Förkorta hemkatalogen till ~
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
