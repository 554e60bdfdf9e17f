//! Nyckel/värde-inställningar per namnrymd, lagrade som TOML-filer.
//!
//! Varje namnrymd (t.ex. sorteringsordning) är en egen fil i
//! inställningskatalogen. Nycklar byggs som `"{widget_id}{fält}"`.

pub mod sort_order;
pub mod widget_state;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::AppError;

pub use sort_order::SortOrderStore;
pub use widget_state::WidgetStateStore;

/// Ett lagrat inställningsvärde
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Handtag till inställningskatalogen. Kloner delar samma lås så att
/// läs-ändra-skriv av en fil inte blandas ihop mellan trådar.
#[derive(Clone)]
pub struct Preferences {
    dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl Preferences {
    /// Öppna (och skapa vid behov) inställningskatalogen
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Läs en namnrymd
    pub fn read<T>(&self, namespace: &str, f: impl FnOnce(&PreferenceFile) -> T) -> Result<T> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Inställningslåset är förgiftat"))?;
        let file = PreferenceFile::load(self.path_for(namespace))?;
        Ok(f(&file))
    }

    /// Ändra en namnrymd och spara resultatet
    pub fn edit<T>(&self, namespace: &str, f: impl FnOnce(&mut PreferenceFile) -> T) -> Result<T> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Inställningslåset är förgiftat"))?;
        let mut file = PreferenceFile::load(self.path_for(namespace))?;
        let result = f(&mut file);
        file.commit()?;
        Ok(result)
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.toml", namespace))
    }
}

/// Innehållet i en namnrymd
#[derive(Debug)]
pub struct PreferenceFile {
    path: PathBuf,
    values: BTreeMap<String, PreferenceValue>,
}

impl PreferenceFile {
    fn load(path: PathBuf) -> Result<Self> {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    // Trasig fil behandlas som tom, precis som en saknad fil
                    warn!("Kunde inte tolka {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(AppError::from(e).into()),
        };

        Ok(Self { path, values })
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(PreferenceValue::Int(v)) => *v,
            _ => default,
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(PreferenceValue::Bool(v)) => *v,
            _ => default,
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(PreferenceValue::Text(v)) => v.clone(),
            _ => default.to_string(),
        }
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), PreferenceValue::Int(value));
    }

    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
        self.values.insert(key.into(), PreferenceValue::Bool(value));
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), PreferenceValue::Text(value.into()));
    }

    pub fn remove(&mut self, key: &str) -> Option<PreferenceValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Ersätt alla textvärden lika med `from`. Returnerar antal ersatta.
    pub fn replace_text(&mut self, from: &str, to: &str) -> usize {
        let mut replaced = 0;
        for value in self.values.values_mut() {
            if matches!(value, PreferenceValue::Text(text) if text == from) {
                *value = PreferenceValue::Text(to.to_string());
                replaced += 1;
            }
        }
        replaced
    }

    /// Skriv filen atomiskt (temporär fil + rename)
    fn commit(&self) -> Result<()> {
        let content = toml::to_string(&self.values).map_err(AppError::from)?;

        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}
