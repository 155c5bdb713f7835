//! Key-value persistence for user preferences.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference storage is unavailable")]
    Unavailable,
    #[error("preference file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("preference file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed store for small preference values
///
/// `save` runs under the theme controller's state lock; implementations must
/// not call back into the controller.
pub trait PreferenceStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Preferences kept as a flat JSON object in a single file.
/// A missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every future save.
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { .. }) => BTreeMap::new(),
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved preference {} to {}", key, self.path.display());
        Ok(())
    }
}

/// In-process store; can be switched off to mimic storage that refuses access
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, String>>,
    unavailable: Mutex<bool>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self
            .unavailable
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = unavailable;
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if *self
            .unavailable
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
        {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.load("estate-pilot-theme").expect("load"), None);
    }

    #[test]
    fn save_then_load_keeps_other_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FilePreferenceStore::new(dir.path().join("nested").join("prefs.json"));
        store.save("language", "ar").expect("save language");
        store.save("estate-pilot-theme", "dark").expect("save theme");
        store.save("estate-pilot-theme", "light").expect("overwrite theme");

        assert_eq!(
            store.load("estate-pilot-theme").expect("load"),
            Some("light".to_string())
        );
        assert_eq!(store.load("language").expect("load"), Some("ar".to_string()));
    }

    #[test]
    fn corrupt_file_errors_on_load_and_is_replaced_on_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").expect("write");
        let store = FilePreferenceStore::new(&path);

        assert!(matches!(
            store.load("estate-pilot-theme"),
            Err(StoreError::Corrupt { .. })
        ));
        store.save("estate-pilot-theme", "dark").expect("save");
        assert_eq!(
            store.load("estate-pilot-theme").expect("load"),
            Some("dark".to_string())
        );
    }

    #[test]
    fn unavailable_memory_store_refuses_access() {
        let store = MemoryPreferenceStore::with_entry("k", "v");
        store.set_unavailable(true);
        assert!(matches!(store.load("k"), Err(StoreError::Unavailable)));
        assert!(matches!(store.save("k", "w"), Err(StoreError::Unavailable)));
        store.set_unavailable(false);
        assert_eq!(store.load("k").expect("load"), Some("v".to_string()));
    }
}
