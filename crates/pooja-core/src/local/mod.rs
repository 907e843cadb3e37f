//! Local fallback store for the anonymous checklist.
//!
//! Mirrors a browser's key/value storage: string values under string keys.
//! The anonymous list lives under [`LOCAL_SLOT_KEY`] as
//! `{ "items": [...], "title": "..." }`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{PoojaItem, DEFAULT_LIST_TITLE};

/// Well-known slot holding the anonymous list.
pub const LOCAL_SLOT_KEY: &str = "poojaList";

/// Key/value slot storage.
pub trait LocalStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    fn write_slot(&self, key: &str, value: &str) -> Result<()>;

    /// Move an unreadable slot aside so later writes cannot destroy it.
    ///
    /// Returns the key or path the content was moved to.
    fn quarantine_slot(&self, key: &str) -> Result<Option<String>>;
}

/// The anonymous list as stored in the local slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalSnapshot {
    pub items: Vec<PoojaItem>,
    pub title: String,
}

impl Default for LocalSnapshot {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            title: DEFAULT_LIST_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    items: Option<Vec<PoojaItem>>,
    #[serde(default)]
    title: Option<String>,
}

impl From<StoredSnapshot> for LocalSnapshot {
    fn from(stored: StoredSnapshot) -> Self {
        Self {
            items: stored.items.unwrap_or_default(),
            title: stored
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| DEFAULT_LIST_TITLE.to_string()),
        }
    }
}

/// Read the anonymous list; `Ok(None)` when nothing has been saved yet.
pub fn load_snapshot(store: &impl LocalStore) -> Result<Option<LocalSnapshot>> {
    let Some(raw) = store.read_slot(LOCAL_SLOT_KEY)? else {
        return Ok(None);
    };

    serde_json::from_str::<StoredSnapshot>(&raw)
        .map(|stored| Some(stored.into()))
        .map_err(|error| Error::CorruptLocalSlot {
            key: LOCAL_SLOT_KEY.to_string(),
            reason: error.to_string(),
        })
}

pub fn save_snapshot(store: &impl LocalStore, snapshot: &LocalSnapshot) -> Result<()> {
    let raw = serde_json::to_string(snapshot)?;
    store.write_slot(LOCAL_SLOT_KEY, &raw)
}

/// Slot store keeping one `<key>.json` file per slot in a directory.
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStore for FileLocalStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&staging, value)?;
        std::fs::rename(&staging, &path)?;
        Ok(())
    }

    fn quarantine_slot(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let timestamp = chrono::Utc::now().timestamp_millis();
        let backup_path = self.dir.join(format!("{key}.corrupt-{timestamp}.json"));
        std::fs::rename(&path, &backup_path)?;
        tracing::warn!(
            "Moved unreadable local slot from {} to {}",
            path.display(),
            backup_path.display()
        );
        Ok(Some(backup_path.display().to_string()))
    }
}

/// Slot store held in memory; clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryLocalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|error| Error::Io(std::io::Error::other(error.to_string())))
    }
}

impl LocalStore for MemoryLocalStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn quarantine_slot(&self, key: &str) -> Result<Option<String>> {
        let mut slots = self.slots()?;
        let Some(raw) = slots.remove(key) else {
            return Ok(None);
        };
        let backup_key = format!("{key}.corrupt");
        slots.insert(backup_key.clone(), raw);
        Ok(Some(backup_key))
    }
}
