//! Desktop platform implementations
//!
//! Storage is a single JSON object on disk mirrored by an in-memory map;
//! timers come from tokio.

use crate::ports::outbound::platform::{SleepProvider, StorageProvider};
use crate::runner::config::RunnerConfig;
use crate::state::Platform;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::{fs, io};
use std::{future::Future, pin::Pin, sync::Arc};

type Slots = HashMap<String, String>;

/// Slot storage kept in one JSON file.
///
/// Without `CHARSHEET_STORAGE_PATH` the file lives in the platform config
/// directory (`~/.config/charsheet/player/storage.json` on Linux). Every
/// save or remove rewrites the whole file.
#[derive(Clone)]
pub struct DesktopStorageProvider {
    storage_path: PathBuf,
    slots: Arc<RwLock<Slots>>,
}

impl Default for DesktopStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopStorageProvider {
    pub fn new() -> Self {
        Self::at(default_storage_path())
    }

    /// Open the store at `storage_path`, reading whatever it already holds
    pub fn at(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        let slots = read_storage_file(&storage_path);
        tracing::debug!(path = ?storage_path, slots = slots.len(), "Opened slot storage");

        Self {
            storage_path,
            slots: Arc::new(RwLock::new(slots)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Apply `change` to the slots, then write the result out.
    ///
    /// The file is written after the lock is dropped.
    fn update(&self, change: impl FnOnce(&mut Slots)) {
        let snapshot = match self.slots.write() {
            Ok(mut slots) => {
                change(&mut slots);
                serde_json::to_string_pretty(&*slots)
            }
            Err(e) => {
                tracing::error!(error = %e, "Slot storage lock poisoned, change dropped");
                return;
            }
        };

        match snapshot {
            Ok(json) => self.write_file(&json),
            Err(e) => tracing::error!(error = %e, "Failed to encode slot storage"),
        }
    }

    fn write_file(&self, json: &str) {
        let written = match self.storage_path.parent() {
            Some(dir) => fs::create_dir_all(dir),
            None => Ok(()),
        }
        .and_then(|()| fs::write(&self.storage_path, json));

        if let Err(e) = written {
            tracing::error!(path = ?self.storage_path, error = %e, "Failed to write slot storage");
        }
    }
}

fn default_storage_path() -> PathBuf {
    ProjectDirs::from("io", "charsheet", "player")
        .map(|dirs| dirs.config_dir().join("storage.json"))
        .unwrap_or_else(|| PathBuf::from("charsheet_storage.json"))
}

/// A missing, unreadable or malformed file all start out empty
fn read_storage_file(path: &Path) -> Slots {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Slots::new(),
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Slot storage unreadable, starting empty");
            return Slots::new();
        }
    };
    serde_json::from_str(&data).unwrap_or_else(|e| {
        tracing::warn!(path = ?path, error = %e, "Slot storage malformed, starting empty");
        Slots::new()
    })
}

impl StorageProvider for DesktopStorageProvider {
    fn save(&self, key: &str, value: &str) {
        self.update(|slots| {
            slots.insert(key.to_string(), value.to_string());
        });
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.slots.read() {
            Ok(slots) => slots.get(key).cloned(),
            Err(e) => {
                tracing::error!(key, error = %e, "Slot storage lock poisoned");
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        self.update(|slots| {
            slots.remove(key);
        });
    }
}

/// Tokio timers. The deadline is fixed when `sleep_ms` is called, not when
/// the future is first polled.
#[derive(Clone, Default)]
pub struct DesktopSleepProvider;

impl SleepProvider for DesktopSleepProvider {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        Box::pin(tokio::time::sleep(std::time::Duration::from_millis(ms)))
    }
}

/// Create platform services for desktop
pub fn create_platform(config: &RunnerConfig) -> Platform {
    let storage = match &config.storage_path {
        Some(path) => DesktopStorageProvider::at(path),
        None => DesktopStorageProvider::new(),
    };
    Platform::new(DesktopSleepProvider, storage)
}
