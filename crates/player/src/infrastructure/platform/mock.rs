//! In-memory platform for tests
//!
//! Available under `cfg(test)` or the `testing` feature.

use crate::ports::outbound::platform::{SleepProvider, StorageProvider};
use crate::state::Platform;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::{future::Future, pin::Pin};

/// Storage backed by a shared map that records every write
#[derive(Clone, Default)]
pub struct MemoryStorageProvider {
    values: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot without recording a write
    pub fn with_value(self, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Keys written so far, in order (saves and removes)
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn clear_writes(&self) {
        if let Ok(mut writes) = self.writes.lock() {
            writes.clear();
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .lock()
            .map(|v| v.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn record(&self, key: &str) {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(key.to_string());
        }
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        self.record(key);
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
        self.record(key);
    }
}

/// Sleep provider that completes immediately
#[derive(Clone, Default)]
pub struct InstantSleepProvider;

impl SleepProvider for InstantSleepProvider {
    fn sleep_ms(&self, _ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        Box::pin(std::future::ready(()))
    }
}

/// Create a platform over the given in-memory storage
pub fn create_mock_platform(storage: MemoryStorageProvider) -> Platform {
    Platform::new(InstantSleepProvider, storage)
}
