//! WASM platform implementations
//!
//! Provides browser implementations backed by `window.localStorage`
//! and `gloo-timers`.

use crate::ports::outbound::platform::{SleepProvider, StorageProvider};
use crate::runner::config::RunnerConfig;
use crate::state::Platform;
use std::{future::Future, pin::Pin};

/// localStorage access. `web_sys::Storage` is not `Send`, so it is looked up
/// on every call instead of being held by the provider.
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Browser storage provider using localStorage
#[derive(Clone, Default)]
pub struct WasmStorageProvider;

impl StorageProvider for WasmStorageProvider {
    fn save(&self, key: &str, value: &str) {
        let Some(storage) = get_storage() else {
            tracing::error!("localStorage unavailable; dropping write to {}", key);
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            tracing::error!("Failed to write {} to localStorage: {:?}", key, e);
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match get_storage()?.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {} from localStorage: {:?}", key, e);
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = get_storage() {
            if let Err(e) = storage.remove_item(key) {
                tracing::error!("Failed to remove {} from localStorage: {:?}", key, e);
            }
        }
    }
}

/// Browser sleep provider using gloo timers
#[derive(Clone, Default)]
pub struct WasmSleepProvider;

impl SleepProvider for WasmSleepProvider {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        let ms = u32::try_from(ms).unwrap_or(u32::MAX);
        Box::pin(gloo_timers::future::TimeoutFuture::new(ms))
    }
}

/// Create platform services for the browser
///
/// The storage path override only applies to desktop builds.
pub fn create_platform(_config: &RunnerConfig) -> Platform {
    Platform::new(WasmSleepProvider, WasmStorageProvider)
}
