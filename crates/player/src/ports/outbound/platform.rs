//! Platform abstraction ports for cross-platform compatibility
//!
//! These traits abstract platform-specific operations so that:
//! 1. Application/presentation code remains platform-agnostic
//! 2. Platform-specific code is isolated in infrastructure
//! 3. Code becomes easily testable with in-memory implementations
//!
//! NOTE: The `Platform` struct (DI container) that aggregates these traits
//! lives in `crate::state::platform`, not here.

use std::{future::Future, pin::Pin};

/// Async sleep abstraction
///
/// Used to avoid `#[cfg]` branches in UI code (glow timers, tag exit animation).
pub trait SleepProvider: Clone + 'static {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>>;
}

/// Persistent storage abstraction (localStorage/file-based)
///
/// Writes are fire-and-forget: implementations log failures instead of
/// surfacing them, since a failed save must never break editing.
pub trait StorageProvider: Clone + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Storage key constants
///
/// Slot names are shared with sheets saved by earlier versions of the app,
/// so they must not change.
pub mod storage_keys {
    /// JSON object of stat name to value
    pub const STATS: &str = "stats";
    /// JSON array of ability strings
    pub const ABILITIES: &str = "abilities";
    /// Raw data URI string (not JSON encoded)
    pub const AVATAR_URL: &str = "avatarUrl";
}
