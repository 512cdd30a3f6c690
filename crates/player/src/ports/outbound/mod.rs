//! Outbound ports - Interfaces for platform services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to persist and wait without depending on
//! whether they run in a browser or a desktop window.

pub mod platform;

pub use platform::{storage_keys, SleepProvider, StorageProvider};
