//! Infrastructure adapters for the player
//!
//! Platform-specific storage and timer implementations live under `platform`.

pub mod platform;
