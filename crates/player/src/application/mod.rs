//! Application layer - services that sit between the UI and the platform

pub mod error;
pub mod services;

pub use error::PersistError;
pub use services::SheetService;
