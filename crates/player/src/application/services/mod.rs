//! Application services

mod sheet_service;

pub use sheet_service::{Deferred, SheetService};
