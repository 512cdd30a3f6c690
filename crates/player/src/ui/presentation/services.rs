//! Service providers for the presentation layer
//!
//! This module provides Dioxus context providers for application services.
//! Components can use `use_context` to access services without depending
//! on infrastructure implementations.
use dioxus::prelude::*;
use std::sync::Arc;

use crate::application::services::SheetService;

/// All services wrapped for context provision
#[derive(Clone)]
pub struct Services {
    pub sheet: Arc<SheetService>,
}

impl Services {
    pub fn new(sheet: SheetService) -> Self {
        Self {
            sheet: Arc::new(sheet),
        }
    }
}

/// Hook to access the SheetService from context
pub fn use_sheet_service() -> Arc<SheetService> {
    let services = use_context::<Services>();
    services.sheet.clone()
}
