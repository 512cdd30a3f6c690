//! Presentation state held in Dioxus signals

mod sheet_state;

pub use sheet_state::{use_sheet_state, SheetState};
