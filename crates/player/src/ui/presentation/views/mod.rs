//! Top-level views

mod sheet_view;

pub use sheet_view::SheetView;
