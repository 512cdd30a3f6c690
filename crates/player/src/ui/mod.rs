use dioxus::prelude::*;

pub mod presentation;

pub fn app() -> Element {
    rsx! {
        AppRoot {}
    }
}

#[component]
fn AppRoot() -> Element {
    // Provided by the composition root (see `crates/player/src/runner.rs`).
    let service = presentation::services::use_sheet_service();

    // Signals must be created inside an active Dioxus runtime.
    use_context_provider(move || presentation::state::SheetState::new(service.load()));

    rsx! {
        document::Title { "アバターステータス管理" }
        document::Stylesheet {
            href: asset!("/assets/css/sheet.css"),
        }
        presentation::views::SheetView {}
    }
}
