//! Sheet View - two-pane avatar/stats layout above the ability cloud

use dioxus::prelude::*;

use crate::presentation::components::{AbilityPanel, AvatarPanel, StatPanel};

#[component]
pub fn SheetView() -> Element {
    rsx! {
        div {
            class: "min-h-screen bg-black text-green-400 p-4 font-mono text-sm",
            h1 {
                class: "text-2xl mb-4 border-b border-green-500 pb-2",
                "アバターステータス管理"
            }
            div {
                class: "flex flex-col gap-4",
                div {
                    class: "flex gap-4",
                    AvatarPanel {}
                    StatPanel {}
                }
                AbilityPanel {}
            }
        }
    }
}
