//! Avatar Panel - image preview and file picker

use dioxus::prelude::*;

use crate::presentation::services::use_sheet_service;
use crate::presentation::state::use_sheet_state;

/// Avatar Panel component - Shows the avatar or a placeholder
#[component]
pub fn AvatarPanel() -> Element {
    let service = use_sheet_service();
    let mut state = use_sheet_state();

    let avatar = state.sheet.read().avatar.clone();

    rsx! {
        div {
            class: "bg-gray-900 text-green-300 w-1/3 flex items-center justify-center p-4 rounded",
            div {
                class: "flex flex-col items-center",
                div {
                    class: "w-40 h-40 border border-green-500 overflow-hidden mb-2 flex items-center justify-center",
                    if let Some(avatar) = avatar {
                        img {
                            src: "{avatar}",
                            alt: "Avatar",
                            class: "object-cover w-full h-full",
                        }
                    } else {
                        span { class: "text-xs", "アバター画像未選択" }
                    }
                }
                input {
                    r#type: "file",
                    accept: "image/*",
                    class: "text-xs",
                    onchange: move |evt: FormEvent| {
                        // No file picked (dialog cancelled) is a no-op.
                        if let Some(file) = evt.files().into_iter().next() {
                            state.load_avatar(&service, file);
                        }
                    },
                }
            }
        }
    }
}
