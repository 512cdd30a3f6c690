//! Ability Panel - tag cloud with add and multi-select delete controls

use dioxus::prelude::*;

use crate::presentation::services::use_sheet_service;
use crate::presentation::state::use_sheet_state;

/// Ability Panel component
#[component]
pub fn AbilityPanel() -> Element {
    let service = use_sheet_service();
    let mut state = use_sheet_state();

    let abilities: Vec<String> = state
        .sheet
        .read()
        .abilities
        .iter()
        .map(str::to_string)
        .collect();
    let departing: Vec<(u64, String)> = state
        .departing
        .read()
        .iter()
        .map(|(batch, text)| (batch.id(), text.to_string()))
        .collect();
    let selecting = state.selection.read().is_selecting();
    let can_delete = state.selection.read().can_delete();

    let add_service = service.clone();
    let delete_service = service.clone();

    rsx! {
        div {
            class: "bg-gray-900 text-green-300 p-4 rounded",
            h2 { class: "text-lg mb-3", "特殊能力" }

            div {
                class: "flex flex-wrap gap-2 mb-3",
                for (index, text) in abilities.into_iter().enumerate() {
                    AbilityTag { key: "{index}", index, text }
                }
                for (slot, (batch, text)) in departing.into_iter().enumerate() {
                    span {
                        key: "gone-{batch}-{slot}",
                        class: "ability-tag px-2 py-0.5 rounded text-xs font-bold border border-black bg-yellow-300 text-black shadow-md tag-leave",
                        "{text}"
                    }
                }
            }

            div {
                class: "flex gap-2 items-center mb-2",
                input {
                    class: "bg-black text-green-400 border border-green-500 h-6 text-sm",
                    value: "{state.new_ability}",
                    placeholder: "新しい能力を追加",
                    oninput: move |evt: FormEvent| state.new_ability.set(evt.value()),
                }
                button {
                    class: "text-green-400 text-xs underline",
                    onclick: move |_| state.add_ability(&add_service),
                    "追加"
                }
                button {
                    class: "text-yellow-400 text-xs underline",
                    onclick: move |_| state.toggle_select_mode(),
                    if selecting { "選択解除" } else { "選択モード" }
                }
                if can_delete {
                    button {
                        class: "text-red-400 text-xs underline",
                        onclick: move |_| state.delete_selected(&delete_service),
                        "選択した能力を削除"
                    }
                }
            }
        }
    }
}

/// Props for AbilityTag
#[derive(Props, Clone, PartialEq)]
pub struct AbilityTagProps {
    pub index: usize,
    pub text: String,
}

/// One editable ability tag
#[component]
pub fn AbilityTag(props: AbilityTagProps) -> Element {
    let service = use_sheet_service();
    let mut state = use_sheet_state();
    let index = props.index;

    let selected_class = if state.selection.read().is_selected(index) {
        "ring-2 ring-green-400"
    } else {
        ""
    };

    rsx! {
        input {
            r#type: "text",
            value: "{props.text}",
            class: "ability-tag px-2 py-0.5 rounded text-xs font-bold border border-black bg-yellow-300 text-black shadow-md cursor-pointer w-auto tag-enter {selected_class}",
            onclick: move |_| state.click_ability(index),
            oninput: move |evt: FormEvent| state.edit_ability(&service, index, &evt.value()),
        }
    }
}
