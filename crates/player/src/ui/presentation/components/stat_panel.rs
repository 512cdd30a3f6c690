//! Stat Panel - editable stat rows with colour-coded bars

use charsheet_domain::{bar_width_percent, parse_stat_input, BarTier};
use dioxus::prelude::*;

use crate::presentation::services::use_sheet_service;
use crate::presentation::state::use_sheet_state;

/// Stat Panel component - One row per stat, in sheet order
#[component]
pub fn StatPanel() -> Element {
    let state = use_sheet_state();

    let rows: Vec<(String, i32)> = state
        .sheet
        .read()
        .stats
        .iter()
        .map(|s| (s.name.clone(), s.value))
        .collect();

    rsx! {
        div {
            class: "bg-gray-900 text-green-300 w-2/3 p-4 rounded",
            h2 { class: "text-lg mb-3", "ステータス" }
            div {
                class: "grid grid-cols-1 gap-2",
                for (name, value) in rows {
                    StatRow { key: "{name}", name: name.clone(), value }
                }
            }
        }
    }
}

/// Props for StatRow
#[derive(Props, Clone, PartialEq)]
pub struct StatRowProps {
    pub name: String,
    pub value: i32,
}

/// A single stat: label field, bar and numeric field
#[component]
pub fn StatRow(props: StatRowProps) -> Element {
    let service = use_sheet_service();
    let mut state = use_sheet_state();
    // Label edits stay local until the field loses focus.
    let mut draft = use_signal(|| props.name.clone());
    let mut value_draft = use_signal(|| ValueDraft::new(props.value));

    let bar_class = BarTier::from_value(props.value).css_class();
    let width = bar_width_percent(props.value);
    let glow_class = if state.glow.read().is_glowing(&props.name) {
        "stat-glow"
    } else {
        ""
    };

    let value_text = value_draft.read().text().to_string();
    let stored_value = props.value;

    let rename_service = service.clone();
    let old_name = props.name.clone();
    let edit_name = props.name.clone();

    rsx! {
        div {
            class: "flex items-center gap-2",
            input {
                r#type: "text",
                value: "{draft}",
                class: "bg-green-800 text-xs px-2 py-0.5 rounded w-24 text-center",
                oninput: move |evt: FormEvent| draft.set(evt.value()),
                onblur: move |_| {
                    let new_name = draft.read().clone();
                    state.rename_stat(&rename_service, &old_name, &new_name);
                    if new_name.is_empty() {
                        draft.set(old_name.clone());
                    }
                },
            }
            div {
                class: "relative flex-1 h-2 bg-green-900 overflow-hidden",
                div {
                    class: "h-2 stat-bar {bar_class} {glow_class}",
                    style: "width: {width}%;",
                }
            }
            input {
                r#type: "number",
                class: "bg-black text-green-400 border border-green-500 h-6 w-16 text-sm",
                value: "{value_text}",
                oninput: move |evt: FormEvent| {
                    let raw = evt.value();
                    value_draft.write().input(&raw);
                    state.edit_stat(&service, &edit_name, &raw);
                },
                onblur: move |_| value_draft.write().settle(stored_value),
            }
        }
    }
}

/// Text of a stat's numeric field.
///
/// Keeps whatever was typed, including a cleared field, so the stored value
/// does not snap back mid-edit. Only text that parses is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValueDraft {
    text: String,
}

impl ValueDraft {
    fn new(value: i32) -> Self {
        Self {
            text: value.to_string(),
        }
    }

    fn text(&self) -> &str {
        &self.text
    }

    /// Take new field text. Returns the value to store, if any.
    fn input(&mut self, raw: &str) -> Option<i32> {
        self.text = raw.to_string();
        parse_stat_input(raw)
    }

    /// On blur, show the stored value unless the text already means it
    fn settle(&mut self, stored: i32) {
        if parse_stat_input(&self.text) != Some(stored) {
            self.text = stored.to_string();
        }
    }
}
