//! Character sheet state management
//!
//! Holds the persisted sheet alongside the session-only state the editor
//! needs (glow, select mode, departing tags, the new-ability buffer and
//! avatar read bookkeeping). `SheetService` decides what changes and when a
//! timer ends; this layer only owns the signals and spawns the waits.

use charsheet_domain::{
    avatar_from_file, AbilitySelection, AvatarRequests, CharacterSheet, DepartingTags,
    GlowTracker,
};
use dioxus::core::{spawn_forever, Task};
use dioxus::html::FileData;
use dioxus::prelude::*;
use std::sync::Arc;

use crate::application::services::SheetService;

/// Sheet state shared through Dioxus context
#[derive(Clone, Copy)]
pub struct SheetState {
    /// Persisted stats, abilities and avatar
    pub sheet: Signal<CharacterSheet>,
    /// Which stat row is glowing after an edit
    pub glow: Signal<GlowTracker>,
    /// Select mode and selected ability positions
    pub selection: Signal<AbilitySelection>,
    /// Deleted tags still playing their exit animation
    pub departing: Signal<DepartingTags>,
    /// Text typed into the add-ability field
    pub new_ability: Signal<String>,
    /// Avatar request ids and the read in flight
    pub avatar_reads: Signal<AvatarRequests<Task>>,
}

impl SheetState {
    /// Create a new SheetState around a loaded sheet
    pub fn new(sheet: CharacterSheet) -> Self {
        Self {
            sheet: Signal::new(sheet),
            glow: Signal::new(GlowTracker::new()),
            selection: Signal::new(AbilitySelection::new()),
            departing: Signal::new(DepartingTags::new()),
            new_ability: Signal::new(String::new()),
            avatar_reads: Signal::new(AvatarRequests::new()),
        }
    }

    /// Store a stat value typed into its numeric field and light the row up
    pub fn edit_stat(&mut self, service: &Arc<SheetService>, key: &str, raw: &str) {
        let fade = service.edit_stat(&mut self.sheet.write(), &mut self.glow.write(), key, raw);
        let mut glow = self.glow;
        // Outlives the row, which remounts when the stat is renamed.
        spawn_forever(async move {
            let token = fade.await;
            glow.write().clear(token);
        });
    }

    /// Commit a label edit
    pub fn rename_stat(&mut self, service: &Arc<SheetService>, old: &str, new: &str) {
        if let Err(e) = service.rename_stat(&mut self.sheet.write(), old, new) {
            tracing::warn!(error = %e, "Stat rename rejected");
        }
    }

    /// Add the buffered ability text, clearing the buffer on success
    pub fn add_ability(&mut self, service: &Arc<SheetService>) {
        let text = self.new_ability.read().clone();
        if service.add_ability(&mut self.sheet.write(), &text) {
            self.new_ability.set(String::new());
        }
    }

    pub fn edit_ability(&mut self, service: &Arc<SheetService>, index: usize, text: &str) {
        if let Err(e) = service.edit_ability(&mut self.sheet.write(), index, text) {
            tracing::warn!(error = %e, "Ability edit rejected");
        }
    }

    /// Clicking a tag only matters in select mode
    pub fn click_ability(&mut self, index: usize) {
        self.selection.write().toggle(index);
    }

    pub fn toggle_select_mode(&mut self) {
        let mode = self.selection.write().toggle_mode();
        tracing::debug!(?mode, "Ability interaction mode changed");
    }

    /// Remove the selected abilities now; copies animate out afterwards
    pub fn delete_selected(&mut self, service: &Arc<SheetService>) {
        let fade = service.delete_selected(
            &mut self.sheet.write(),
            &mut self.selection.write(),
            &mut self.departing.write(),
        );
        let Some(fade) = fade else {
            return;
        };
        let mut departing = self.departing;
        spawn_forever(async move {
            let batch = fade.await;
            departing.write().expire(batch);
        });
    }

    /// Read a picked image file and make it the avatar.
    ///
    /// A newer pick cancels the older read; the request id check covers
    /// a read that completes between cancellation and commit.
    pub fn load_avatar(&mut self, service: &Arc<SheetService>, file: FileData) {
        let (ticket, superseded) = self.avatar_reads.write().begin();
        if let Some(previous) = superseded {
            previous.cancel();
        }

        let mut sheet = self.sheet;
        let mut reads = self.avatar_reads;
        let service = service.clone();
        let task = spawn(async move {
            let name = file.name();
            match file.read_bytes().await {
                Ok(bytes) => {
                    let avatar = avatar_from_file(&name, file.content_type(), &bytes);
                    service.commit_avatar(&mut sheet.write(), &mut reads.write(), ticket, avatar);
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Failed to read avatar file");
                    reads.write().finish(ticket);
                }
            }
        });
        self.avatar_reads.write().attach(ticket, task);
    }
}

/// Hook to access the SheetState from context
pub fn use_sheet_state() -> SheetState {
    use_context::<SheetState>()
}
