//! Sheet service - loads the character sheet and persists every edit
//!
//! This is the single controller between the UI and storage. The UI owns the
//! `CharacterSheet` value (in a signal) and passes it in for each edit; the
//! service mutates it through the domain API and writes back only the slot
//! that changed. Session-only state never passes through here.

use charsheet_domain::{
    AbilityList, AbilitySelection, AvatarRef, AvatarRequests, AvatarTicket, CharacterSheet,
    DepartingTags, DepartureBatch, GlowToken, GlowTracker, RenameOutcome, SheetError, StatSheet,
    GLOW_DURATION_MS, TAG_ANIMATION_MS,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::{future::Future, pin::Pin};

use crate::application::error::PersistError;
use crate::ports::outbound::storage_keys;
use crate::state::Platform;

/// Work to finish once a platform timer fires
pub type Deferred<T> = Pin<Box<dyn Future<Output = T> + 'static>>;

/// Service for loading and saving the character sheet
#[derive(Clone)]
pub struct SheetService {
    platform: Platform,
}

impl SheetService {
    /// Create a new SheetService over the given platform
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Rehydrate the sheet from storage.
    ///
    /// Missing or malformed slots fall back to the seed data. Stats and
    /// abilities are written back right away so storage always holds a
    /// readable snapshot; the avatar slot is only ever written once set.
    pub fn load(&self) -> CharacterSheet {
        let stats = self
            .load_slot::<StatSheet>(storage_keys::STATS)
            .unwrap_or_else(StatSheet::with_defaults);
        let abilities = self
            .load_slot::<AbilityList>(storage_keys::ABILITIES)
            .unwrap_or_else(AbilityList::with_defaults);
        let avatar = self.load_avatar();

        self.persist_stats(&stats);
        self.persist_abilities(&abilities);

        tracing::info!(
            stats = stats.len(),
            abilities = abilities.len(),
            has_avatar = avatar.is_some(),
            "Character sheet loaded"
        );

        CharacterSheet {
            stats,
            abilities,
            avatar,
        }
    }

    fn load_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.platform.storage_load(key)?;
        tracing::debug!(key, "Loading persisted slot");
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed persisted slot, using defaults");
                None
            }
        }
    }

    fn load_avatar(&self) -> Option<AvatarRef> {
        let raw = self.platform.storage_load(storage_keys::AVATAR_URL)?;
        match AvatarRef::parse(raw) {
            Ok(avatar) => Some(avatar),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable avatar reference");
                self.platform.storage_remove(storage_keys::AVATAR_URL);
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Stats
    // -------------------------------------------------------------------------

    /// Store raw field input under `key`.
    ///
    /// Returns the stored value; input without digits keeps the previous
    /// value and skips the write.
    pub fn set_stat_value(&self, sheet: &mut CharacterSheet, key: &str, raw: &str) -> Option<i32> {
        let stored = sheet.stats.set_value_from_input(key, raw);
        match stored {
            Some(_) => self.persist_stats(&sheet.stats),
            None => tracing::debug!(key, raw, "Ignoring non-numeric stat input"),
        }
        stored
    }

    /// Handle an edit of a stat's numeric field.
    ///
    /// The row glows whether or not the input parsed. The returned future
    /// resolves with the glow token once the glow should end; passing it to
    /// `GlowTracker::clear` turns the glow off unless a newer edit took over.
    pub fn edit_stat(
        &self,
        sheet: &mut CharacterSheet,
        glow: &mut GlowTracker,
        key: &str,
        raw: &str,
    ) -> Deferred<GlowToken> {
        self.set_stat_value(sheet, key, raw);
        let token = glow.ignite(key);
        let expiry = self.platform.sleep_ms(GLOW_DURATION_MS);
        Box::pin(async move {
            expiry.await;
            token
        })
    }

    /// Rename the stat at `old` to `new`.
    pub fn rename_stat(
        &self,
        sheet: &mut CharacterSheet,
        old: &str,
        new: &str,
    ) -> Result<RenameOutcome, SheetError> {
        let outcome = sheet.stats.rename(old, new)?;
        if let RenameOutcome::Overwrote { previous } = outcome {
            tracing::warn!(
                from = old,
                to = new,
                previous,
                "Stat rename replaced an existing stat"
            );
        }
        if outcome.changed() {
            self.persist_stats(&sheet.stats);
        }
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Abilities
    // -------------------------------------------------------------------------

    /// Append an ability. Blank text is ignored.
    pub fn add_ability(&self, sheet: &mut CharacterSheet, text: &str) -> bool {
        let added = sheet.abilities.add(text);
        if added {
            self.persist_abilities(&sheet.abilities);
        }
        added
    }

    /// Replace the ability text at `index`
    pub fn edit_ability(
        &self,
        sheet: &mut CharacterSheet,
        index: usize,
        text: &str,
    ) -> Result<(), SheetError> {
        sheet.abilities.edit_at(index, text)?;
        self.persist_abilities(&sheet.abilities);
        Ok(())
    }

    /// Remove the abilities at `indices` (positions before removal)
    pub fn delete_abilities(
        &self,
        sheet: &mut CharacterSheet,
        indices: &BTreeSet<usize>,
    ) -> Vec<String> {
        let removed = sheet.abilities.remove_indices(indices);
        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), "Deleted abilities");
            self.persist_abilities(&sheet.abilities);
        }
        removed
    }

    /// Delete the selected abilities now and start their exit animation.
    ///
    /// The list and storage change immediately; the removed texts go to
    /// `departing` for display only. The returned future resolves with the
    /// batch to expire once the animation is over.
    pub fn delete_selected(
        &self,
        sheet: &mut CharacterSheet,
        selection: &mut AbilitySelection,
        departing: &mut DepartingTags,
    ) -> Option<Deferred<DepartureBatch>> {
        let doomed = selection.take();
        let removed = self.delete_abilities(sheet, &doomed);
        let batch = departing.push(removed)?;
        let fade = self.platform.sleep_ms(TAG_ANIMATION_MS);
        Some(Box::pin(async move {
            fade.await;
            batch
        }))
    }

    // -------------------------------------------------------------------------
    // Avatar
    // -------------------------------------------------------------------------

    /// Commit a finished avatar read if no newer read has started since.
    pub fn commit_avatar<H>(
        &self,
        sheet: &mut CharacterSheet,
        requests: &mut AvatarRequests<H>,
        ticket: AvatarTicket,
        avatar: AvatarRef,
    ) -> bool {
        if !requests.finish(ticket) {
            tracing::debug!(request = ticket.id(), "Dropping superseded avatar read");
            return false;
        }
        self.platform
            .storage_save(storage_keys::AVATAR_URL, avatar.as_str());
        sheet.avatar = Some(avatar);
        true
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    fn persist_stats(&self, stats: &StatSheet) {
        self.persist(storage_keys::STATS, stats);
    }

    fn persist_abilities(&self, abilities: &AbilityList) {
        self.persist(storage_keys::ABILITIES, abilities);
    }

    /// Write failures are logged and swallowed; editing must continue.
    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_persist(key, value) {
            tracing::error!(key, error = %e, "Failed to persist slot");
        }
    }

    fn try_persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistError> {
        let json = serde_json::to_string(value).map_err(|source| PersistError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.platform.storage_save(key, &json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::mock::{create_mock_platform, MemoryStorageProvider};
    use crate::ports::outbound::StorageProvider;
    use charsheet_domain::encode_data_url;

    fn service_with(storage: &MemoryStorageProvider) -> SheetService {
        SheetService::new(create_mock_platform(storage.clone()))
    }

    fn loaded(storage: &MemoryStorageProvider) -> (SheetService, CharacterSheet) {
        let service = service_with(storage);
        let sheet = service.load();
        storage.clear_writes();
        (service, sheet)
    }

    #[test]
    fn load_from_empty_storage_seeds_defaults() {
        let storage = MemoryStorageProvider::new();
        let sheet = service_with(&storage).load();

        assert_eq!(sheet, CharacterSheet::seeded());
        assert_eq!(sheet.stats.len(), 7);
        assert_eq!(sheet.abilities.len(), 3);
        assert!(sheet.avatar.is_none());
        // Seeds are written back; the avatar slot stays untouched.
        assert_eq!(storage.keys(), vec!["abilities", "stats"]);
    }

    #[test]
    fn load_restores_persisted_slots() {
        let storage = MemoryStorageProvider::new()
            .with_value("stats", r#"{"運":12,"体力":99}"#)
            .with_value("abilities", r#"["剣術"]"#)
            .with_value("avatarUrl", "data:image/png;base64,AA==");
        let sheet = service_with(&storage).load();

        let names: Vec<_> = sheet.stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["運", "体力"]);
        assert_eq!(sheet.abilities.get(0), Some("剣術"));
        assert_eq!(
            sheet.avatar.as_ref().map(AvatarRef::as_str),
            Some("data:image/png;base64,AA==")
        );
    }

    #[test]
    fn malformed_slot_falls_back_independently() {
        let storage = MemoryStorageProvider::new()
            .with_value("stats", "{broken")
            .with_value("abilities", r#"["kept"]"#);
        let sheet = service_with(&storage).load();

        assert_eq!(sheet.stats, StatSheet::with_defaults());
        assert_eq!(sheet.abilities.get(0), Some("kept"));
        let repaired: StatSheet =
            serde_json::from_str(&storage.load("stats").unwrap_or_default()).unwrap();
        assert_eq!(repaired, StatSheet::with_defaults());
    }

    #[test]
    fn unreadable_avatar_is_discarded() {
        let storage = MemoryStorageProvider::new().with_value("avatarUrl", "not-a-data-url");
        let sheet = service_with(&storage).load();

        assert!(sheet.avatar.is_none());
        assert_eq!(storage.load("avatarUrl"), None);
    }

    #[test]
    fn stat_edit_persists_stats_slot_only() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);

        assert_eq!(service.set_stat_value(&mut sheet, "体力", "42"), Some(42));
        assert_eq!(storage.writes(), vec!["stats"]);

        let persisted: StatSheet =
            serde_json::from_str(&storage.load("stats").unwrap_or_default()).unwrap();
        assert_eq!(persisted.get("体力"), Some(42));
    }

    #[test]
    fn non_numeric_stat_edit_keeps_value_and_skips_write() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);

        assert_eq!(service.set_stat_value(&mut sheet, "体力", ""), None);
        assert_eq!(sheet.stats.get("体力"), Some(70));
        assert!(storage.writes().is_empty());
    }

    #[test]
    fn noop_rename_does_not_write() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);
        let before = sheet.clone();

        assert_eq!(
            service.rename_stat(&mut sheet, "体力", ""),
            Ok(RenameOutcome::Unchanged)
        );
        assert_eq!(
            service.rename_stat(&mut sheet, "体力", "体力"),
            Ok(RenameOutcome::Unchanged)
        );
        assert_eq!(sheet, before);
        assert!(storage.writes().is_empty());
    }

    #[test]
    fn colliding_rename_overwrites_and_persists() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);

        let outcome = service.rename_stat(&mut sheet, "体力", "筋力").unwrap();
        assert_eq!(outcome, RenameOutcome::Overwrote { previous: 60 });
        assert_eq!(sheet.stats.len(), 6);
        assert_eq!(sheet.stats.get("筋力"), Some(70));
        assert_eq!(storage.writes(), vec!["stats"]);
    }

    #[test]
    fn blank_ability_is_not_added() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);

        assert!(!service.add_ability(&mut sheet, "   "));
        assert_eq!(sheet.abilities.len(), 3);
        assert!(storage.writes().is_empty());

        assert!(service.add_ability(&mut sheet, "  foo  "));
        assert_eq!(sheet.abilities.get(3), Some("foo"));
        assert_eq!(
            storage.load("abilities").as_deref(),
            Some(r#"["ハッキング","コピーライティング","作曲家","foo"]"#)
        );
    }

    #[test]
    fn edit_out_of_range_is_rejected() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);

        assert!(service.edit_ability(&mut sheet, 9, "x").is_err());
        assert!(storage.writes().is_empty());
        service.edit_ability(&mut sheet, 0, "ハック").unwrap();
        assert_eq!(sheet.abilities.get(0), Some("ハック"));
    }

    #[test]
    fn selection_changes_never_touch_storage() {
        let storage = MemoryStorageProvider::new()
            .with_value("abilities", r#"["a","b","c","d"]"#);
        let (service, mut sheet) = loaded(&storage);

        let mut selection = AbilitySelection::new();
        selection.toggle_mode();
        selection.toggle(0);
        selection.toggle(2);
        assert!(storage.writes().is_empty());

        let doomed = selection.take();
        assert_eq!(service.delete_abilities(&mut sheet, &doomed), vec!["a", "c"]);
        assert_eq!(storage.load("abilities").as_deref(), Some(r#"["b","d"]"#));
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn delete_during_exit_animation_uses_current_positions() {
        let storage = MemoryStorageProvider::new()
            .with_value("abilities", r#"["a","b","c","d"]"#);
        let (service, mut sheet) = loaded(&storage);
        let mut selection = AbilitySelection::new();
        let mut departing = DepartingTags::new();
        selection.toggle_mode();

        selection.toggle(0);
        let first = service.delete_selected(&mut sheet, &mut selection, &mut departing);
        assert!(first.is_some());
        assert_eq!(storage.load("abilities").as_deref(), Some(r#"["b","c","d"]"#));

        // "a" is still animating out; "c" is picked at its current position.
        assert!(selection.is_selecting());
        let c = sheet.abilities.iter().position(|t| t == "c").unwrap();
        selection.toggle(c);
        let second = service.delete_selected(&mut sheet, &mut selection, &mut departing);
        assert!(second.is_some());

        assert_eq!(sheet.abilities, AbilityList::new(vec!["b".into(), "d".into()]));
        assert_eq!(storage.load("abilities").as_deref(), Some(r#"["b","d"]"#));
        let leaving: Vec<_> = departing.iter().map(|(_, t)| t).collect();
        assert_eq!(leaving, vec!["a", "c"]);
    }

    #[test]
    fn delete_with_nothing_selected_is_noop() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);
        let mut selection = AbilitySelection::new();
        let mut departing = DepartingTags::new();
        selection.toggle_mode();
        selection.toggle(7);

        assert!(service
            .delete_selected(&mut sheet, &mut selection, &mut departing)
            .is_none());
        assert_eq!(sheet.abilities.len(), 3);
        assert!(departing.is_empty());
        assert!(storage.writes().is_empty());
    }

    #[test]
    fn stale_avatar_read_is_dropped() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);

        let mut requests: AvatarRequests = AvatarRequests::new();
        let (first, _) = requests.begin();
        let (second, _) = requests.begin();

        let newest = encode_data_url("image/png", b"new");
        assert!(service.commit_avatar(&mut sheet, &mut requests, second, newest.clone()));
        // The first read finishes last but must not win.
        let stale = encode_data_url("image/png", b"old");
        assert!(!service.commit_avatar(&mut sheet, &mut requests, first, stale));

        assert_eq!(sheet.avatar, Some(newest.clone()));
        assert_eq!(storage.load("avatarUrl").as_deref(), Some(newest.as_str()));
        assert_eq!(storage.writes(), vec!["avatarUrl"]);
    }

    #[test]
    fn reload_round_trips_edits() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);
        service.set_stat_value(&mut sheet, "知識", "12");
        service.rename_stat(&mut sheet, "筋力", "腕力").unwrap();
        service.add_ability(&mut sheet, "料理");

        let reloaded = service_with(&storage).load();
        assert_eq!(reloaded, sheet);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn timed_service(storage: &MemoryStorageProvider) -> SheetService {
        use crate::infrastructure::platform::DesktopSleepProvider;
        SheetService::new(Platform::new(DesktopSleepProvider, storage.clone()))
    }

    #[test]
    fn second_avatar_pick_cancels_the_first() {
        let storage = MemoryStorageProvider::new();
        let (service, mut sheet) = loaded(&storage);
        let mut requests = AvatarRequests::new();
        let mut cancelled = Vec::new();

        let (first, superseded) = requests.begin();
        cancelled.extend(superseded);
        requests.attach(first, "read-1");
        let (second, superseded) = requests.begin();
        cancelled.extend(superseded);
        requests.attach(second, "read-2");
        assert_eq!(cancelled, vec!["read-1"]);

        // Had the first read slipped through before cancellation, it is still dropped.
        let old = encode_data_url("image/png", b"old");
        assert!(!service.commit_avatar(&mut sheet, &mut requests, first, old));
        assert_eq!(requests.in_flight(), Some(&"read-2"));

        let new = encode_data_url("image/png", b"new");
        assert!(service.commit_avatar(&mut sheet, &mut requests, second, new.clone()));
        assert_eq!(requests.in_flight(), None);
        assert_eq!(sheet.avatar, Some(new));
        assert_eq!(storage.writes(), vec!["avatarUrl"]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test(start_paused = true)]
    async fn stat_edit_glows_until_expiry() {
        let storage = MemoryStorageProvider::new();
        let service = timed_service(&storage);
        let mut sheet = service.load();
        let mut glow = GlowTracker::new();

        let start = tokio::time::Instant::now();
        let fade = service.edit_stat(&mut sheet, &mut glow, "体力", "42");
        assert_eq!(sheet.stats.get("体力"), Some(42));
        assert!(glow.is_glowing("体力"));
        assert!(!glow.is_glowing("筋力"));

        let token = fade.await;
        assert_eq!(
            start.elapsed(),
            std::time::Duration::from_millis(GLOW_DURATION_MS)
        );
        assert!(glow.clear(token));
        assert_eq!(glow.active(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test(start_paused = true)]
    async fn re_edit_extends_the_glow() {
        let storage = MemoryStorageProvider::new();
        let service = timed_service(&storage);
        let mut sheet = service.load();
        let mut glow = GlowTracker::new();

        let first = service.edit_stat(&mut sheet, &mut glow, "体力", "42");
        tokio::time::advance(std::time::Duration::from_millis(300)).await;
        let second = service.edit_stat(&mut sheet, &mut glow, "体力", "43");

        // The first timer ends while the second edit is still glowing.
        assert!(!glow.clear(first.await));
        assert!(glow.is_glowing("体力"));

        assert!(glow.clear(second.await));
        assert!(!glow.is_glowing("体力"));
        assert_eq!(sheet.stats.get("体力"), Some(43));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test(start_paused = true)]
    async fn non_numeric_edit_still_glows() {
        let storage = MemoryStorageProvider::new();
        let service = timed_service(&storage);
        let mut sheet = service.load();
        storage.clear_writes();
        let mut glow = GlowTracker::new();

        let fade = service.edit_stat(&mut sheet, &mut glow, "体力", "abc");
        assert!(glow.is_glowing("体力"));
        assert_eq!(sheet.stats.get("体力"), Some(70));
        assert!(storage.writes().is_empty());
        assert!(glow.clear(fade.await));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test(start_paused = true)]
    async fn departing_tags_clear_after_animation() {
        let storage = MemoryStorageProvider::new();
        let service = timed_service(&storage);
        let mut sheet = service.load();
        let mut selection = AbilitySelection::new();
        let mut departing = DepartingTags::new();
        selection.toggle_mode();

        selection.toggle(0);
        let first = service
            .delete_selected(&mut sheet, &mut selection, &mut departing)
            .unwrap();
        tokio::time::advance(std::time::Duration::from_millis(200)).await;
        selection.toggle(0);
        let second = service
            .delete_selected(&mut sheet, &mut selection, &mut departing)
            .unwrap();

        let start = tokio::time::Instant::now();
        assert!(departing.expire(first.await));
        assert_eq!(
            start.elapsed(),
            std::time::Duration::from_millis(TAG_ANIMATION_MS - 200)
        );
        // The second batch keeps animating after the first one ends.
        let leaving: Vec<_> = departing.iter().map(|(_, t)| t).collect();
        assert_eq!(leaving, vec!["コピーライティング"]);

        assert!(departing.expire(second.await));
        assert!(departing.is_empty());
        assert_eq!(sheet.abilities.len(), 1);
    }
}
