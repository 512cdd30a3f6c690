//! Ability tags and multi-select deletion
//!
//! Abilities are identified only by their position. Deletion works against
//! a set of positions picked while select mode is active.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SheetError;

/// Seed abilities used when nothing has been persisted yet
pub const DEFAULT_ABILITIES: [&str; 3] = ["ハッキング", "コピーライティング", "作曲家"];

/// Ordered list of free-form ability tags
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityList {
    items: Vec<String>,
}

impl AbilityList {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_ABILITIES.iter().map(|s| (*s).to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Append trimmed text. Returns `false` when the text is blank.
    pub fn add(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    /// Replace the text at `index` verbatim
    pub fn edit_at(&mut self, index: usize, text: impl Into<String>) -> Result<(), SheetError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(SheetError::AbilityIndexOutOfRange { index, len })?;
        *slot = text.into();
        Ok(())
    }

    /// Drop every ability whose position is in `indices`.
    ///
    /// Positions refer to the list as it is before the call; positions past
    /// the end are ignored. Returns the removed texts in list order.
    pub fn remove_indices(&mut self, indices: &BTreeSet<usize>) -> Vec<String> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .enumerate()
            .partition(|(position, _)| indices.contains(position));
        self.items = kept.into_iter().map(|(_, text)| text).collect();
        removed.into_iter().map(|(_, text)| text).collect()
    }

    /// Remove the selected abilities and clear the selection
    pub fn delete_selected(&mut self, selection: &mut AbilitySelection) -> Vec<String> {
        let doomed = selection.take();
        self.remove_indices(&doomed)
    }
}

/// Interaction mode of the ability cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Normal,
    Selecting,
}

/// Session-only selection state for the ability cloud
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbilitySelection {
    mode: InteractionMode,
    selected: BTreeSet<usize>,
}

impl AbilitySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_selecting(&self) -> bool {
        self.mode == InteractionMode::Selecting
    }

    /// Flip between normal and select mode.
    ///
    /// Leaving select mode drops the selection so stale positions cannot
    /// resurface later.
    pub fn toggle_mode(&mut self) -> InteractionMode {
        self.mode = match self.mode {
            InteractionMode::Normal => InteractionMode::Selecting,
            InteractionMode::Selecting => {
                self.selected.clear();
                InteractionMode::Normal
            }
        };
        self.mode
    }

    /// Flip membership of `index`. Ignored outside select mode.
    pub fn toggle(&mut self, index: usize) -> bool {
        if !self.is_selecting() {
            return false;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        true
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Whether the delete control should be offered
    pub fn can_delete(&self) -> bool {
        self.is_selecting() && !self.selected.is_empty()
    }

    /// Take the current selection, leaving it empty
    pub fn take(&mut self) -> BTreeSet<usize> {
        std::mem::take(&mut self.selected)
    }
}

/// Duration of the tag enter/exit animation
pub const TAG_ANIMATION_MS: u64 = 400;

/// Batch id for tags removed by one delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepartureBatch(u64);

impl DepartureBatch {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Copies of deleted tags kept only while their exit animation plays.
///
/// The list itself is already updated when a batch arrives here, so
/// selecting or deleting again during the animation sees current positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartingTags {
    batches: Vec<(DepartureBatch, Vec<String>)>,
    next: u64,
}

impl DepartingTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record removed texts. `None` when nothing was removed.
    pub fn push(&mut self, texts: Vec<String>) -> Option<DepartureBatch> {
        if texts.is_empty() {
            return None;
        }
        self.next += 1;
        let batch = DepartureBatch(self.next);
        self.batches.push((batch, texts));
        Some(batch)
    }

    /// Drop a batch whose animation has finished; other batches stay
    pub fn expire(&mut self, batch: DepartureBatch) -> bool {
        let before = self.batches.len();
        self.batches.retain(|(b, _)| *b != batch);
        self.batches.len() != before
    }

    /// Every departing tag with its batch, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (DepartureBatch, &str)> {
        self.batches
            .iter()
            .flat_map(|(batch, texts)| texts.iter().map(move |t| (*batch, t.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
