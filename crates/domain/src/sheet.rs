//! The persisted character sheet aggregate

use crate::abilities::AbilityList;
use crate::avatar::AvatarRef;
use crate::stats::StatSheet;

/// Everything that survives a reload: stats, abilities and the avatar.
///
/// Session-only state (glow, select mode, selection) is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSheet {
    pub stats: StatSheet,
    pub abilities: AbilityList,
    pub avatar: Option<AvatarRef>,
}

impl CharacterSheet {
    /// Sheet used on first start
    pub fn seeded() -> Self {
        Self {
            stats: StatSheet::with_defaults(),
            abilities: AbilityList::with_defaults(),
            avatar: None,
        }
    }
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self::seeded()
    }
}
