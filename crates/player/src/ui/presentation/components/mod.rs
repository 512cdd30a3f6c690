//! UI components for the character sheet

pub mod ability_panel;
pub mod avatar_panel;
pub mod stat_panel;

pub use ability_panel::{AbilityPanel, AbilityTag};
pub use avatar_panel::AvatarPanel;
pub use stat_panel::{StatPanel, StatRow};
