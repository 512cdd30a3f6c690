//! Character sheet domain
//!
//! Pure state model for the character sheet editor: named stats rendered as
//! coloured bars, an ordered list of free-form abilities with multi-select
//! deletion, and a single avatar image reference. Nothing in this crate knows
//! about storage or rendering; the player crate drives it.

pub mod abilities;
pub mod avatar;
pub mod error;
pub mod glow;
pub mod sheet;
pub mod stats;

pub use abilities::{
    AbilityList, AbilitySelection, DepartingTags, DepartureBatch, InteractionMode,
    DEFAULT_ABILITIES, TAG_ANIMATION_MS,
};
pub use avatar::{
    avatar_from_file, encode_data_url, guess_image_mime, AvatarRef, AvatarRequests, AvatarTicket,
};
pub use error::SheetError;
pub use glow::{GlowToken, GlowTracker, GLOW_DURATION_MS};
pub use sheet::CharacterSheet;
pub use stats::{
    bar_width_percent, parse_stat_input, BarTier, RenameOutcome, Stat, StatSheet, DEFAULT_STATS,
};
