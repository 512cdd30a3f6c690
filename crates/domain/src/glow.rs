//! Transient highlight on a freshly edited stat row

/// How long a stat row glows after an edit
pub const GLOW_DURATION_MS: u64 = 600;

/// Handle returned when a glow starts; needed to clear it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlowToken {
    generation: u64,
}

/// Tracks which stat row, if any, is glowing.
///
/// Each ignition bumps a generation counter. Clearing with an older token
/// is ignored, so a second edit inside the window keeps the glow alive
/// until its own timer fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlowTracker {
    active: Option<String>,
    generation: u64,
}

impl GlowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignite(&mut self, key: impl Into<String>) -> GlowToken {
        self.generation += 1;
        self.active = Some(key.into());
        GlowToken {
            generation: self.generation,
        }
    }

    /// Clear the glow if `token` is still the newest. Returns whether it cleared.
    pub fn clear(&mut self, token: GlowToken) -> bool {
        if token.generation != self.generation || self.active.is_none() {
            return false;
        }
        self.active = None;
        true
    }

    pub fn is_glowing(&self, key: &str) -> bool {
        self.active.as_deref() == Some(key)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}
