//! Stat sheet
//!
//! Stats are named integer attributes, nominally 0-100, shown as a proportional
//! bar whose colour depends on the value band. The name is both the label and
//! the identity of a stat, so renaming is the only way to change a key.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SheetError;

/// Seed stats used when nothing has been persisted yet
pub const DEFAULT_STATS: [(&str, i32); 7] = [
    ("集中力", 50),
    ("体力", 70),
    ("筋力", 60),
    ("稼ぐ力", 80),
    ("コミュ力", 75),
    ("知識", 90),
    ("ストレス耐性", 40),
];

/// A single named stat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub value: i32,
}

/// Result of a rename request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Empty or identical name; the sheet was not touched
    Unchanged,
    /// The stat now lives under the new name
    Renamed,
    /// The new name already existed and its value was replaced
    Overwrote { previous: i32 },
}

impl RenameOutcome {
    /// Whether the sheet changed and needs persisting
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Ordered mapping from stat name to value.
///
/// Insertion order is preserved so rows keep their place across reloads;
/// the serialized form is a plain JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatSheet {
    entries: Vec<Stat>,
}

impl StatSheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the seed sheet with the seven default stats
    pub fn with_defaults() -> Self {
        DEFAULT_STATS
            .iter()
            .map(|(name, value)| ((*name).to_string(), *value))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stat> {
        self.entries.iter()
    }

    /// Get the value stored under `name`
    pub fn get(&self, name: &str) -> Option<i32> {
        self.position(name).map(|idx| self.entries[idx].value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|s| s.name == name)
    }

    /// Store `value` under `name`, appending a new stat if the name is unknown.
    ///
    /// No range clamping happens here; the bar clamps when it renders.
    pub fn set_value(&mut self, name: &str, value: i32) {
        match self.position(name) {
            Some(idx) => self.entries[idx].value = value,
            None => self.entries.push(Stat {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Parse raw field input and store it under `name`.
    ///
    /// Returns the stored value, or `None` when the input holds no digits;
    /// in that case the previous value is kept.
    pub fn set_value_from_input(&mut self, name: &str, raw: &str) -> Option<i32> {
        let value = parse_stat_input(raw)?;
        self.set_value(name, value);
        Some(value)
    }

    /// Move the value at `old` to `new`.
    ///
    /// Empty or identical names leave the sheet untouched. A colliding `new`
    /// name loses its previous value, which is reported in the outcome. The
    /// renamed stat keeps its row position.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<RenameOutcome, SheetError> {
        if new.is_empty() || new == old {
            return Ok(RenameOutcome::Unchanged);
        }

        let idx = self
            .position(old)
            .ok_or_else(|| SheetError::unknown_stat(old))?;

        let outcome = match self.position(new) {
            Some(collision) => {
                let previous = self.entries[collision].value;
                self.entries.remove(collision);
                RenameOutcome::Overwrote { previous }
            }
            None => RenameOutcome::Renamed,
        };

        // `idx` shifts down by one if the removed collision sat before it.
        let idx = match outcome {
            RenameOutcome::Overwrote { .. } => self
                .position(old)
                .ok_or_else(|| SheetError::unknown_stat(old))?,
            _ => idx,
        };
        self.entries[idx].name = new.to_string();

        Ok(outcome)
    }
}

impl FromIterator<(String, i32)> for StatSheet {
    fn from_iter<I: IntoIterator<Item = (String, i32)>>(iter: I) -> Self {
        let mut sheet = StatSheet::new();
        for (name, value) in iter {
            sheet.set_value(&name, value);
        }
        sheet
    }
}

impl Serialize for StatSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for stat in &self.entries {
            map.serialize_entry(&stat.name, &stat.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatSheet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatSheetVisitor;

        impl<'de> Visitor<'de> for StatSheetVisitor {
            type Value = StatSheet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of stat names to integer values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StatSheet, A::Error> {
                let mut sheet = StatSheet::new();
                while let Some((name, StoredValue(value))) =
                    access.next_entry::<String, StoredValue>()?
                {
                    sheet.set_value(&name, value);
                }
                Ok(sheet)
            }
        }

        deserializer.deserialize_map(StatSheetVisitor)
    }
}

/// A single persisted stat value.
///
/// Older snapshots may hold `null` where a non-numeric edit was stored, and
/// hand-edited ones may hold fractions or numeric strings. These are read the
/// way field input is: `null` is 0, fractions truncate toward zero, strings
/// go through `parse_stat_input`. Out-of-range numbers saturate.
struct StoredValue(i32);

impl<'de> Deserialize<'de> for StoredValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoredValueVisitor;

        impl<'de> Visitor<'de> for StoredValueVisitor {
            type Value = StoredValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, numeric string or null")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<StoredValue, E> {
                Ok(StoredValue(
                    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
                ))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<StoredValue, E> {
                Ok(StoredValue(i32::try_from(v).unwrap_or(i32::MAX)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<StoredValue, E> {
                // `as` truncates toward zero and saturates.
                Ok(StoredValue(v as i32))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StoredValue, E> {
                Ok(StoredValue(parse_stat_input(v).unwrap_or(0)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<StoredValue, E> {
                Ok(StoredValue(0))
            }

            fn visit_none<E: de::Error>(self) -> Result<StoredValue, E> {
                Ok(StoredValue(0))
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<StoredValue, D::Error> {
                StoredValue::deserialize(d)
            }
        }

        deserializer.deserialize_any(StoredValueVisitor)
    }
}

/// Parse stat field input using integer-prefix rules.
///
/// Surrounding whitespace and a leading sign are accepted, parsing stops at
/// the first non-digit, and out-of-range numbers saturate. Returns `None`
/// when no digit is present.
pub fn parse_stat_input(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    let signed = if negative { -magnitude } else { magnitude };
    Some(signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Colour band of a stat bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarTier {
    White,
    Pink,
    Red,
    Orange,
    Yellow,
    Lime,
    Cyan,
    Gray,
}

impl BarTier {
    /// All tiers from highest band to lowest
    pub const ALL: [BarTier; 8] = [
        Self::White,
        Self::Pink,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Lime,
        Self::Cyan,
        Self::Gray,
    ];

    /// Pick the band for a value; each band includes its lower bound.
    pub fn from_value(value: i32) -> Self {
        match value {
            v if v >= 90 => Self::White,
            v if v >= 80 => Self::Pink,
            v if v >= 70 => Self::Red,
            v if v >= 60 => Self::Orange,
            v if v >= 50 => Self::Yellow,
            v if v >= 40 => Self::Lime,
            v if v >= 30 => Self::Cyan,
            _ => Self::Gray,
        }
    }

    /// Lowest value that still falls in this band
    pub fn lower_bound(&self) -> Option<i32> {
        match self {
            Self::White => Some(90),
            Self::Pink => Some(80),
            Self::Red => Some(70),
            Self::Orange => Some(60),
            Self::Yellow => Some(50),
            Self::Lime => Some(40),
            Self::Cyan => Some(30),
            Self::Gray => None,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::White => "bg-white",
            Self::Pink => "bg-pink-400",
            Self::Red => "bg-red-500",
            Self::Orange => "bg-orange-400",
            Self::Yellow => "bg-yellow-300",
            Self::Lime => "bg-lime-400",
            Self::Cyan => "bg-cyan-400",
            Self::Gray => "bg-gray-500",
        }
    }
}

/// Bar width in percent, clamped to 0-100 for display
pub fn bar_width_percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}
