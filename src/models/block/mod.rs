// Block module
// Sparse per-cell data for the time-block grids

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two parallel grids a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// How the day was actually spent
    Actual,
    /// How the day was meant to be spent
    Goal,
}

impl GridKind {
    /// Only the actual grid remembers what color a cell had before its last repaint.
    pub fn tracks_previous_color(&self) -> bool {
        matches!(self, GridKind::Actual)
    }
}

/// Position of a cell: hour row in [0, 24), block column in [0, blocks_per_hour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey {
    pub hour: u8,
    pub block: u8,
}

impl BlockKey {
    pub fn new(hour: u8, block: u8) -> Self {
        Self { hour, block }
    }

    /// Linear position of the cell, used for all range comparisons
    /// (drag bounding boxes, resize clamping).
    pub fn ordinal(&self, blocks_per_hour: u8) -> u32 {
        self.hour as u32 * blocks_per_hour as u32 + self.block as u32
    }

    /// Inverse of [`BlockKey::ordinal`].
    pub fn from_ordinal(ordinal: u32, blocks_per_hour: u8) -> Self {
        let per_hour = blocks_per_hour as u32;
        Self {
            hour: (ordinal / per_hour) as u8,
            block: (ordinal % per_hour) as u8,
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hour, self.block)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockKeyError {
    #[error("block key must look like \"<hour>-<block>\", got {0:?}")]
    Malformed(String),
    #[error("hour index {0} is outside 0..24")]
    HourOutOfRange(u8),
}

impl FromStr for BlockKey {
    type Err = BlockKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BlockKeyError::Malformed(s.to_string());
        let (hour, block) = s.split_once('-').ok_or_else(malformed)?;
        let hour: u8 = hour.parse().map_err(|_| malformed())?;
        let block: u8 = block.parse().map_err(|_| malformed())?;
        if hour >= 24 {
            return Err(BlockKeyError::HourOutOfRange(hour));
        }
        Ok(Self { hour, block })
    }
}

// Keys serialize as "hour-block" strings so an exported grid is a plain
// sparse JSON object the host can persist as-is.
impl Serialize for BlockKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = BlockKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a \"<hour>-<block>\" string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<BlockKey, E> {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

/// Cell payload. A default block is never exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub text: String,
    pub color: String,
    /// Color the cell had before its most recent repaint. Tracked on the
    /// actual grid only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_color: Option<String>,
}

impl Block {
    /// A pristine cell carrying the grid's default color.
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            color: color.into(),
            previous_color: None,
        }
    }

    /// A block is default iff it has no text, its color equals the grid's
    /// default color (compared after normalization), and no previous color
    /// is remembered.
    pub fn is_default(&self, default_color: &str, normalize: &dyn Fn(&str) -> String) -> bool {
        self.text.is_empty()
            && self.previous_color.is_none()
            && normalize(&self.color) == normalize(default_color)
    }
}
