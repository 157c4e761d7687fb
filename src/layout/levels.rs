//! Per-level style overrides.
//!
//! Maps a nesting level (depth from the top node, first ring = 1) to option
//! overrides. Consumed by downstream styling only; the layout itself is
//! level-agnostic beyond the radius increment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Style overrides for one nesting level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelOptions {
    /// The nesting level the overrides apply to.
    pub level: u32,
    /// Fill color override (any renderer-understood color string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Arc border width override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    /// Fixed data-label rotation in degrees, replacing the computed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_rotation: Option<f64>,
}

/// Level-indexed lookup of option overrides.
///
/// Later entries for the same level win, matching last-writer option merge.
#[derive(Debug, Clone, Default)]
pub struct LevelMap {
    map: HashMap<u32, LevelOptions>,
}

impl LevelMap {
    /// Fold a list of level options into a lookup map.
    pub fn from_options(levels: &[LevelOptions]) -> Self {
        let mut map = HashMap::with_capacity(levels.len());
        for level in levels {
            map.insert(level.level, level.clone());
        }
        Self { map }
    }

    /// Overrides for a level, if any were configured.
    pub fn get(&self, level: u32) -> Option<&LevelOptions> {
        self.map.get(&level)
    }

    /// Number of configured levels.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no level overrides are configured.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
