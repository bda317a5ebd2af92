//! Elapsed and current-time classification for grid cells.
//!
//! Recomputed from scratch on every tick (the host drives a ~60s timer), so
//! repeated identical calls always produce the same map and a grid that is
//! no longer "today" simply gets an empty one.

use std::collections::HashMap;

use chrono::NaiveTime;

use crate::models::block::BlockKey;

use super::coords::GridCoordinateSystem;

/// Visual time state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeMark {
    /// Fully past. `on_dark_background` tells the renderer which overlay
    /// contrast to use against the cell's own color.
    Elapsed { on_dark_background: bool },
    /// Contains "now". `percent_into_block` (0..100) positions the moving
    /// indicator inside the cell.
    Current { percent_into_block: f32 },
}

pub struct ElapsedTimeCalculator<'a> {
    coords: &'a GridCoordinateSystem,
}

impl<'a> ElapsedTimeCalculator<'a> {
    pub fn new(coords: &'a GridCoordinateSystem) -> Self {
        Self { coords }
    }

    /// Classify every cell of a grid for an instant `now`.
    ///
    /// `cell_color_of` supplies each cell's current background and `is_dark`
    /// judges it, so elapsed marks can be tagged for contrast. When the grid
    /// is not the operative today, every classification clears.
    pub fn classify(
        &self,
        now: NaiveTime,
        is_effective_today: bool,
        cell_color_of: &dyn Fn(BlockKey) -> String,
        is_dark: &dyn Fn(&str) -> bool,
    ) -> HashMap<BlockKey, TimeMark> {
        let mut marks = HashMap::new();
        if !is_effective_today {
            return marks;
        }

        let position = self.coords.position_at(now);
        let now_ordinal = self.coords.ordinal(position.key);

        for ordinal in 0..now_ordinal {
            let key = self.coords.key_at(ordinal);
            marks.insert(
                key,
                TimeMark::Elapsed {
                    on_dark_background: is_dark(&cell_color_of(key)),
                },
            );
        }
        marks.insert(
            position.key,
            TimeMark::Current {
                percent_into_block: position.percent_into_block,
            },
        );
        marks
    }
}
