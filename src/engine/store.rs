//! Sparse cell storage for one grid.
//!
//! Cells are materialized with defaults on first access, only ever reset
//! (never removed), and exported only when they differ from the default.

use std::collections::{BTreeMap, HashMap};

use crate::models::block::{Block, BlockKey};

pub struct BlockStore {
    cells: HashMap<BlockKey, Block>,
    default_color: String,
    tracks_previous_color: bool,
}

impl BlockStore {
    pub fn new(default_color: impl Into<String>, tracks_previous_color: bool) -> Self {
        Self {
            cells: HashMap::new(),
            default_color: default_color.into(),
            tracks_previous_color,
        }
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    pub fn tracks_previous_color(&self) -> bool {
        self.tracks_previous_color
    }

    /// Current view of a cell without materializing it. Used by the render
    /// pass, which must not mutate the store.
    pub fn peek(&self, key: BlockKey) -> Block {
        self.cells
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Block::with_color(&self.default_color))
    }

    /// Materialize-on-first-access lookup.
    pub fn get(&mut self, key: BlockKey) -> &Block {
        let default_color = self.default_color.clone();
        self.cells
            .entry(key)
            .or_insert_with(|| Block::with_color(default_color))
    }

    /// Write a cell's text and color. `color_at_interaction_start` is the
    /// color the cell had when the current gesture began; on a grid that
    /// tracks previous colors it becomes `previous_color` iff the repaint
    /// actually changed the (normalized) color, and is cleared otherwise.
    pub fn set(
        &mut self,
        key: BlockKey,
        text: &str,
        color: &str,
        color_at_interaction_start: &str,
        normalize: &dyn Fn(&str) -> String,
    ) {
        let default_color = self.default_color.clone();
        let cell = self
            .cells
            .entry(key)
            .or_insert_with(|| Block::with_color(default_color));
        cell.text = text.to_string();
        cell.color = color.to_string();
        if self.tracks_previous_color {
            if normalize(color) != normalize(color_at_interaction_start) {
                cell.previous_color = Some(color_at_interaction_start.to_string());
            } else {
                cell.previous_color = None;
            }
        }
    }

    /// Non-default cells only, ordered by position. Pure with respect to the
    /// store: materialized-but-default cells are omitted, not removed.
    pub fn export_non_default(&self, normalize: &dyn Fn(&str) -> String) -> BTreeMap<BlockKey, Block> {
        self.cells
            .iter()
            .filter(|(_, block)| !block.is_default(&self.default_color, normalize))
            .map(|(key, block)| (*key, block.clone()))
            .collect()
    }

    /// Bulk reset from persisted data. Absent keys are backfilled lazily on
    /// next access. A grid that does not track previous colors drops any
    /// imported `previous_color`.
    pub fn replace_all(&mut self, data: BTreeMap<BlockKey, Block>) {
        self.cells = data
            .into_iter()
            .map(|(key, mut block)| {
                if !self.tracks_previous_color {
                    block.previous_color = None;
                }
                (key, block)
            })
            .collect();
    }
}
