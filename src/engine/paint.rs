//! Click-versus-drag gesture resolution for cell painting.
//!
//! A pointer-down only anchors the gesture; whether it means "edit this cell"
//! or "paint a rectangle" is decided by whether the pointer ever leaves the
//! anchor cell before release. Exactly one of the two fires per gesture.

use std::collections::{HashMap, HashSet};

use crate::models::block::{BlockKey, GridKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaintPhase {
    Idle,
    AnchorSet {
        grid: GridKind,
        anchor: BlockKey,
        dragging: bool,
    },
}

/// What the engine should do in response to a pointer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintAction {
    None,
    /// Paint `paint` with the selected color and restore `restore` (cells the
    /// span no longer covers) to their gesture-start colors.
    Repaint {
        paint: Vec<BlockKey>,
        restore: Vec<BlockKey>,
    },
    /// Zero-movement release: open the edit surface for this cell.
    OpenEditor { grid: GridKind, cell: BlockKey },
    /// A drag finished; the grid already shows its final state.
    DragFinished,
}

pub struct PaintInteraction {
    phase: PaintPhase,
    /// Color of every visible cell at gesture start. Repaints always pass the
    /// snapshot color, so `previous_color` reflects the pre-gesture state even
    /// if a cell is repainted several times within one drag.
    snapshot: HashMap<BlockKey, String>,
    /// Cells painted so far in this gesture, for restoring when the span shrinks.
    painted: HashSet<BlockKey>,
}

impl PaintInteraction {
    pub fn new() -> Self {
        Self {
            phase: PaintPhase::Idle,
            snapshot: HashMap::new(),
            painted: HashSet::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != PaintPhase::Idle
    }

    pub fn grid(&self) -> Option<GridKind> {
        match self.phase {
            PaintPhase::AnchorSet { grid, .. } => Some(grid),
            PaintPhase::Idle => None,
        }
    }

    pub fn snapshot_color(&self, key: BlockKey) -> Option<&str> {
        self.snapshot.get(&key).map(String::as_str)
    }

    /// Anchor a gesture. Ignored while another gesture is in flight.
    pub fn pointer_down(
        &mut self,
        grid: GridKind,
        cell: BlockKey,
        snapshot: HashMap<BlockKey, String>,
    ) {
        if self.is_active() {
            return;
        }
        self.phase = PaintPhase::AnchorSet {
            grid,
            anchor: cell,
            dragging: false,
        };
        self.snapshot = snapshot;
        self.painted.clear();
    }

    /// Pointer moved while the button is held. Once the pointer leaves the
    /// anchor cell the gesture is a drag for good, even if it returns.
    pub fn pointer_move(&mut self, hovered: BlockKey) -> PaintAction {
        let PaintPhase::AnchorSet {
            grid,
            anchor,
            dragging,
        } = self.phase
        else {
            return PaintAction::None;
        };

        let dragging = dragging || hovered != anchor;
        self.phase = PaintPhase::AnchorSet {
            grid,
            anchor,
            dragging,
        };
        if !dragging {
            return PaintAction::None;
        }

        let span = Self::span(anchor, hovered);
        let in_span: HashSet<BlockKey> = span.iter().copied().collect();
        let mut restore: Vec<BlockKey> = self.painted.difference(&in_span).copied().collect();
        restore.sort_unstable();
        self.painted = in_span;

        PaintAction::Repaint {
            paint: span,
            restore,
        }
    }

    /// Global pointer release. Resolves the gesture and always returns the
    /// machine to idle, so an off-grid release can never leave it stuck.
    pub fn pointer_up(&mut self) -> PaintAction {
        let action = match self.phase {
            PaintPhase::Idle => PaintAction::None,
            PaintPhase::AnchorSet {
                grid,
                anchor,
                dragging: false,
            } => PaintAction::OpenEditor { grid, cell: anchor },
            PaintPhase::AnchorSet { dragging: true, .. } => PaintAction::DragFinished,
        };
        self.reset();
        action
    }

    fn reset(&mut self) {
        self.phase = PaintPhase::Idle;
        self.snapshot.clear();
        self.painted.clear();
    }

    /// Rectangular span between the anchor and the hovered cell, inclusive,
    /// in row-major order.
    fn span(anchor: BlockKey, hovered: BlockKey) -> Vec<BlockKey> {
        let (hour_lo, hour_hi) = min_max(anchor.hour, hovered.hour);
        let (block_lo, block_hi) = min_max(anchor.block, hovered.block);
        let mut cells = Vec::with_capacity(
            (hour_hi - hour_lo + 1) as usize * (block_hi - block_lo + 1) as usize,
        );
        for hour in hour_lo..=hour_hi {
            for block in block_lo..=block_hi {
                cells.push(BlockKey::new(hour, block));
            }
        }
        cells
    }
}

impl Default for PaintInteraction {
    fn default() -> Self {
        Self::new()
    }
}

fn min_max(a: u8, b: u8) -> (u8, u8) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hour: u8, block: u8) -> BlockKey {
        BlockKey::new(hour, block)
    }

    fn snapshot() -> HashMap<BlockKey, String> {
        HashMap::new()
    }

    #[test]
    fn test_click_without_movement_opens_editor() {
        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Actual, key(3, 2), snapshot());
        assert_eq!(
            paint.pointer_up(),
            PaintAction::OpenEditor {
                grid: GridKind::Actual,
                cell: key(3, 2)
            }
        );
        assert!(!paint.is_active());
    }

    #[test]
    fn test_move_within_anchor_cell_is_still_a_click() {
        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Goal, key(3, 2), snapshot());
        assert_eq!(paint.pointer_move(key(3, 2)), PaintAction::None);
        assert_eq!(
            paint.pointer_up(),
            PaintAction::OpenEditor {
                grid: GridKind::Goal,
                cell: key(3, 2)
            }
        );
    }

    #[test]
    fn test_drag_paints_the_full_rectangle() {
        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Actual, key(2, 1), snapshot());
        let action = paint.pointer_move(key(3, 3));

        let PaintAction::Repaint { paint: cells, restore } = action else {
            panic!("expected a repaint, got {action:?}");
        };
        assert!(restore.is_empty());
        assert_eq!(cells.len(), 6);
        for hour in 2..=3 {
            for block in 1..=3 {
                assert!(cells.contains(&key(hour, block)));
            }
        }
    }

    #[test]
    fn test_drag_span_is_direction_independent() {
        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Actual, key(5, 4), snapshot());
        let up_left = paint.pointer_move(key(3, 1));

        let PaintAction::Repaint { paint: cells, .. } = up_left else {
            panic!("expected a repaint");
        };
        assert_eq!(cells.len(), 12); // hours 3..=5 x blocks 1..=4
        assert!(cells.contains(&key(3, 1)));
        assert!(cells.contains(&key(5, 4)));
    }

    #[test]
    fn test_shrinking_the_span_restores_departed_cells() {
        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Actual, key(2, 0), snapshot());
        paint.pointer_move(key(2, 3));
        let action = paint.pointer_move(key(2, 1));

        let PaintAction::Repaint { paint: cells, restore } = action else {
            panic!("expected a repaint");
        };
        assert_eq!(cells, vec![key(2, 0), key(2, 1)]);
        assert_eq!(restore, vec![key(2, 2), key(2, 3)]);
    }

    #[test]
    fn test_returning_to_anchor_stays_a_drag() {
        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Actual, key(2, 0), snapshot());
        paint.pointer_move(key(2, 1));
        let back = paint.pointer_move(key(2, 0));

        // Still a drag: the span collapses to the anchor, the other cell restores.
        let PaintAction::Repaint { paint: cells, restore } = back else {
            panic!("expected a repaint");
        };
        assert_eq!(cells, vec![key(2, 0)]);
        assert_eq!(restore, vec![key(2, 1)]);
        assert_eq!(paint.pointer_up(), PaintAction::DragFinished);
    }

    #[test]
    fn test_pointer_up_without_gesture_is_a_no_op() {
        let mut paint = PaintInteraction::new();
        assert_eq!(paint.pointer_up(), PaintAction::None);
    }

    #[test]
    fn test_second_pointer_down_during_gesture_is_ignored() {
        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Actual, key(1, 1), snapshot());
        paint.pointer_down(GridKind::Goal, key(9, 9), snapshot());
        assert_eq!(paint.grid(), Some(GridKind::Actual));
        assert_eq!(
            paint.pointer_up(),
            PaintAction::OpenEditor {
                grid: GridKind::Actual,
                cell: key(1, 1)
            }
        );
    }

    #[test]
    fn test_snapshot_colors_survive_for_the_whole_gesture() {
        let mut colors = HashMap::new();
        colors.insert(key(1, 1), "#123456".to_string());

        let mut paint = PaintInteraction::new();
        paint.pointer_down(GridKind::Actual, key(1, 1), colors);
        paint.pointer_move(key(1, 2));
        assert_eq!(paint.snapshot_color(key(1, 1)), Some("#123456"));
        paint.pointer_up();
        assert_eq!(paint.snapshot_color(key(1, 1)), None);
    }
}
