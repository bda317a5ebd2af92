//! Request/response editing contract for cell text.
//!
//! The engine owns at most one edit at a time. The speculative color tint
//! lives here, not in the store: the store is only touched on commit, so a
//! cancelled edit needs no revert.

use crate::models::block::{BlockKey, GridKind};

/// An in-flight cell edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub grid: GridKind,
    pub cell: BlockKey,
    /// Text at the moment the editor opened.
    pub initial_text: String,
    /// Tint shown on the cell while the editor is open; becomes the cell's
    /// color on commit.
    pub pending_color: String,
    /// Color the cell had when the gesture that opened the editor began.
    /// Feeds the previous-color bookkeeping on commit.
    pub color_at_interaction_start: String,
}

/// Handed to the host when a click resolves to an edit, so it can open
/// whatever edit surface it likes (modal, inline, popover).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub grid: GridKind,
    pub cell: BlockKey,
    pub current_text: String,
}
