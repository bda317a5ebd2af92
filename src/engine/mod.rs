//! The time-block grid engine.
//!
//! One [`GridEngine`] owns the two parallel block grids ("actual" and
//! "goal"), the scheduled-task overlay, and all interaction state. The host
//! feeds it pointer events, drops, and a periodic clock tick; the engine
//! mutates state, notifies the host through [`EngineHooks::on_data_change`],
//! and answers pure render queries ([`GridEngine::cell_visual`],
//! [`GridEngine::task_segments`]). No render state is cached.
//!
//! Everything runs on one thread: each event is handled to completion, and a
//! single active-interaction flag refuses re-entrant gesture starts. A
//! *global* pointer release ([`GridEngine::pointer_up`]) always ends the
//! current gesture, so releasing outside the grid can never leave it stuck.

pub mod coords;
pub mod edit;
pub mod elapsed;
pub mod paint;
pub mod schedule;
pub mod store;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveTime;

use crate::models::block::{Block, BlockKey, GridKind};
use crate::models::scheduled_task::{DropPayload, ScheduledTask, SchedulableTodo, TaskSegment};
use crate::models::settings::GridSettings;

use coords::GridCoordinateSystem;
use edit::{EditRequest, EditSession};
use elapsed::{ElapsedTimeCalculator, TimeMark};
use paint::{PaintAction, PaintInteraction};
use schedule::{ResizeEdge, ScheduleOverlay};
use store::BlockStore;

/// Capabilities the host supplies at initialization: the palette selection,
/// color judgments, and the persistence trigger.
#[cfg_attr(test, mockall::automock)]
pub trait EngineHooks {
    fn selected_color(&self) -> String;
    fn is_dark_color(&self, color: &str) -> bool;
    /// Canonical form used for all color equality checks.
    fn normalize_color(&self, color: &str) -> String;
    /// Fired after every mutating operation; the host persists.
    fn on_data_change(&self);
}

/// Everything a renderer needs to draw one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellVisual {
    pub text: String,
    pub color: String,
    pub previous_color: Option<String>,
    /// Speculative color of an open editor on this cell.
    pub editing_tint: Option<String>,
    pub time_mark: Option<TimeMark>,
}

#[derive(Debug, Clone, Copy)]
struct ResizeInteraction {
    task_id: u64,
    edge: ResizeEdge,
}

pub struct GridEngine {
    settings: GridSettings,
    coords: GridCoordinateSystem,
    actual: BlockStore,
    goal: BlockStore,
    overlay: ScheduleOverlay,
    paint: PaintInteraction,
    resize: Option<ResizeInteraction>,
    edit: Option<EditSession>,
    time_marks: HashMap<GridKind, HashMap<BlockKey, TimeMark>>,
    hooks: Box<dyn EngineHooks>,
}

impl GridEngine {
    pub fn new(settings: GridSettings, hooks: Box<dyn EngineHooks>) -> Result<Self, String> {
        settings.validate()?;
        let coords = GridCoordinateSystem::new(&settings);
        let actual = BlockStore::new(
            settings.default_color.clone(),
            GridKind::Actual.tracks_previous_color(),
        );
        let goal = BlockStore::new(
            settings.default_color.clone(),
            GridKind::Goal.tracks_previous_color(),
        );
        Ok(Self {
            settings,
            coords,
            actual,
            goal,
            overlay: ScheduleOverlay::new(),
            paint: PaintInteraction::new(),
            resize: None,
            edit: None,
            time_marks: HashMap::new(),
            hooks,
        })
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn coords(&self) -> &GridCoordinateSystem {
        &self.coords
    }

    /// Whether a paint drag or a task resize is in flight.
    pub fn interaction_active(&self) -> bool {
        self.paint.is_active() || self.resize.is_some()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    fn store(&self, grid: GridKind) -> &BlockStore {
        match grid {
            GridKind::Actual => &self.actual,
            GridKind::Goal => &self.goal,
        }
    }

    /// One store write plus the change notification.
    fn set_cell(
        &mut self,
        grid: GridKind,
        key: BlockKey,
        text: &str,
        color: &str,
        color_at_interaction_start: &str,
    ) {
        let hooks = self.hooks.as_ref();
        let normalize = |color: &str| hooks.normalize_color(color);
        let store = match grid {
            GridKind::Actual => &mut self.actual,
            GridKind::Goal => &mut self.goal,
        };
        store.set(key, text, color, color_at_interaction_start, &normalize);
        hooks.on_data_change();
    }

    // ---- Pointer surface -------------------------------------------------

    /// Anchor a paint gesture on a cell. Refused while any interaction or an
    /// edit is already active.
    pub fn pointer_down(&mut self, grid: GridKind, cell: BlockKey) {
        if self.interaction_active() || self.edit.is_some() {
            return;
        }
        let snapshot = self.color_snapshot(grid);
        self.paint.pointer_down(grid, cell, snapshot);
    }

    /// Pointer moved over a cell while the button is held. Drives whichever
    /// of paint or resize is active.
    pub fn pointer_move(&mut self, cell: BlockKey) {
        if let Some(resize) = self.resize {
            let target = self.coords.ordinal(cell);
            if self
                .overlay
                .resize(resize.task_id, resize.edge, target, &self.coords)
            {
                self.hooks.on_data_change();
            }
            return;
        }

        let Some(grid) = self.paint.grid() else {
            return;
        };
        if let PaintAction::Repaint { paint, restore } = self.paint.pointer_move(cell) {
            let selected = self.hooks.selected_color();
            for key in paint {
                let snapshot_color = self.gesture_start_color(grid, key);
                let text = self.store(grid).peek(key).text;
                self.set_cell(grid, key, &text, &selected, &snapshot_color);
            }
            for key in restore {
                let snapshot_color = self.gesture_start_color(grid, key);
                let text = self.store(grid).peek(key).text;
                self.set_cell(grid, key, &text, &snapshot_color, &snapshot_color);
            }
        }
    }

    /// Global pointer release. Ends a resize, finalizes a drag, or resolves a
    /// click into an edit request for the host to present.
    pub fn pointer_up(&mut self) -> Option<EditRequest> {
        if self.resize.take().is_some() {
            return None;
        }
        match self.paint.pointer_up() {
            PaintAction::OpenEditor { grid, cell } => self.open_editor(grid, cell),
            _ => None,
        }
    }

    fn color_snapshot(&self, grid: GridKind) -> HashMap<BlockKey, String> {
        let store = self.store(grid);
        let mut snapshot = HashMap::with_capacity(self.coords.blocks_per_day() as usize);
        for ordinal in 0..self.coords.blocks_per_day() {
            let key = self.coords.key_at(ordinal);
            snapshot.insert(key, store.peek(key).color);
        }
        snapshot
    }

    fn gesture_start_color(&self, grid: GridKind, key: BlockKey) -> String {
        self.paint
            .snapshot_color(key)
            .map(str::to_string)
            .unwrap_or_else(|| self.store(grid).default_color().to_string())
    }

    // ---- Editing ---------------------------------------------------------

    /// Open an edit on a cell. Returns the cell's current text, or `None`
    /// while a gesture or another edit is active.
    pub fn begin_edit(&mut self, grid: GridKind, cell: BlockKey) -> Option<String> {
        if self.interaction_active() || self.edit.is_some() {
            return None;
        }
        self.open_editor(grid, cell).map(|request| request.current_text)
    }

    fn open_editor(&mut self, grid: GridKind, cell: BlockKey) -> Option<EditRequest> {
        let block = self.store(grid).peek(cell);
        self.edit = Some(EditSession {
            grid,
            cell,
            initial_text: block.text.clone(),
            pending_color: self.hooks.selected_color(),
            color_at_interaction_start: block.color,
        });
        Some(EditRequest {
            grid,
            cell,
            current_text: block.text,
        })
    }

    /// Commit the open edit: the text and the pending tint become the cell's
    /// stored state. No-op without an open edit.
    pub fn commit_edit(&mut self, text: &str) {
        let Some(session) = self.edit.take() else {
            return;
        };
        self.set_cell(
            session.grid,
            session.cell,
            text,
            &session.pending_color,
            &session.color_at_interaction_start,
        );
    }

    /// Discard the open edit. The store was never touched, so there is
    /// nothing to revert.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Palette widget pushed a new selection while an editor is open: retint
    /// the cell being edited. The store mutates only on commit.
    pub fn apply_selected_color_to_editing_cell(&mut self) {
        let selected = self.hooks.selected_color();
        if let Some(session) = self.edit.as_mut() {
            session.pending_color = selected;
        }
    }

    // ---- Scheduling ------------------------------------------------------

    /// Handle a drop of a host payload onto a cell. Malformed payloads and
    /// kinds other than `schedulable-todo` are ignored.
    pub fn drop_todo(&mut self, payload_json: &str, grid: GridKind, cell: BlockKey) -> Option<u64> {
        match serde_json::from_str::<DropPayload>(payload_json) {
            Ok(DropPayload::SchedulableTodo(todo)) => self.schedule_todo(&todo, grid, cell),
            Ok(DropPayload::Unknown) => {
                log::debug!("ignoring drop of unknown kind");
                None
            }
            Err(err) => {
                log::debug!("ignoring malformed drop payload: {err}");
                None
            }
        }
    }

    /// Typed entry point behind [`GridEngine::drop_todo`]. The new task takes
    /// the currently selected palette color.
    pub fn schedule_todo(
        &mut self,
        todo: &SchedulableTodo,
        grid: GridKind,
        cell: BlockKey,
    ) -> Option<u64> {
        let color = self.hooks.selected_color();
        let id = self.overlay.add(todo, cell, grid, color, &self.coords)?;
        self.hooks.on_data_change();
        Some(id)
    }

    /// Start resizing a task edge. The resize follows subsequent
    /// [`GridEngine::pointer_move`] calls and ends on [`GridEngine::pointer_up`].
    pub fn begin_task_resize(&mut self, task_id: u64, edge: ResizeEdge) -> bool {
        if self.interaction_active() || self.edit.is_some() {
            return false;
        }
        if self.overlay.task(task_id).is_none() {
            return false;
        }
        self.resize = Some(ResizeInteraction { task_id, edge });
        true
    }

    pub fn delete_task(&mut self, task_id: u64) -> bool {
        if !self.overlay.delete(task_id) {
            return false;
        }
        if self.resize.map(|resize| resize.task_id) == Some(task_id) {
            self.resize = None;
        }
        self.hooks.on_data_change();
        true
    }

    pub fn task_segments(&self, grid: GridKind) -> Vec<TaskSegment> {
        self.overlay.segments(grid, &self.coords)
    }

    // ---- Bulk export/import ----------------------------------------------

    /// Sparse export of a grid's non-default cells.
    pub fn block_data(&self, grid: GridKind) -> BTreeMap<BlockKey, Block> {
        let hooks = self.hooks.as_ref();
        let normalize = |color: &str| hooks.normalize_color(color);
        self.store(grid).export_non_default(&normalize)
    }

    /// Bulk reset of a grid from persisted data. Does not fire
    /// `on_data_change`: the host initiated this from data it already holds.
    pub fn set_block_data(&mut self, grid: GridKind, data: BTreeMap<BlockKey, Block>) {
        match grid {
            GridKind::Actual => self.actual.replace_all(data),
            GridKind::Goal => self.goal.replace_all(data),
        }
    }

    pub fn scheduled_tasks(&self) -> &[ScheduledTask] {
        self.overlay.tasks()
    }

    /// Bulk replacement of the task list on view load. Does not fire
    /// `on_data_change`.
    pub fn set_scheduled_tasks(&mut self, tasks: Vec<ScheduledTask>) {
        self.overlay.replace_all(tasks);
    }

    // ---- Elapsed time ----------------------------------------------------

    /// Recompute a grid's elapsed/current classification for an instant.
    /// Clears every mark when the grid is not the operative today. Safe to
    /// call from a periodic timer: identical inputs produce identical marks.
    pub fn update_elapsed_visuals(
        &mut self,
        grid: GridKind,
        is_effective_today: bool,
        now: NaiveTime,
    ) {
        let hooks = self.hooks.as_ref();
        let store = self.store(grid);
        let color_of = |key: BlockKey| store.peek(key).color;
        let is_dark = |color: &str| hooks.is_dark_color(color);
        let marks = ElapsedTimeCalculator::new(&self.coords).classify(
            now,
            is_effective_today,
            &color_of,
            &is_dark,
        );
        self.time_marks.insert(grid, marks);
    }

    pub fn time_mark(&self, grid: GridKind, cell: BlockKey) -> Option<TimeMark> {
        self.time_marks
            .get(&grid)
            .and_then(|marks| marks.get(&cell))
            .copied()
    }

    // ---- Render queries --------------------------------------------------

    /// Pure per-cell render read: store contents, editor tint, time mark.
    pub fn cell_visual(&self, grid: GridKind, cell: BlockKey) -> CellVisual {
        let block = self.store(grid).peek(cell);
        let editing_tint = self
            .edit
            .as_ref()
            .filter(|session| session.grid == grid && session.cell == cell)
            .map(|session| session.pending_color.clone());
        CellVisual {
            text: block.text,
            color: block.color,
            previous_color: block.previous_color,
            editing_tint,
            time_mark: self.time_mark(grid, cell),
        }
    }
}
