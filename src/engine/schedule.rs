//! Scheduled task overlay.
//!
//! Tasks are created by dropping a backlog todo onto a cell, span one or more
//! contiguous blocks, and render as per-hour-row segments because an hour row
//! is only `blocks_per_hour` wide.

use crate::models::block::{BlockKey, GridKind};
use crate::models::scheduled_task::{ScheduledTask, SchedulableTodo, TaskSegment};

use super::coords::GridCoordinateSystem;

/// Which edge of a task a resize drag grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Moves the start; the end stays where it was when the resize began.
    Left,
    /// Moves the end; the start is fixed.
    Right,
}

pub struct ScheduleOverlay {
    tasks: Vec<ScheduledTask>,
    next_id: u64,
}

impl ScheduleOverlay {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    pub fn task(&self, id: u64) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Create a task from a dropped todo, anchored at the drop cell.
    ///
    /// Non-positive or non-finite durations create nothing. The block count
    /// is `ceil(duration / minutes_per_block)`, clamped so the task never
    /// extends past the end of the grid.
    pub fn add(
        &mut self,
        todo: &SchedulableTodo,
        at: BlockKey,
        grid: GridKind,
        color: String,
        coords: &GridCoordinateSystem,
    ) -> Option<u64> {
        if !todo.duration_minutes.is_finite() || todo.duration_minutes <= 0.0 {
            return None;
        }

        let minutes_per_block = coords.minutes_per_block() as f64;
        let wanted = (todo.duration_minutes / minutes_per_block).ceil() as u32;
        let capacity = coords.blocks_per_day() - coords.ordinal(at);
        let block_count = wanted.min(capacity);

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            source_todo_id: todo.id.clone(),
            text: todo.text.clone(),
            start_hour: at.hour,
            start_block: at.block,
            block_count,
            grid,
            color,
        });
        Some(id)
    }

    /// Per-hour-row segments for every task on a grid, in task order. Walks
    /// forward from each task's start, emitting one segment per contiguous
    /// run confined to a single hour row; blocks past the 24-hour bound are
    /// dropped.
    pub fn segments(&self, grid: GridKind, coords: &GridCoordinateSystem) -> Vec<TaskSegment> {
        let blocks_per_hour = coords.blocks_per_hour() as u32;
        let mut segments = Vec::new();

        for task in self.tasks.iter().filter(|task| task.grid == grid) {
            let mut hour = task.start_hour;
            let mut block = task.start_block as u32;
            let mut remaining = task.block_count;
            let mut is_first = true;

            while remaining > 0 && (hour as u32) < 24 {
                let run = (blocks_per_hour - block).min(remaining);
                remaining -= run;
                segments.push(TaskSegment {
                    task_id: task.id,
                    hour,
                    start_block: block as u8,
                    block_count: run,
                    is_first,
                    is_last: remaining == 0 || hour as u32 + 1 >= 24,
                });
                is_first = false;
                hour += 1;
                block = 0;
            }
        }
        segments
    }

    /// Move one edge of a task to the block at `target_ordinal`, clamping
    /// rather than erroring on out-of-range targets. The block count never
    /// drops below 1. Returns false for an unknown task id.
    pub fn resize(
        &mut self,
        id: u64,
        edge: ResizeEdge,
        target_ordinal: u32,
        coords: &GridCoordinateSystem,
    ) -> bool {
        let blocks_per_hour = coords.blocks_per_hour();
        let target = coords.clamp_ordinal(target_ordinal);
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };

        let start = task.start_key().ordinal(blocks_per_hour);
        match edge {
            ResizeEdge::Right => {
                // Dragging left of the start pins the task to a single block.
                let end = target.max(start);
                task.block_count = end - start + 1;
            }
            ResizeEdge::Left => {
                // The end is wherever it currently is; the start may not pass it.
                let end = start + task.block_count - 1;
                let new_start = target.min(end);
                let key = BlockKey::from_ordinal(new_start, blocks_per_hour);
                task.start_hour = key.hour;
                task.start_block = key.block;
                task.block_count = end - new_start + 1;
            }
        }
        true
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Bulk replacement on view load. Future ids continue above the highest
    /// imported id.
    pub fn replace_all(&mut self, tasks: Vec<ScheduledTask>) {
        self.next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        self.tasks = tasks;
    }
}

impl Default for ScheduleOverlay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::GridSettings;

    fn coords() -> GridCoordinateSystem {
        GridCoordinateSystem::new(&GridSettings::default())
    }

    fn todo(minutes: f64) -> SchedulableTodo {
        SchedulableTodo {
            id: "todo-1".to_string(),
            text: "Write draft".to_string(),
            duration_minutes: minutes,
        }
    }

    fn add(overlay: &mut ScheduleOverlay, minutes: f64, hour: u8, block: u8) -> Option<u64> {
        overlay.add(
            &todo(minutes),
            BlockKey::new(hour, block),
            GridKind::Actual,
            "#4a90d9".to_string(),
            &coords(),
        )
    }

    #[test]
    fn test_add_rounds_duration_up_to_whole_blocks() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 25.0, 2, 0).unwrap();
        assert_eq!(overlay.task(id).unwrap().block_count, 3);
    }

    #[test]
    fn test_add_rejects_non_positive_and_non_finite_durations() {
        let mut overlay = ScheduleOverlay::new();
        assert_eq!(add(&mut overlay, 0.0, 2, 0), None);
        assert_eq!(add(&mut overlay, -30.0, 2, 0), None);
        assert_eq!(add(&mut overlay, f64::NAN, 2, 0), None);
        assert_eq!(add(&mut overlay, f64::INFINITY, 2, 0), None);
        assert!(overlay.tasks().is_empty());
    }

    #[test]
    fn test_add_clamps_tasks_that_would_run_past_the_grid() {
        let mut overlay = ScheduleOverlay::new();
        // 23:50 slot with a four-hour todo: only one block fits.
        let id = add(&mut overlay, 240.0, 23, 5).unwrap();
        assert_eq!(overlay.task(id).unwrap().block_count, 1);
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut overlay = ScheduleOverlay::new();
        let first = add(&mut overlay, 10.0, 1, 0).unwrap();
        let second = add(&mut overlay, 10.0, 2, 0).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_segments_wrap_hour_rows() {
        let mut overlay = ScheduleOverlay::new();
        // 13 blocks starting at (5, 4): 2 in hour 5, 6 in hour 6, 5 in hour 7.
        let id = add(&mut overlay, 130.0, 5, 4).unwrap();

        let segments = overlay.segments(GridKind::Actual, &coords());
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[0],
            TaskSegment {
                task_id: id,
                hour: 5,
                start_block: 4,
                block_count: 2,
                is_first: true,
                is_last: false,
            }
        );
        assert_eq!((segments[1].hour, segments[1].start_block, segments[1].block_count), (6, 0, 6));
        assert_eq!((segments[2].hour, segments[2].start_block, segments[2].block_count), (7, 0, 5));
        assert!(segments[2].is_last);
        assert_eq!(segments.iter().map(|s| s.block_count).sum::<u32>(), 13);
    }

    #[test]
    fn test_single_row_task_is_one_segment() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 20.0, 9, 1).unwrap();
        let segments = overlay.segments(GridKind::Actual, &coords());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].task_id, id);
        assert!(segments[0].is_first && segments[0].is_last);
    }

    #[test]
    fn test_segments_truncate_imported_out_of_range_tasks() {
        let mut overlay = ScheduleOverlay::new();
        overlay.replace_all(vec![ScheduledTask {
            id: 7,
            source_todo_id: "todo-7".to_string(),
            text: "overflow".to_string(),
            start_hour: 23,
            start_block: 0,
            block_count: 20,
            grid: GridKind::Actual,
            color: "#333333".to_string(),
        }]);

        let segments = overlay.segments(GridKind::Actual, &coords());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].block_count, 6);
        assert!(segments[0].is_last);
    }

    #[test]
    fn test_segments_are_per_grid() {
        let mut overlay = ScheduleOverlay::new();
        add(&mut overlay, 30.0, 4, 0);
        assert!(overlay.segments(GridKind::Goal, &coords()).is_empty());
    }

    #[test]
    fn test_resize_right_extends_and_shrinks() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 30.0, 4, 0).unwrap();
        let coords = coords();

        assert!(overlay.resize(id, ResizeEdge::Right, BlockKey::new(5, 1).ordinal(6), &coords));
        assert_eq!(overlay.task(id).unwrap().block_count, 8);

        assert!(overlay.resize(id, ResizeEdge::Right, BlockKey::new(4, 0).ordinal(6), &coords));
        assert_eq!(overlay.task(id).unwrap().block_count, 1);
    }

    #[test]
    fn test_resize_right_before_start_pins_to_one_block() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 60.0, 10, 2).unwrap();
        assert!(overlay.resize(id, ResizeEdge::Right, 0, &coords()));
        assert_eq!(overlay.task(id).unwrap().block_count, 1);
    }

    #[test]
    fn test_resize_left_keeps_the_end_fixed() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 30.0, 4, 2).unwrap(); // blocks 26..=28
        let coords = coords();

        assert!(overlay.resize(id, ResizeEdge::Left, BlockKey::new(3, 0).ordinal(6), &coords));
        let task = overlay.task(id).unwrap();
        assert_eq!(task.start_key(), BlockKey::new(3, 0));
        assert_eq!(task.end_ordinal(6), 28);
        assert_eq!(task.block_count, 11);
    }

    #[test]
    fn test_resize_left_past_the_end_pins_to_one_block() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 30.0, 4, 2).unwrap(); // blocks 26..=28
        assert!(overlay.resize(id, ResizeEdge::Left, 100, &coords()));
        let task = overlay.task(id).unwrap();
        assert_eq!(task.block_count, 1);
        assert_eq!(task.start_key().ordinal(6), 28);
    }

    #[test]
    fn test_resize_clamps_out_of_range_targets() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 30.0, 4, 0).unwrap();
        assert!(overlay.resize(id, ResizeEdge::Right, 9999, &coords()));
        let task = overlay.task(id).unwrap();
        assert_eq!(task.end_ordinal(6), 143);
    }

    #[test]
    fn test_resize_unknown_task_does_nothing() {
        let mut overlay = ScheduleOverlay::new();
        assert!(!overlay.resize(42, ResizeEdge::Right, 10, &coords()));
    }

    #[test]
    fn test_delete() {
        let mut overlay = ScheduleOverlay::new();
        let id = add(&mut overlay, 30.0, 4, 0).unwrap();
        assert!(overlay.delete(id));
        assert!(!overlay.delete(id));
        assert!(overlay.tasks().is_empty());
    }

    #[test]
    fn test_replace_all_continues_ids_above_imported_ones() {
        let mut overlay = ScheduleOverlay::new();
        overlay.replace_all(vec![ScheduledTask {
            id: 40,
            source_todo_id: "todo-2".to_string(),
            text: "imported".to_string(),
            start_hour: 1,
            start_block: 0,
            block_count: 2,
            grid: GridKind::Goal,
            color: "#222222".to_string(),
        }]);
        let id = add(&mut overlay, 10.0, 2, 0).unwrap();
        assert_eq!(id, 41);
    }
}
