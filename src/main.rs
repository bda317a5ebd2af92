// Timeblock Grid Demo
// Builds an engine with concrete host hooks, simulates a morning of
// interactions, and prints the resulting day grid as text.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;

use timeblock_grid::engine::elapsed::TimeMark;
use timeblock_grid::engine::schedule::ResizeEdge;
use timeblock_grid::engine::{EngineHooks, GridEngine};
use timeblock_grid::models::block::{BlockKey, GridKind};
use timeblock_grid::models::settings::GridSettings;
use timeblock_grid::services::config::ConfigService;

/// Demo stand-in for the host's palette widget.
struct DemoPalette {
    selected: RefCell<String>,
}

/// Newtype so the foreign `Rc` can carry the engine's hooks without tripping
/// the orphan rule (`EngineHooks` lives in the library crate).
struct SharedPalette(Rc<DemoPalette>);

impl EngineHooks for SharedPalette {
    fn selected_color(&self) -> String {
        self.0.selected.borrow().clone()
    }

    fn is_dark_color(&self, color: &str) -> bool {
        relative_luminance(color).map_or(false, |luma| luma < 128.0)
    }

    fn normalize_color(&self, color: &str) -> String {
        color.trim().to_ascii_lowercase()
    }

    fn on_data_change(&self) {
        log::debug!("data changed; a real host would persist here");
    }
}

/// Perceived luminance of a `#rrggbb` color, if it parses.
fn relative_luminance(color: &str) -> Option<f32> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32;
    Some(0.299 * r + 0.587 * g + 0.114 * b)
}

fn main() {
    env_logger::init();

    log::info!("Starting timeblock grid demo");

    let settings = match ConfigService::new().and_then(|service| service.load()) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("Falling back to default settings: {err:#}");
            GridSettings::default()
        }
    };

    let palette = Rc::new(DemoPalette {
        selected: RefCell::new("#2d6a4f".to_string()),
    });
    let mut engine = match GridEngine::new(settings, Box::new(SharedPalette(Rc::clone(&palette)))) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Could not start the grid engine: {err}");
            std::process::exit(1);
        }
    };

    // Drag-paint the first ninety minutes of the day.
    engine.pointer_down(GridKind::Actual, BlockKey::new(0, 0));
    engine.pointer_move(BlockKey::new(1, 2));
    engine.pointer_up();

    // Click a cell and annotate it.
    engine.pointer_down(GridKind::Actual, BlockKey::new(2, 0));
    if engine.pointer_up().is_some() {
        engine.commit_edit("standup");
    }

    // Drop a backlog todo where 09:00 lives on the grid and stretch it.
    *palette.selected.borrow_mut() = "#1d3557".to_string();
    let drop_cell = BlockKey::new(engine.coords().grid_hour(9), 0);
    let payload = r#"{"kind":"schedulable-todo","id":"todo-42","text":"Quarterly report","durationMinutes":50}"#;
    if let Some(task_id) = engine.drop_todo(payload, GridKind::Actual, drop_cell) {
        engine.begin_task_resize(task_id, ResizeEdge::Right);
        engine.pointer_move(BlockKey::new(drop_cell.hour + 1, 2));
        engine.pointer_up();
    }

    // Mark the passage of time as the host's minute timer would.
    let now = Local::now();
    engine.update_elapsed_visuals(GridKind::Actual, true, now.time());

    print_grid(&engine, GridKind::Actual);

    for task in engine.scheduled_tasks() {
        let segments = engine
            .task_segments(task.grid)
            .into_iter()
            .filter(|segment| segment.task_id == task.id)
            .count();
        println!(
            "task {}: {:?} ({} blocks, {} segments)",
            task.id, task.text, task.block_count, segments
        );
    }
}

/// One line per hour row: `=` elapsed, `>` current, `#` painted, `.` default.
fn print_grid(engine: &GridEngine, grid: GridKind) {
    let coords = engine.coords();
    let default_color = engine.settings().default_color.clone();
    for hour in 0..24 {
        let mut row = String::new();
        for block in 0..coords.blocks_per_hour() {
            let key = BlockKey::new(hour, block);
            let visual = engine.cell_visual(grid, key);
            let glyph = match engine.time_mark(grid, key) {
                Some(TimeMark::Current { .. }) => '>',
                Some(TimeMark::Elapsed { .. }) => '=',
                None if visual.color != default_color || !visual.text.is_empty() => '#',
                None => '.',
            };
            row.push(glyph);
        }
        println!("{} |{}|", coords.hour_label(hour), row);
    }
}
