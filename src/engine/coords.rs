//! Hour and block index arithmetic for the day grid.
//!
//! Grid rows do not start at midnight: row 0 shows `day_start_hour` and the
//! day wraps through the following calendar morning. All range math (drag
//! bounding boxes, resize clamping) works on linear ordinals derived here.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Timelike};

use crate::models::block::BlockKey;
use crate::models::settings::GridSettings;
use crate::utils::date::parse_grid_date;

/// Cell containing a wall-clock instant, plus how far into the cell the
/// instant falls (0..100, feeds the moving time indicator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub key: BlockKey,
    pub percent_into_block: f32,
}

#[derive(Debug, Clone)]
pub struct GridCoordinateSystem {
    day_start_hour: u8,
    blocks_per_hour: u8,
}

impl GridCoordinateSystem {
    pub fn new(settings: &GridSettings) -> Self {
        Self {
            day_start_hour: settings.day_start_hour,
            blocks_per_hour: settings.blocks_per_hour,
        }
    }

    pub fn blocks_per_hour(&self) -> u8 {
        self.blocks_per_hour
    }

    pub fn minutes_per_block(&self) -> u32 {
        60 / self.blocks_per_hour as u32
    }

    pub fn blocks_per_day(&self) -> u32 {
        24 * self.blocks_per_hour as u32
    }

    pub fn max_ordinal(&self) -> u32 {
        self.blocks_per_day() - 1
    }

    /// Grid row showing a wall-clock hour. Hours before `day_start_hour`
    /// belong to the tail of the previous grid day.
    pub fn grid_hour(&self, wall_hour: u32) -> u8 {
        ((24 + wall_hour - self.day_start_hour as u32) % 24) as u8
    }

    /// Wall-clock hour a grid row is labeled with.
    pub fn wall_clock_hour(&self, grid_hour: u8) -> u32 {
        (grid_hour as u32 + self.day_start_hour as u32) % 24
    }

    /// Row header label, e.g. "06:00".
    pub fn hour_label(&self, grid_hour: u8) -> String {
        format!("{:02}:00", self.wall_clock_hour(grid_hour))
    }

    pub fn ordinal(&self, key: BlockKey) -> u32 {
        key.ordinal(self.blocks_per_hour)
    }

    pub fn key_at(&self, ordinal: u32) -> BlockKey {
        BlockKey::from_ordinal(self.clamp_ordinal(ordinal), self.blocks_per_hour)
    }

    pub fn clamp_ordinal(&self, ordinal: u32) -> u32 {
        ordinal.min(self.max_ordinal())
    }

    /// Cell containing a wall-clock time and the fraction of the cell that
    /// has already passed at that time.
    pub fn position_at(&self, time: NaiveTime) -> GridPosition {
        let minutes_per_block = self.minutes_per_block();
        let hour = self.grid_hour(time.hour());
        let block = (time.minute() / minutes_per_block) as u8;
        let seconds_into_block = (time.minute() % minutes_per_block) * 60 + time.second();
        let percent_into_block =
            seconds_into_block as f32 / (minutes_per_block * 60) as f32 * 100.0;
        GridPosition {
            key: BlockKey::new(hour, block),
            percent_into_block,
        }
    }

    /// Whether a grid dated `grid_date` is still the operative "today"
    /// timeline. Before `day_start_hour` the clock still belongs to the
    /// previous grid day, so yesterday's grid stays current until then.
    /// Older dates are never effective-today.
    pub fn is_effective_today(
        &self,
        grid_date: NaiveDate,
        now_date: NaiveDate,
        now_time: NaiveTime,
    ) -> bool {
        let operative_date = if now_time.hour() < self.day_start_hour as u32 {
            now_date - Duration::days(1)
        } else {
            now_date
        };
        grid_date == operative_date
    }

    /// Same rollover rule for a host that tracks grid dates as strings.
    /// Unparsable dates are never effective-today.
    pub fn is_effective_today_str(&self, date_string: &str, now: DateTime<Local>) -> bool {
        match parse_grid_date(date_string) {
            Some(grid_date) => self.is_effective_today(grid_date, now.date_naive(), now.time()),
            None => false,
        }
    }
}
