// Grid settings module
// Layout constants shared by both block grids

use serde::{Deserialize, Serialize};

/// Shape of the day grid: where the day starts and how finely hours divide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Wall-clock hour displayed as the first grid row (e.g. 6 for 06:00).
    pub day_start_hour: u8,
    /// Number of blocks in one hour row. Must divide 60.
    pub blocks_per_hour: u8,
    /// Color a cell falls back to when it was never painted.
    pub default_color: String,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            day_start_hour: 6,
            blocks_per_hour: 6, // 10-minute blocks
            default_color: "#ffffff".to_string(),
        }
    }
}

impl GridSettings {
    pub fn minutes_per_block(&self) -> u32 {
        60 / self.blocks_per_hour as u32
    }

    pub fn blocks_per_day(&self) -> u32 {
        24 * self.blocks_per_hour as u32
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.day_start_hour >= 24 {
            return Err(format!(
                "Day start hour must be in 0..24, got {}",
                self.day_start_hour
            ));
        }
        if self.blocks_per_hour == 0 || 60 % self.blocks_per_hour as u32 != 0 {
            return Err(format!(
                "Blocks per hour must divide 60, got {}",
                self.blocks_per_hour
            ));
        }
        if self.default_color.trim().is_empty() {
            return Err("Default color cannot be empty".to_string());
        }
        Ok(())
    }
}
