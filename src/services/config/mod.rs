//! Grid settings persistence.
//!
//! Settings live in a small TOML file in the platform config directory
//! (e.g. `~/.config/timeblock-grid/grid.toml` on Linux). A missing file
//! means defaults; a present-but-broken file is an error the caller surfaces.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::GridSettings;

const CONFIG_FILE: &str = "grid.toml";

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Service rooted at the platform config directory.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "TimeblockGrid", "TimeblockGrid")
            .context("Failed to locate a config directory for this platform")?;
        Ok(Self {
            path: dirs.config_dir().join(CONFIG_FILE),
        })
    }

    /// Service reading and writing an explicit path. Used by tests and by
    /// hosts that manage their own config location.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load settings, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<GridSettings> {
        if !self.path.exists() {
            log::info!(
                "No grid config at {:?}; using default settings",
                self.path
            );
            return Ok(GridSettings::default());
        }

        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read grid config {:?}", self.path))?;
        let settings: GridSettings = toml::from_str(&text)
            .with_context(|| format!("Failed to parse grid config {:?}", self.path))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid grid config {:?}: {}", self.path, e))?;

        log::debug!(
            "Loaded grid config: day starts at {:02}:00, {} blocks per hour",
            settings.day_start_hour,
            settings.blocks_per_hour
        );
        Ok(settings)
    }

    /// Write settings, creating the config directory if needed.
    pub fn save(&self, settings: &GridSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Refusing to save invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {parent:?}"))?;
        }
        let text = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write grid config {:?}", self.path))?;

        log::info!("Saved grid config to {:?}", self.path);
        Ok(())
    }
}
