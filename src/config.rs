//! Grid configuration persistence
//!
//! Stores user preferences in `~/.config/sheetview/config.yaml`. Every field has
//! a default so partial files are fine.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::Axis;
use crate::model::offsets::SheetOffsets;

/// Grid configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Selected theme id (e.g., "default-dark", "default-light")
    pub theme: String,

    /// Width of the row heading strip (px, unscaled)
    pub row_heading_width: f64,
    /// Height of the column heading strip (px, unscaled)
    pub column_heading_height: f64,

    pub default_column_width: f64,
    pub default_row_height: f64,
    pub min_column_width: f64,
    pub min_row_height: f64,

    /// Distance from a heading boundary (screen px) that arms a resize
    pub resize_tolerance: f64,
    /// Window for double-click detection
    pub double_click_ms: u64,
    /// Side of the autofill indicator square (screen px)
    pub autofill_handle_size: f64,
    /// Distance from an embedded object's right/bottom edge that arms a resize
    pub embedded_edge_tolerance: f64,
    /// Pointer travel (screen px) before a press turns into a drag
    pub drag_threshold: f64,

    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier for zoom in / zoom out
    pub zoom_factor: f64,
    /// Margin (screen px) around content for zoom to fit
    pub fit_margin: f64,
    pub max_fit_zoom: f64,

    pub animation_ms: u64,
    /// Used instead of `animation_ms` below `short_move_threshold_px`
    pub short_animation_ms: u64,
    pub short_move_threshold_px: f64,

    /// Share of pan velocity kept every 16ms while coasting (0 disables)
    pub momentum_friction: f64,
    /// Coasting stops below this speed (screen px per ms)
    pub momentum_min_speed: f64,
    /// Pause after a wheel zoom before the view eases back to A1
    pub snap_back_delay_ms: u64,

    /// Disables structural edits (embedded/read-only mode)
    pub restricted: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            theme: "default-dark".to_string(),
            row_heading_width: 40.0,
            column_heading_height: 21.0,
            default_column_width: 100.0,
            default_row_height: 21.0,
            min_column_width: 20.0,
            min_row_height: 13.0,
            resize_tolerance: 4.0,
            double_click_ms: 500,
            autofill_handle_size: 8.0,
            embedded_edge_tolerance: 6.0,
            drag_threshold: 3.0,
            min_zoom: 0.01,
            max_zoom: 5.0,
            zoom_factor: 1.5,
            fit_margin: 20.0,
            max_fit_zoom: 2.0,
            animation_ms: 250,
            short_animation_ms: 100,
            short_move_threshold_px: 150.0,
            momentum_friction: 0.98,
            momentum_min_speed: 0.1,
            snap_back_delay_ms: 300,
            restricted: false,
        }
    }
}

impl GridConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: GridConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::config_file().context("No config directory available")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Fix values that would break the camera or gestures
    fn sanitized(mut self) -> Self {
        if self.min_zoom <= 0.0 {
            self.min_zoom = GridConfig::default().min_zoom;
        }
        if self.max_zoom < self.min_zoom {
            self.max_zoom = self.min_zoom;
        }
        if self.zoom_factor <= 1.0 {
            self.zoom_factor = GridConfig::default().zoom_factor;
        }
        if !(0.0..1.0).contains(&self.momentum_friction) {
            self.momentum_friction = GridConfig::default().momentum_friction;
        }
        if self.short_animation_ms >= self.animation_ms {
            self.short_animation_ms = self.animation_ms / 2;
        }
        self
    }

    pub fn default_offsets(&self) -> SheetOffsets {
        SheetOffsets::new(self.default_column_width, self.default_row_height)
    }

    /// Minimum size along an axis
    pub fn min_size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Column => self.min_column_width,
            Axis::Row => self.min_row_height,
        }
    }
}
