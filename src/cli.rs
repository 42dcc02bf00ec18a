//! Command-line argument parsing
//!
//! `sheetview <SCRIPT> [--config PATH] [--json]` replays an interaction script
//! against an in-memory workbook and prints what the grid asked of the engine.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::config::GridConfig;
use crate::theme::Theme;

/// Replay spreadsheet grid interactions headlessly
#[derive(Parser, Debug)]
#[command(name = "sheetview", version, about = "Replay spreadsheet grid interactions headlessly")]
pub struct CliArgs {
    /// YAML interaction script
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Config file to use instead of ~/.config/sheetview/config.yaml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Theme id, overriding the config
    #[arg(long, value_name = "ID")]
    pub theme: Option<String>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub script: PathBuf,
    pub config: GridConfig,
    pub theme: Theme,
    pub json: bool,
}

impl CliArgs {
    /// Resolve the config and theme the replay runs with
    pub fn into_config(self) -> Result<StartupConfig> {
        if self.script.is_dir() {
            bail!("{} is a directory, expected a script", self.script.display());
        }

        let mut config = match &self.config {
            Some(path) => GridConfig::load_from(path)?,
            None => GridConfig::load(),
        };
        if let Some(theme) = self.theme {
            config.theme = theme;
        }

        let theme = match crate::theme::load_theme(&config.theme) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!(theme = %config.theme, "falling back to default theme: {}", e);
                Theme::default()
            }
        };

        Ok(StartupConfig {
            script: self.script,
            config,
            theme,
            json: self.json,
        })
    }
}
