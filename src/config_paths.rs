//! Centralized configuration paths for sheetview
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/sheetview/`
//! - Windows: `%APPDATA%\sheetview\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "sheetview";

/// Log file prefix; the daily appender adds a `.YYYY-MM-DD` suffix
pub const LOG_FILE_NAME: &str = "sheetview.log";

/// Base config directory for sheetview
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/sheetview`
///   - Else: `~/.config/sheetview`
///
/// Windows:
///   - `%APPDATA%\sheetview`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/sheetview/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/sheetview/themes/`
pub fn themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

/// `~/.config/sheetview/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| anyhow::anyhow!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
    let dir = config_dir().ok_or_else(|| anyhow::anyhow!("No config directory available"))?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> anyhow::Result<PathBuf> {
    let logs = ensure_config_dir()?.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}
