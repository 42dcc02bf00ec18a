//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging selection,
//! gesture and render scheduling issues.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=selection=debug,message=debug` - scoped filtering
//! - `RUST_LOG=sheetview::pointer=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/sheetview/logs/sheetview.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::geometry::Pos;
use crate::model::Cursor;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). The file layer always
/// logs at debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of selection state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub sheet: String,
    pub cursor: Pos,
    pub anchor: Pos,
    pub range_count: usize,
    pub active: usize,
    pub revision: u64,
}

impl SelectionSnapshot {
    pub fn from_cursor(cursor: &Cursor) -> Self {
        let selection = cursor.selection();
        Self {
            sheet: cursor.sheet_id().to_string(),
            cursor: selection.cursor(),
            anchor: selection.anchor(),
            range_count: selection.ranges().len(),
            active: selection.active_index(),
            revision: cursor.revision(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        if self.sheet != other.sheet {
            return Some(format!("sheet: {} → {}", self.sheet, other.sheet));
        }

        let mut changes = Vec::new();
        if self.cursor != other.cursor {
            changes.push(format!(
                "cursor: ({},{}) → ({},{})",
                self.cursor.x, self.cursor.y, other.cursor.x, other.cursor.y
            ));
        }
        if self.anchor != other.anchor {
            changes.push(format!(
                "anchor: ({},{}) → ({},{})",
                self.anchor.x, self.anchor.y, other.anchor.x, other.anchor.y
            ));
        }
        if self.range_count != other.range_count {
            changes.push(format!("ranges: {} → {}", self.range_count, other.range_count));
        }
        if self.active != other.active {
            changes.push(format!("active: {} → {}", self.active, other.active));
        }
        if changes.is_empty() && self.revision != other.revision {
            changes.push("ranges reshaped".to_string());
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SheetId;
    use crate::render::dirty::DirtyFlags;

    #[test]
    fn test_diff_reports_cursor_and_range_changes() {
        let mut cursor = Cursor::new(SheetId::from("s1"), DirtyFlags::new());
        let before = SelectionSnapshot::from_cursor(&cursor);
        assert_eq!(before.diff(&before), None);

        cursor.move_to(3, 2, true);
        let after = SelectionSnapshot::from_cursor(&cursor);
        let diff = before.diff(&after).expect("diff");
        assert!(diff.contains("cursor: (1,1) → (3,2)"));
        assert!(diff.contains("ranges: 1 → 2"));
    }

    #[test]
    fn test_diff_notices_reshaped_range() {
        let mut cursor = Cursor::new(SheetId::from("s1"), DirtyFlags::new());
        let before = SelectionSnapshot::from_cursor(&cursor);
        cursor.select_to(4, 4, false, true);
        let after = SelectionSnapshot::from_cursor(&cursor);
        assert_eq!(before.diff(&after).as_deref(), Some("ranges reshaped"));
    }
}
