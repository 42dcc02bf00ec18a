//! Message types for the Elm-style architecture
//!
//! All state changes that are not pointer gestures flow through these types.
//! Pointer gestures are handled by [`crate::pointer`] and report back through
//! the same commands.

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Rect};
use crate::model::{CameraSnapshot, SheetId, SheetInfo, SheetOffsets, TableMap};

/// Direction for cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in cell coordinates
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Keyboard selection messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorMsg {
    /// Arrow key
    Move(Direction),
    /// Shift+arrow
    Extend(Direction),
    MoveTo { x: i64, y: i64 },
    SelectAll,
    /// Cmd+space
    SelectColumns,
    /// Shift+space
    SelectRows,
    SelectTable {
        name: String,
        #[serde(default)]
        columns: Option<(u32, u32)>,
    },
    /// Go-to box: select ranges written in A1 notation
    Goto { a1: String },
    /// Delete key on the selection
    DeleteCells,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportMsg {
    ZoomIn,
    ZoomOut,
    ZoomToFit,
    ZoomToSelection,
    /// A pan drag begins; the pans until `PanEnd` feed momentum
    PanStart,
    /// Screen-space pan
    Pan { dx: f64, dy: f64 },
    PanEnd,
    /// Wheel or pinch zoom around a screen point
    ZoomAt { x: f64, y: f64, scale: f64 },
    Reset,
}

/// Column/row insertion and deletion from the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralMsg {
    /// Insert before (left of / above) the selection, or after it
    Insert { axis: Axis, before: bool },
    Delete { axis: Axis },
}

/// Edits on the table under the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMsg {
    Flatten,
    /// Turn the selected rectangle into a table
    Convert,
    InsertColumn { index: u32 },
    RemoveColumn { index: u32 },
    Sort { column: u32, ascending: bool },
}

/// Authoritative snapshots from the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineMsg {
    SheetInfo(SheetInfo),
    SheetDeleted {
        sheet_id: SheetId,
    },
    OffsetsChanged {
        sheet_id: SheetId,
        offsets: SheetOffsets,
    },
    TablesChanged {
        sheet_id: SheetId,
        tables: TableMap,
    },
    ContentBounds {
        sheet_id: SheetId,
        bounds: Option<Rect>,
    },
    /// Selection restored by undo/redo, as a token
    CursorRestore {
        token: String,
    },
    /// JSON payload, see [`crate::engine::ResizeAck`]
    ResizeAck {
        payload: String,
    },
}

/// Inbound presence traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresenceMsg {
    Update {
        session: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        color: usize,
        token: String,
        #[serde(default)]
        camera: Option<CameraSnapshot>,
    },
    Leave {
        session: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppMsg {
    Resize { width: f64, height: f64 },
    SwitchSheet(SheetId),
    Pause,
    Resume,
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    Cursor(CursorMsg),
    Viewport(ViewportMsg),
    Structural(StructuralMsg),
    Table(TableMsg),
    Engine(EngineMsg),
    Presence(PresenceMsg),
    App(AppMsg),
}
