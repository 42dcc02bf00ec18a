//! Engine request surface
//!
//! Requests are fire-and-forget; the engine answers with authoritative
//! snapshots (`Msg::Engine`) that overwrite local state.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Pos, Rect};
use crate::model::SheetId;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EngineRequest {
    InsertLines {
        axis: Axis,
        at: i64,
        count: i64,
    },
    DeleteLines {
        axis: Axis,
        indices: Vec<i64>,
    },
    /// Move `min..=max` so it starts at `to`
    MoveLines {
        axis: Axis,
        min: i64,
        max: i64,
        to: i64,
    },
    /// Commit a single interactive resize
    CommitResize {
        axis: Axis,
        index: i64,
        old_size: f64,
        new_size: f64,
    },
    ResizeLines {
        axis: Axis,
        indices: Vec<i64>,
        size: f64,
    },
    /// Resize every column (row) of the sheet
    ResizeAll {
        axis: Axis,
        size: f64,
    },
    ResizeToFit {
        axis: Axis,
        sizes: Vec<(i64, f64)>,
    },
    Autofill {
        source: Rect,
        target: Rect,
    },
    MoveCells {
        source: Rect,
        dest: Pos,
    },
    DeleteCells,
    ResizeEmbedded {
        anchor: Pos,
        width: f64,
        height: f64,
    },
    FlattenTable {
        name: String,
    },
    ConvertToTable {
        rect: Rect,
    },
    TableInsertColumn {
        name: String,
        index: u32,
    },
    TableRemoveColumn {
        name: String,
        index: u32,
    },
    SortTable {
        name: String,
        column: u32,
        ascending: bool,
    },
}

impl EngineRequest {
    pub fn name(&self) -> &'static str {
        match self {
            EngineRequest::InsertLines { .. } => "insert_lines",
            EngineRequest::DeleteLines { .. } => "delete_lines",
            EngineRequest::MoveLines { .. } => "move_lines",
            EngineRequest::CommitResize { .. } => "commit_resize",
            EngineRequest::ResizeLines { .. } => "resize_lines",
            EngineRequest::ResizeAll { .. } => "resize_all",
            EngineRequest::ResizeToFit { .. } => "resize_to_fit",
            EngineRequest::Autofill { .. } => "autofill",
            EngineRequest::MoveCells { .. } => "move_cells",
            EngineRequest::DeleteCells => "delete_cells",
            EngineRequest::ResizeEmbedded { .. } => "resize_embedded",
            EngineRequest::FlattenTable { .. } => "flatten_table",
            EngineRequest::ConvertToTable { .. } => "convert_to_table",
            EngineRequest::TableInsertColumn { .. } => "table_insert_column",
            EngineRequest::TableRemoveColumn { .. } => "table_remove_column",
            EngineRequest::SortTable { .. } => "sort_table",
        }
    }
}

/// A request plus the sheet and selection it applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineCall {
    pub sheet_id: SheetId,
    /// Selection token (see [`Selection::save`])
    pub cursor: String,
    pub request: EngineRequest,
}

impl EngineCall {
    pub fn new(selection: &Selection, request: EngineRequest) -> Self {
        Self {
            sheet_id: selection.sheet_id().clone(),
            cursor: selection.save(),
            request,
        }
    }
}

/// Acknowledgement of a committed resize, as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeAck {
    pub sheet_id: SheetId,
    pub axis: Axis,
    pub index: i64,
    pub size: f64,
}

impl ResizeAck {
    pub fn parse(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).context("malformed resize acknowledgement")
    }
}

/// Where engine calls go
pub trait EngineClient {
    fn send(&mut self, call: EngineCall);
}

/// Keeps every call; clones share the log
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    calls: Rc<RefCell<Vec<EngineCall>>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    pub fn requests(&self) -> Vec<EngineRequest> {
        self.calls.borrow().iter().map(|c| c.request.clone()).collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl EngineClient for RecordingEngine {
    fn send(&mut self, call: EngineCall) {
        tracing::debug!(request = call.request.name(), sheet = %call.sheet_id, "engine call");
        self.calls.borrow_mut().push(call);
    }
}

/// Forwards calls to an engine thread
pub struct ChannelEngine {
    tx: mpsc::Sender<EngineCall>,
}

impl ChannelEngine {
    pub fn new() -> (Self, mpsc::Receiver<EngineCall>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl EngineClient for ChannelEngine {
    fn send(&mut self, call: EngineCall) {
        let name = call.request.name();
        if self.tx.send(call).is_err() {
            tracing::warn!(request = name, "engine channel closed, dropping request");
        }
    }
}

/// Cooperative cancellation flag for long-running external work
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(u64);

#[derive(Debug)]
struct PendingOperation {
    id: OperationId,
    label: String,
    cancel: CancelHandle,
}

/// Long-running operations (e.g. a column auto-size measured off-thread)
#[derive(Debug, Default)]
pub struct PendingOperations {
    ops: Vec<PendingOperation>,
    next_id: u64,
}

impl PendingOperations {
    pub fn start(&mut self, label: impl Into<String>) -> (OperationId, CancelHandle) {
        let id = OperationId(self.next_id);
        self.next_id += 1;
        let cancel = CancelHandle::default();
        let label = label.into();
        tracing::debug!(id = id.0, %label, "operation started");
        self.ops.push(PendingOperation {
            id,
            label,
            cancel: cancel.clone(),
        });
        (id, cancel)
    }

    /// Returns false if the operation was unknown (already finished or cancelled)
    pub fn finish(&mut self, id: OperationId) -> bool {
        let before = self.ops.len();
        self.ops.retain(|op| op.id != id);
        self.ops.len() != before
    }

    /// Finishes every operation started with `label`; returns how many
    pub fn finish_labeled(&mut self, label: &str) -> usize {
        let before = self.ops.len();
        self.ops.retain(|op| op.label != label);
        before - self.ops.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        for op in &self.ops {
            tracing::debug!(id = op.id.0, label = %op.label, "operation cancelled");
            op.cancel.cancel();
        }
        let count = self.ops.len();
        self.ops.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
