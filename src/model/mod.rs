//! Application model - the complete state of the grid front end
//!
//! Follows the Elm Architecture: state lives here, `update` transforms it and
//! returns commands for the runtime to execute.

pub mod cursor;
pub mod offsets;
pub mod sheet;
pub mod sheets;
pub mod table;

use std::time::Instant;

pub use cursor::{CameraSnapshot, Cursor};
pub use offsets::{Offsets, SheetOffsets};
pub use sheet::{ContentExtents, EmbeddedKind, EmbeddedObject, Sheet, SheetId, SheetInfo};
pub use sheets::{SheetEntry, Sheets};
pub use table::{TableKind, TableMap, TableRegion};

use crate::config::GridConfig;
use crate::engine::PendingOperations;
use crate::events::EventBus;
use crate::geometry::{Axis, PixelRect, Rect};
use crate::presence::Presence;
use crate::render::dirty::{DirtyFlags, Layer};
use crate::theme::Theme;
use crate::viewport::Viewport;

/// Autofill drag preview
#[derive(Debug, Clone, PartialEq)]
pub struct AutofillPreview {
    pub source: Rect,
    pub target: Rect,
    /// Cells that a shrink will clear
    pub cleared: Vec<Rect>,
}

/// Cell or table drag-move preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePreview {
    pub origin: Rect,
    pub destination: Rect,
    pub valid: bool,
}

/// Column/row drag-move preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMovePreview {
    pub axis: Axis,
    pub span: (i64, i64),
    /// New first index of the moved span
    pub to: i64,
    pub valid: bool,
}

/// Transient size of an embedded object being resized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddedPreview {
    pub index: usize,
    pub width: f64,
    pub height: f64,
}

/// Gesture previews drawn by the overlay layers
#[derive(Debug, Default)]
pub struct Previews {
    autofill: Option<AutofillPreview>,
    moving: Option<MovePreview>,
    line_move: Option<LineMovePreview>,
    embedded: Option<EmbeddedPreview>,
}

impl Previews {
    pub fn autofill(&self) -> Option<&AutofillPreview> {
        self.autofill.as_ref()
    }

    pub fn moving(&self) -> Option<&MovePreview> {
        self.moving.as_ref()
    }

    pub fn line_move(&self) -> Option<&LineMovePreview> {
        self.line_move.as_ref()
    }

    pub fn embedded(&self) -> Option<&EmbeddedPreview> {
        self.embedded.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.autofill.is_none()
            && self.moving.is_none()
            && self.line_move.is_none()
            && self.embedded.is_none()
    }
}

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    pub sheets: Sheets,
    pub viewport: Viewport,
    pub config: GridConfig,
    pub theme: Theme,
    pub dirty: DirtyFlags,
    pub events: EventBus,
    pub presence: Presence,
    previews: Previews,
    pub pending: PendingOperations,
    /// False until the first workbook snapshot has arrived
    pub ready: bool,
    /// Rendering paused (e.g. window hidden)
    pub paused: bool,
    /// Time of the event being processed; drives animations
    pub now: Instant,
}

impl AppModel {
    pub fn new(width: f64, height: f64, config: GridConfig, theme: Theme) -> Self {
        let dirty = DirtyFlags::new();
        Self {
            sheets: Sheets::new(config.default_offsets(), dirty.clone()),
            viewport: Viewport::new(width, height, &config),
            presence: Presence::new(dirty.clone()),
            config,
            theme,
            dirty,
            events: EventBus::new(),
            previews: Previews::default(),
            pending: PendingOperations::default(),
            ready: false,
            paused: false,
            now: Instant::now(),
        }
    }

    pub fn previews(&self) -> &Previews {
        &self.previews
    }

    pub fn set_autofill_preview(&mut self, preview: Option<AutofillPreview>) {
        if self.previews.autofill != preview {
            self.previews.autofill = preview;
            self.dirty.mark(Layer::Cursor);
        }
    }

    pub fn set_move_preview(&mut self, preview: Option<MovePreview>) {
        if self.previews.moving != preview {
            self.previews.moving = preview;
            self.dirty.mark(Layer::MovingCells);
        }
    }

    pub fn set_line_move_preview(&mut self, preview: Option<LineMovePreview>) {
        if self.previews.line_move != preview {
            self.previews.line_move = preview;
            self.dirty.mark_many(&[Layer::MovingCells, Layer::Headings]);
        }
    }

    pub fn set_embedded_preview(&mut self, preview: Option<EmbeddedPreview>) {
        if self.previews.embedded != preview {
            self.previews.embedded = preview;
            self.dirty.mark(Layer::Cursor);
        }
    }

    /// Structural edits are disabled in restricted (embedded) mode
    pub fn is_restricted(&self) -> bool {
        self.config.restricted
    }

    pub fn current(&self) -> Option<&SheetEntry> {
        self.sheets.current()
    }

    pub fn current_mut(&mut self) -> Option<&mut SheetEntry> {
        self.sheets.current_mut()
    }

    /// World rect of the cursor cell (merged area included)
    pub fn cursor_world_rect(&self) -> Option<PixelRect> {
        let entry = self.current()?;
        Some(entry.sheet.cell_bounds(entry.cursor.position()))
    }

    /// Scroll so the cursor cell is fully visible
    pub fn ensure_cursor_visible(&mut self) -> bool {
        let Some(rect) = self.cursor_world_rect() else {
            return false;
        };
        self.viewport.ensure_visible(&rect, self.now)
    }

    /// World rect of the content, if the current sheet has any
    pub fn content_world_rect(&self) -> Option<PixelRect> {
        let entry = self.current()?;
        let bounds = entry.sheet.content_bounds?;
        Some(entry.sheet.offsets.rect_pixels(&bounds))
    }

    /// World rect of the selection's finite bounds
    pub fn selection_world_rect(&self) -> Option<PixelRect> {
        let entry = self.current()?;
        let bounds = entry.cursor.selection().finite_bounds()?;
        Some(entry.sheet.offsets.rect_pixels(&bounds))
    }
}
