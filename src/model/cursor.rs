//! Per-sheet cursor: the selection plus interaction state
//!
//! All selection changes go through [`Cursor`] so the dependent layers get
//! marked and the revision (which drives outbound presence) advances.

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Pos, Rect};
use crate::messages::Direction;
use crate::model::table::{TableMap, TableRegion};
use crate::render::dirty::{DirtyFlags, Layer};
use crate::selection::Selection;

use super::sheet::SheetId;

/// Last camera position used on a sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    selection: Selection,
    pub camera: Option<CameraSnapshot>,
    bulk_select: Option<Axis>,
    autofill_active: bool,
    moving: bool,
    resizing: bool,
    revision: u64,
    dirty: DirtyFlags,
}

impl Cursor {
    pub fn new(sheet_id: SheetId, dirty: DirtyFlags) -> Self {
        Self {
            selection: Selection::new(sheet_id),
            camera: None,
            bulk_select: None,
            autofill_active: false,
            moving: false,
            resizing: false,
            revision: 0,
            dirty,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn position(&self) -> Pos {
        self.selection.cursor()
    }

    pub fn sheet_id(&self) -> &SheetId {
        self.selection.sheet_id()
    }

    /// Bumped on every selection change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn bulk_select(&self) -> Option<Axis> {
        self.bulk_select
    }

    pub fn is_autofill_active(&self) -> bool {
        self.autofill_active
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    /// Applies `f` and, if the selection changed, marks layers and bumps the revision
    fn mutate<R>(&mut self, f: impl FnOnce(&mut Selection) -> R) -> R {
        let before = self.selection.clone();
        let result = f(&mut self.selection);
        self.selection.assert_invariants();
        if self.selection != before {
            self.revision += 1;
            self.dirty.mark_cursor();
        }
        result
    }

    pub fn move_to(&mut self, x: i64, y: i64, append: bool) -> bool {
        self.mutate(|s| s.move_to(x, y, append))
    }

    pub fn select_to(&mut self, x: i64, y: i64, append: bool, keep_anchor: bool) -> bool {
        self.mutate(|s| s.select_to(x, y, append, keep_anchor))
    }

    pub fn extend_active_to(&mut self, x: i64, y: i64) -> bool {
        self.mutate(|s| s.extend_active_to(x, y))
    }

    pub fn select_rect(&mut self, rect: Rect, append: bool) -> bool {
        self.mutate(|s| s.select_rect(rect.min.x, rect.min.y, rect.max.x, rect.max.y, append))
    }

    pub fn select_all(&mut self, append: bool) {
        self.mutate(|s| s.select_all(append))
    }

    pub fn select_column(&mut self, index: i64, toggle: bool, extend: bool, from_row: Option<i64>) -> bool {
        self.mutate(|s| s.select_column(index, toggle, extend, from_row))
    }

    pub fn select_row(&mut self, index: i64, toggle: bool, extend: bool, from_col: Option<i64>) -> bool {
        self.mutate(|s| s.select_row(index, toggle, extend, from_col))
    }

    pub fn select_line(&mut self, axis: Axis, index: i64, toggle: bool, extend: bool) -> bool {
        match axis {
            Axis::Column => self.select_column(index, toggle, extend, None),
            Axis::Row => self.select_row(index, toggle, extend, None),
        }
    }

    pub fn select_table(&mut self, table: &TableRegion, columns: Option<(u32, u32)>, append: bool) -> bool {
        self.mutate(|s| s.select_table(table, columns, append))
    }

    pub fn exclude_cells(&mut self, rect: Rect) {
        self.mutate(|s| s.exclude_cells(rect))
    }

    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        self.mutate(|s| s.move_cursor(direction))
    }

    pub fn extend(&mut self, direction: Direction) -> bool {
        self.mutate(|s| s.extend(direction))
    }

    pub fn set_columns_selected(&mut self) {
        self.mutate(|s| s.set_columns_selected())
    }

    pub fn set_rows_selected(&mut self) {
        self.mutate(|s| s.set_rows_selected())
    }

    pub fn translate(&mut self, dx: i64, dy: i64) {
        self.mutate(|s| s.translate(dx, dy))
    }

    pub fn inserted_lines(&mut self, axis: Axis, at: i64, count: i64) {
        self.mutate(|s| s.inserted_lines(axis, at, count))
    }

    pub fn removed_lines(&mut self, axis: Axis, at: i64, count: i64) {
        self.mutate(|s| s.removed_lines(axis, at, count))
    }

    /// Replace the selection wholesale (restored or loaded from a token).
    ///
    /// A selection for a different sheet is ignored.
    pub fn replace(&mut self, selection: Selection) -> bool {
        if selection.sheet_id() != self.selection.sheet_id() {
            tracing::warn!(
                expected = %self.selection.sheet_id(),
                got = %selection.sheet_id(),
                "ignoring selection for another sheet"
            );
            return false;
        }
        self.mutate(|s| *s = selection);
        true
    }

    /// Re-resolve table ranges after the sheet's tables changed
    pub fn refresh_tables(&mut self, tables: &TableMap) {
        self.mutate(|s| s.refresh_tables(tables))
    }

    pub fn set_bulk_select(&mut self, axis: Option<Axis>) {
        if self.bulk_select != axis {
            self.bulk_select = axis;
            self.dirty.mark(Layer::ColumnRowOverlay);
        }
    }

    pub fn set_autofill_active(&mut self, active: bool) {
        if self.autofill_active != active {
            self.autofill_active = active;
            self.dirty.mark(Layer::Cursor);
        }
    }

    pub fn set_moving(&mut self, moving: bool) {
        if self.moving != moving {
            self.moving = moving;
            self.dirty.mark_many(&[Layer::Cursor, Layer::MovingCells]);
        }
    }

    pub fn set_resizing(&mut self, resizing: bool) {
        if self.resizing != resizing {
            self.resizing = resizing;
            self.dirty.mark(Layer::Headings);
        }
    }
}
