//! Multi-range cell selection
//!
//! A [`Selection`] always holds at least one range, exactly one of which is
//! active. The `anchor` is where keyboard/shift extension starts; the `cursor`
//! is the outlined cell.

pub mod a1;
mod exclude;
mod query;
mod range;
mod select;
mod token;

pub use range::{CellRange, TableRange};

use crate::geometry::{Pos, Rect};
use crate::model::sheet::SheetId;
use crate::model::table::TableMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    sheet_id: SheetId,
    ranges: Vec<CellRange>,
    active: usize,
    anchor: Pos,
    cursor: Pos,
}

impl Selection {
    /// A single-cell selection at A1
    pub fn new(sheet_id: SheetId) -> Self {
        Self::at(sheet_id, Pos::new(1, 1))
    }

    /// A single-cell selection at `pos`
    pub fn at(sheet_id: SheetId, pos: Pos) -> Self {
        Self {
            sheet_id,
            ranges: vec![CellRange::cell(pos)],
            active: 0,
            anchor: pos,
            cursor: pos,
        }
    }

    pub fn sheet_id(&self) -> &SheetId {
        &self.sheet_id
    }

    pub fn ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_range(&self) -> &CellRange {
        &self.ranges[self.active]
    }

    pub fn anchor(&self) -> Pos {
        self.anchor
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    /// Re-resolve table ranges against current table descriptors.
    ///
    /// Ranges whose table no longer exists keep their last footprint as a
    /// plain range.
    pub fn refresh_tables(&mut self, tables: &TableMap) {
        for range in self.ranges.iter_mut() {
            let CellRange::Table(table_range) = range else {
                continue;
            };
            match tables.resolve(&table_range.name, table_range.columns) {
                Some(footprint) => table_range.footprint = footprint,
                None => {
                    tracing::debug!(
                        table = %table_range.name,
                        "table gone, keeping footprint as plain range"
                    );
                    *range = CellRange::from_rect(table_range.footprint);
                }
            }
        }
    }

    /// Replace everything with `ranges`, falling back to the anchor cell when empty
    fn set_ranges(&mut self, ranges: Vec<CellRange>) {
        if ranges.is_empty() {
            self.collapse_to_anchor();
            return;
        }
        self.ranges = ranges;
        self.active = self.ranges.len() - 1;
    }

    fn collapse_to_anchor(&mut self) {
        self.ranges = vec![CellRange::cell(self.anchor)];
        self.active = 0;
        self.cursor = self.anchor;
    }

    fn push_active(&mut self, range: CellRange) {
        self.ranges.push(range);
        self.active = self.ranges.len() - 1;
    }

    /// Debug-only consistency check
    pub fn assert_invariants(&self) {
        debug_assert!(!self.ranges.is_empty(), "selection has no ranges");
        debug_assert!(
            self.active < self.ranges.len(),
            "active index {} out of {} ranges",
            self.active,
            self.ranges.len()
        );
        debug_assert!(self.cursor.is_valid(), "cursor {:?} invalid", self.cursor);
    }

    /// Bounding rectangle of the active range
    pub fn active_rect(&self) -> Rect {
        self.active_range().to_rect()
    }
}
