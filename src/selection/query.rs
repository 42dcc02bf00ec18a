use std::collections::BTreeSet;

use crate::geometry::{Axis, Pos, Rect, UNBOUNDED};

use super::{CellRange, Selection};

impl Selection {
    pub fn contains(&self, pos: Pos) -> bool {
        self.ranges.iter().any(|r| r.contains(pos))
    }

    pub fn is_multi_range(&self) -> bool {
        self.ranges.len() > 1
    }

    /// A single range that is a single cell
    pub fn is_single_selection(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].is_single_cell()
    }

    pub fn is_all_selected(&self) -> bool {
        self.ranges.iter().any(|r| matches!(r, CellRange::All))
    }

    /// Exactly one column range or row range (or a single cell, if `one_cell`)
    pub fn has_one_column_row_selection(&self, one_cell: bool) -> bool {
        if self.ranges.len() != 1 {
            return false;
        }
        let range = &self.ranges[0];
        range.is_line_range() || (one_cell && range.is_single_cell())
    }

    pub fn is_entire_column_selected(&self, column: i64) -> bool {
        self.ranges.iter().any(|r| r.covers_line(Axis::Column, column))
    }

    pub fn is_entire_row_selected(&self, row: i64) -> bool {
        self.ranges.iter().any(|r| r.covers_line(Axis::Row, row))
    }

    pub fn is_entire_line_selected(&self, axis: Axis, index: i64) -> bool {
        self.ranges.iter().any(|r| r.covers_line(axis, index))
    }

    /// True if any range overlaps one of `merges`
    pub fn contains_merged_cells(&self, merges: &[Rect]) -> bool {
        merges
            .iter()
            .any(|m| self.ranges.iter().any(|r| r.intersects(m)))
    }

    /// The only range, if it is a finite rectangle
    pub fn single_rect(&self) -> Option<Rect> {
        match self.ranges.as_slice() {
            [range] if range.is_finite() => Some(range.to_rect()),
            _ => None,
        }
    }

    /// Bounding box of all ranges, None if any range is unbounded
    pub fn finite_bounds(&self) -> Option<Rect> {
        let mut rects = self.ranges.iter().map(CellRange::to_rect);
        let first = rects.next()?;
        let bounds = rects.fold(first, |acc, r| acc.union(&r));
        bounds.is_finite().then_some(bounds)
    }

    /// The single entire-line span this selection consists of, if finite
    pub fn line_selection(&self, axis: Axis) -> Option<(i64, i64)> {
        match self.ranges.as_slice() {
            [range] => range
                .line_span(axis)
                .filter(|(_, max)| *max != UNBOUNDED),
            _ => None,
        }
    }

    /// Entire columns selected, sorted. None when the set is unbounded.
    pub fn selected_columns(&self) -> Option<Vec<i64>> {
        self.selected_lines(Axis::Column)
    }

    /// Entire rows selected, sorted. None when the set is unbounded.
    pub fn selected_rows(&self) -> Option<Vec<i64>> {
        self.selected_lines(Axis::Row)
    }

    pub fn selected_lines(&self, axis: Axis) -> Option<Vec<i64>> {
        let mut lines = BTreeSet::new();
        for range in &self.ranges {
            if let Some((min, max)) = range.line_span(axis) {
                if max == UNBOUNDED {
                    return None;
                }
                lines.extend(min..=max);
            }
        }
        Some(lines.into_iter().collect())
    }

    /// Distinct columns (or rows) touched by any range. None when unbounded.
    pub fn lines_touched(&self, axis: Axis) -> Option<Vec<i64>> {
        let mut lines = BTreeSet::new();
        for range in &self.ranges {
            let (min, max) = range.to_rect().span(axis);
            if max == UNBOUNDED {
                return None;
            }
            lines.extend(min..=max);
        }
        Some(lines.into_iter().collect())
    }

    /// Bottom-right cell of the active range (its top-left when unbounded)
    pub fn bottom_right_cell(&self) -> Pos {
        self.active_range().last_finite_corner()
    }
}
