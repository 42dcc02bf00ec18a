//! Selection mutators

use crate::geometry::{is_valid_coord, Axis, Pos, Rect, UNBOUNDED};
use crate::messages::Direction;
use crate::model::table::TableRegion;

use super::{CellRange, Selection, TableRange};

impl Selection {
    /// Moves the cursor to a single cell, replacing the selection unless `append`.
    ///
    /// Returns false (and changes nothing) for coordinates that cannot address a cell.
    pub fn move_to(&mut self, x: i64, y: i64, append: bool) -> bool {
        let pos = Pos::new(x, y);
        if !pos.is_valid() {
            return false;
        }
        if append {
            self.push_active(CellRange::cell(pos));
        } else {
            self.ranges = vec![CellRange::cell(pos)];
            self.active = 0;
        }
        self.anchor = pos;
        self.cursor = pos;
        true
    }

    /// Extends the active range from the anchor to `(x, y)`.
    ///
    /// With `append` a new range is started from the anchor and the existing
    /// ranges are kept; otherwise the extended range replaces them. Column and
    /// row ranges extend along their own axis only. When `keep_anchor` is false
    /// the outlined cursor follows the target.
    pub fn select_to(&mut self, x: i64, y: i64, append: bool, keep_anchor: bool) -> bool {
        let target = Pos::new(x, y);
        if !target.is_valid() {
            return false;
        }
        let anchor = self.anchor;

        if append {
            self.push_active(CellRange::from_corners(anchor, target));
        } else {
            let extended = match self.active_range() {
                CellRange::Columns { from_row, .. } => CellRange::Columns {
                    min: anchor.x.min(x),
                    max: anchor.x.max(x),
                    from_row: *from_row,
                },
                CellRange::Rows { from_col, .. } => CellRange::Rows {
                    min: anchor.y.min(y),
                    max: anchor.y.max(y),
                    from_col: *from_col,
                },
                _ => CellRange::from_corners(anchor, target),
            };
            self.ranges = vec![extended];
            self.active = 0;
        }

        self.cursor = if keep_anchor { anchor } else { target };
        true
    }

    /// Drag selection: the active range becomes anchor..target, other ranges stay
    pub fn extend_active_to(&mut self, x: i64, y: i64) -> bool {
        let target = Pos::new(x, y);
        if !target.is_valid() {
            return false;
        }
        self.ranges[self.active] = CellRange::from_corners(self.anchor, target);
        self.cursor = self.anchor;
        true
    }

    /// Selects a rectangle, with the cursor on its top-left cell
    pub fn select_rect(&mut self, left: i64, top: i64, right: i64, bottom: i64, append: bool) -> bool {
        let rect = Rect::new(left, top, right, bottom);
        if !rect.min.is_valid() || !rect.max.is_valid() {
            return false;
        }
        let range = CellRange::Rect(rect);
        if append {
            self.push_active(range);
        } else {
            self.ranges = vec![range];
            self.active = 0;
        }
        self.anchor = rect.min;
        self.cursor = rect.min;
        true
    }

    /// Selects the whole sheet. The cursor stays where it is.
    pub fn select_all(&mut self, append: bool) {
        if append {
            self.push_active(CellRange::All);
        } else {
            self.ranges = vec![CellRange::All];
            self.active = 0;
        }
        self.anchor = self.cursor;
    }

    /// Column selection from a header click.
    ///
    /// * plain: the selection becomes column `index` (rows `from_row..`)
    /// * `toggle`: adds the column, or removes it from every range that covers it
    /// * `extend`: the active range becomes the columns between the anchor and `index`
    pub fn select_column(&mut self, index: i64, toggle: bool, extend: bool, from_row: Option<i64>) -> bool {
        self.select_line(Axis::Column, index, toggle, extend, from_row)
    }

    /// Row counterpart of [`select_column`](Self::select_column)
    pub fn select_row(&mut self, index: i64, toggle: bool, extend: bool, from_col: Option<i64>) -> bool {
        self.select_line(Axis::Row, index, toggle, extend, from_col)
    }

    fn select_line(&mut self, axis: Axis, index: i64, toggle: bool, extend: bool, from: Option<i64>) -> bool {
        if !is_valid_coord(index) || from.is_some_and(|f| !is_valid_coord(f)) {
            return false;
        }
        let cross = axis.cross();

        if extend && !toggle {
            let lo = axis.of(self.anchor).min(index);
            let hi = axis.of(self.anchor).max(index);
            let span = CellRange::lines(axis, lo, hi);
            self.ranges[self.active] = span;
            return true;
        }

        if toggle {
            if self.ranges.iter().any(|r| r.covers_line(axis, index)) {
                self.remove_line(axis, index);
            } else {
                self.push_active(CellRange::lines(axis, index, index));
                self.cursor = Pos::from_axis(axis, index, cross.of(self.cursor));
                self.anchor = self.cursor;
            }
            return true;
        }

        let start = from.unwrap_or(1);
        let range = match axis {
            Axis::Column => CellRange::Columns {
                min: index,
                max: index,
                from_row: start,
            },
            Axis::Row => CellRange::Rows {
                min: index,
                max: index,
                from_col: start,
            },
        };
        self.ranges = vec![range];
        self.active = 0;
        self.cursor = Pos::from_axis(axis, index, from.unwrap_or(cross.of(self.cursor)));
        self.anchor = self.cursor;
        true
    }

    fn remove_line(&mut self, axis: Axis, index: i64) {
        let remaining: Vec<CellRange> = self
            .ranges
            .iter()
            .flat_map(|r| r.without_line(axis, index))
            .collect();

        if remaining.is_empty() {
            self.collapse_to_anchor();
            return;
        }
        self.set_ranges(remaining);

        if !self.contains(self.cursor) {
            let across = axis.cross().of(self.cursor);
            let next = Pos::from_axis(axis, index + 1, across);
            let prev = Pos::from_axis(axis, index - 1, across);
            self.cursor = if self.contains(next) {
                next
            } else if prev.is_valid() && self.contains(prev) {
                prev
            } else {
                self.active_range().to_rect().min
            };
            self.anchor = self.cursor;
        }
    }

    /// Selects a table, or a span of its columns
    pub fn select_table(&mut self, table: &TableRegion, columns: Option<(u32, u32)>, append: bool) -> bool {
        let Some(footprint) = table.resolve_columns(columns) else {
            return false;
        };
        let range = CellRange::Table(TableRange {
            name: table.name.clone(),
            columns,
            footprint,
        });
        if append {
            self.push_active(range);
        } else {
            self.ranges = vec![range];
            self.active = 0;
        }
        self.cursor = footprint.min;
        self.anchor = footprint.min;
        true
    }

    /// Expands the active range to the entire columns it spans (cmd+space)
    pub fn set_columns_selected(&mut self) {
        self.expand_to_lines(Axis::Column);
    }

    /// Expands the active range to the entire rows it spans (shift+space)
    pub fn set_rows_selected(&mut self) {
        self.expand_to_lines(Axis::Row);
    }

    fn expand_to_lines(&mut self, axis: Axis) {
        let (lo, hi) = self.active_rect().span(axis);
        self.ranges = vec![CellRange::lines(axis, lo, hi)];
        self.active = 0;
    }

    /// Keyboard navigation: moves the cursor one cell and collapses the selection
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        let next = self.cursor.translate(dx, dy);
        self.move_to(next.x.max(1), next.y.max(1), false)
    }

    /// Shift+arrow: moves the far edge of the active range one cell
    pub fn extend(&mut self, direction: Direction) -> bool {
        let rect = self.active_rect();
        let far = if rect.is_finite() {
            Pos::new(
                if rect.min.x == self.anchor.x { rect.max.x } else { rect.min.x },
                if rect.min.y == self.anchor.y { rect.max.y } else { rect.min.y },
            )
        } else {
            self.cursor
        };
        let (dx, dy) = direction.delta();
        let next = far.translate(dx, dy);
        self.select_to(next.x.max(1), next.y.max(1), false, true)
    }

    /// Shifts everything by whole cells (after a committed move)
    pub fn translate(&mut self, dx: i64, dy: i64) {
        for range in self.ranges.iter_mut() {
            *range = range.translate(dx, dy);
        }
        let clamp = |p: Pos| Pos::new(p.x.max(1), p.y.max(1));
        self.cursor = clamp(self.cursor.translate(dx, dy));
        self.anchor = clamp(self.anchor.translate(dx, dy));
    }

    /// Keeps the selection on the same cells after `count` lines were inserted at `at`
    pub fn inserted_lines(&mut self, axis: Axis, at: i64, count: i64) {
        let shift = |v: i64| if v != UNBOUNDED && v >= at { v + count } else { v };
        for range in self.ranges.iter_mut() {
            if matches!(range, CellRange::All | CellRange::Table(_)) {
                continue;
            }
            let r = range.to_rect();
            let moved = match axis {
                Axis::Column => Rect {
                    min: Pos::new(shift(r.min.x), r.min.y),
                    max: Pos::new(shift(r.max.x), r.max.y),
                },
                Axis::Row => Rect {
                    min: Pos::new(r.min.x, shift(r.min.y)),
                    max: Pos::new(r.max.x, shift(r.max.y)),
                },
            };
            *range = CellRange::from_rect(moved);
        }
        let shift_pos = |p: Pos| match axis {
            Axis::Column => Pos::new(shift(p.x), p.y),
            Axis::Row => Pos::new(p.x, shift(p.y)),
        };
        self.cursor = shift_pos(self.cursor);
        self.anchor = shift_pos(self.anchor);
    }

    /// Keeps the selection consistent after lines `at..at + count` were deleted
    pub fn removed_lines(&mut self, axis: Axis, at: i64, count: i64) {
        let last_removed = at + count - 1;
        let shift_min = |v: i64| {
            if v > last_removed {
                v - count
            } else if v >= at {
                at
            } else {
                v
            }
        };
        let shift_max = |v: i64| {
            if v == UNBOUNDED {
                v
            } else if v > last_removed {
                v - count
            } else if v >= at {
                at - 1
            } else {
                v
            }
        };

        let mut kept = Vec::with_capacity(self.ranges.len());
        for range in &self.ranges {
            if matches!(range, CellRange::All | CellRange::Table(_)) {
                kept.push(range.clone());
                continue;
            }
            let r = range.to_rect();
            let (min, max) = r.span(axis);
            let (new_min, new_max) = (shift_min(min), shift_max(max));
            if new_max < new_min {
                continue;
            }
            let adjusted = match axis {
                Axis::Column => Rect {
                    min: Pos::new(new_min, r.min.y),
                    max: Pos::new(new_max, r.max.y),
                },
                Axis::Row => Rect {
                    min: Pos::new(r.min.x, new_min),
                    max: Pos::new(r.max.x, new_max),
                },
            };
            kept.push(CellRange::from_rect(adjusted));
        }

        let clamp_pos = |p: Pos| {
            let along = shift_min(axis.of(p)).max(1);
            Pos::from_axis(axis, along, axis.cross().of(p))
        };
        self.cursor = clamp_pos(self.cursor);
        self.anchor = clamp_pos(self.anchor);
        self.set_ranges(kept);
    }
}
