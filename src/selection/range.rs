//! A single selected range

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Pos, Rect, UNBOUNDED};

/// A range that refers to a table rather than to fixed cells.
///
/// `footprint` is the cell area the range resolved to the last time tables were
/// refreshed. The table descriptors are authoritative; see
/// [`Selection::refresh_tables`](super::Selection::refresh_tables).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRange {
    pub name: String,
    /// Inclusive span of table column indices (0-based), or the whole table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<(u32, u32)>,
    pub footprint: Rect,
}

/// One range of a [`Selection`](super::Selection)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellRange {
    /// Finite rectangle
    Rect(Rect),
    /// Columns `min..=max`, rows `from_row..`. `max` may be [`UNBOUNDED`].
    Columns { min: i64, max: i64, from_row: i64 },
    /// Rows `min..=max`, columns `from_col..`. `max` may be [`UNBOUNDED`].
    Rows { min: i64, max: i64, from_col: i64 },
    /// The whole sheet
    All,
    Table(TableRange),
}

impl CellRange {
    pub fn cell(pos: Pos) -> Self {
        CellRange::Rect(Rect::single(pos))
    }

    pub fn from_corners(a: Pos, b: Pos) -> Self {
        CellRange::Rect(Rect::from_corners(a, b))
    }

    /// An entire column span (or row span, for [`Axis::Row`])
    pub fn lines(axis: Axis, min: i64, max: i64) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        match axis {
            Axis::Column => CellRange::Columns {
                min,
                max,
                from_row: 1,
            },
            Axis::Row => CellRange::Rows {
                min,
                max,
                from_col: 1,
            },
        }
    }

    /// Classify a possibly-unbounded rectangle into the matching variant
    pub fn from_rect(rect: Rect) -> Self {
        let open_x = rect.max.x == UNBOUNDED;
        let open_y = rect.max.y == UNBOUNDED;
        match (open_x, open_y) {
            (true, true) if rect.min == Pos::new(1, 1) => CellRange::All,
            (_, true) => CellRange::Columns {
                min: rect.min.x,
                max: rect.max.x,
                from_row: rect.min.y,
            },
            (true, false) => CellRange::Rows {
                min: rect.min.y,
                max: rect.max.y,
                from_col: rect.min.x,
            },
            (false, false) => CellRange::Rect(rect),
        }
    }

    /// The (possibly unbounded) area covered by this range
    pub fn to_rect(&self) -> Rect {
        match self {
            CellRange::Rect(r) => *r,
            CellRange::Columns { min, max, from_row } => Rect {
                min: Pos::new(*min, *from_row),
                max: Pos::new(*max, UNBOUNDED),
            },
            CellRange::Rows { min, max, from_col } => Rect {
                min: Pos::new(*from_col, *min),
                max: Pos::new(UNBOUNDED, *max),
            },
            CellRange::All => Rect {
                min: Pos::new(1, 1),
                max: Pos::new(UNBOUNDED, UNBOUNDED),
            },
            CellRange::Table(t) => t.footprint,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_rect().is_finite()
    }

    pub fn is_single_cell(&self) -> bool {
        matches!(self, CellRange::Rect(r) if r.is_single_cell())
    }

    /// True for a column range or a row range (not `All`)
    pub fn is_line_range(&self) -> bool {
        matches!(self, CellRange::Columns { .. } | CellRange::Rows { .. })
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.to_rect().contains(pos)
    }

    pub fn intersects(&self, rect: &Rect) -> bool {
        self.to_rect().intersects(rect)
    }

    /// True if the whole of column (or row) `index` lies inside this range
    pub fn covers_line(&self, axis: Axis, index: i64) -> bool {
        match (self, axis) {
            (CellRange::All, _) => true,
            (CellRange::Columns { min, max, from_row }, Axis::Column) => {
                *from_row == 1 && index >= *min && index <= *max
            }
            (CellRange::Rows { min, max, from_col }, Axis::Row) => {
                *from_col == 1 && index >= *min && index <= *max
            }
            _ => false,
        }
    }

    /// The span along `axis` if this range selects entire columns (or rows)
    pub fn line_span(&self, axis: Axis) -> Option<(i64, i64)> {
        match (self, axis) {
            (CellRange::All, _) => Some((1, UNBOUNDED)),
            (CellRange::Columns { min, max, from_row: 1 }, Axis::Column) => Some((*min, *max)),
            (CellRange::Rows { min, max, from_col: 1 }, Axis::Row) => Some((*min, *max)),
            _ => None,
        }
    }

    /// Removes entire line `index` from a range covering it.
    ///
    /// `All` splits into the lines before and after `index`.
    pub fn without_line(&self, axis: Axis, index: i64) -> Vec<CellRange> {
        let Some((min, max)) = self.line_span(axis) else {
            return vec![self.clone()];
        };
        if index < min || index > max {
            return vec![self.clone()];
        }
        let mut pieces = Vec::with_capacity(2);
        if min < index {
            pieces.push(CellRange::lines(axis, min, index - 1));
        }
        if index < max {
            pieces.push(CellRange::lines(axis, index + 1, max));
        }
        pieces
    }

    /// Bottom-right cell, or the top-left one when the range is unbounded
    pub fn last_finite_corner(&self) -> Pos {
        let rect = self.to_rect();
        if rect.is_finite() {
            rect.max
        } else {
            rect.min
        }
    }

    /// Shift by whole cells, clamping the start at 1
    pub fn translate(&self, dx: i64, dy: i64) -> CellRange {
        match self {
            CellRange::All => CellRange::All,
            CellRange::Table(t) => CellRange::Table(TableRange {
                footprint: t.footprint.translate(dx, dy),
                ..t.clone()
            }),
            other => {
                let moved = other.to_rect().translate(dx, dy);
                let clamped = Rect {
                    min: Pos::new(moved.min.x.max(1), moved.min.y.max(1)),
                    max: Pos::new(moved.max.x.max(1), moved.max.y.max(1)),
                };
                CellRange::from_rect(clamped)
            }
        }
    }
}
