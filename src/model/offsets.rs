//! Column widths and row heights
//!
//! Sizes are a default plus sparse overrides. Indices may be zero or negative
//! (headings to the left of/above A1); index 1 starts at pixel 0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, PixelRect, Point, Pos, Rect};

/// Sizes along one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    default: f64,
    #[serde(default)]
    sizes: BTreeMap<i64, f64>,
}

impl Offsets {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            sizes: BTreeMap::new(),
        }
    }

    pub fn default_size(&self) -> f64 {
        self.default
    }

    pub fn size(&self, index: i64) -> f64 {
        self.sizes.get(&index).copied().unwrap_or(self.default)
    }

    /// Sets a size, returning the previous one
    pub fn set_size(&mut self, index: i64, size: f64) -> f64 {
        let old = self.size(index);
        if (size - self.default).abs() < f64::EPSILON {
            self.sizes.remove(&index);
        } else {
            self.sizes.insert(index, size);
        }
        old
    }

    /// Custom sizes, in index order
    pub fn custom_sizes(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.sizes.iter().map(|(i, s)| (*i, *s))
    }

    /// Pixel position where `index` starts
    pub fn position(&self, index: i64) -> f64 {
        let base = (index - 1) as f64 * self.default;
        let delta = |(_, s): (&i64, &f64)| *s - self.default;
        if index >= 1 {
            base + self.sizes.range(1..index).map(delta).sum::<f64>()
        } else {
            base - self.sizes.range(index..1).map(delta).sum::<f64>()
        }
    }

    /// Total size of `min..=max`
    pub fn span_size(&self, min: i64, max: i64) -> f64 {
        self.position(max + 1) - self.position(min)
    }

    /// Index of the column/row containing pixel `px`
    pub fn find_index(&self, px: f64) -> i64 {
        if px >= 0.0 {
            let mut start = 0.0;
            let mut index = 1;
            for (&k, &size) in self.sizes.range(1..) {
                let run_end = start + (k - index) as f64 * self.default;
                if px < run_end {
                    return index + ((px - start) / self.default).floor() as i64;
                }
                if px < run_end + size {
                    return k;
                }
                start = run_end + size;
                index = k + 1;
            }
            index + ((px - start) / self.default).floor() as i64
        } else {
            let mut end = 0.0;
            let mut index = 0;
            for (&k, &size) in self.sizes.range(..1).rev() {
                let run_start = end - (index - k) as f64 * self.default;
                if px >= run_start {
                    return index - ((end - px) / self.default).ceil() as i64 + 1;
                }
                if px >= run_start - size {
                    return k;
                }
                end = run_start - size;
                index = k - 1;
            }
            index - ((end - px) / self.default).ceil() as i64 + 1
        }
    }

    /// Shifts custom sizes for `count` lines inserted at `at`
    pub fn insert(&mut self, at: i64, count: i64) {
        self.remap(|i| if i >= at { Some(i + count) } else { Some(i) });
    }

    /// Drops custom sizes for lines `at..at + count` and closes the gap
    pub fn remove(&mut self, at: i64, count: i64) {
        self.remap(|i| {
            if i >= at + count {
                Some(i - count)
            } else if i >= at {
                None
            } else {
                Some(i)
            }
        });
    }

    /// Moves the sizes of `min..=max` so the span starts at `to`
    pub fn move_span(&mut self, min: i64, max: i64, to: i64) {
        let len = max - min + 1;
        self.remap(|i| {
            Some(if (min..=max).contains(&i) {
                to + (i - min)
            } else if to < min && i >= to && i < min {
                i + len
            } else if to > min && i > max && i < to + len {
                i - len
            } else {
                i
            })
        });
    }

    fn remap(&mut self, map: impl Fn(i64) -> Option<i64>) {
        let old = std::mem::take(&mut self.sizes);
        self.sizes = old
            .into_iter()
            .filter_map(|(i, s)| map(i).map(|n| (n, s)))
            .collect();
    }
}

/// Column and row sizes for one sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetOffsets {
    pub columns: Offsets,
    pub rows: Offsets,
}

impl SheetOffsets {
    pub fn new(column_width: f64, row_height: f64) -> Self {
        Self {
            columns: Offsets::new(column_width),
            rows: Offsets::new(row_height),
        }
    }

    pub fn axis(&self, axis: Axis) -> &Offsets {
        match axis {
            Axis::Column => &self.columns,
            Axis::Row => &self.rows,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut Offsets {
        match axis {
            Axis::Column => &mut self.columns,
            Axis::Row => &mut self.rows,
        }
    }

    /// Cell under a world-space point
    pub fn cell_at(&self, point: Point) -> Pos {
        Pos::new(self.columns.find_index(point.x), self.rows.find_index(point.y))
    }

    /// World-space rectangle of one cell
    pub fn cell_rect(&self, pos: Pos) -> PixelRect {
        PixelRect::new(
            self.columns.position(pos.x),
            self.rows.position(pos.y),
            self.columns.size(pos.x),
            self.rows.size(pos.y),
        )
    }

    /// World-space rectangle of a finite cell range
    pub fn rect_pixels(&self, rect: &Rect) -> PixelRect {
        let x = self.columns.position(rect.min.x);
        let y = self.rows.position(rect.min.y);
        PixelRect::new(
            x,
            y,
            self.columns.position(rect.max.x + 1) - x,
            self.rows.position(rect.max.y + 1) - y,
        )
    }
}

impl Default for SheetOffsets {
    fn default() -> Self {
        Self::new(100.0, 21.0)
    }
}
