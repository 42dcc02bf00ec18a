//! Grid geometry primitives
//!
//! Cell coordinates are 1-based (`A1` is `(1, 1)`). [`UNBOUNDED`] marks an
//! open end of a range and is never a valid cell coordinate.

use serde::{Deserialize, Serialize};

/// Sentinel for "no bound" on a range end
pub const UNBOUNDED: i64 = i64::MAX;

/// Returns true if `value` can address a cell on one axis
#[inline]
pub fn is_valid_coord(value: i64) -> bool {
    value >= 1 && value != UNBOUNDED
}

/// Which axis a column/row operation works along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Column,
    Row,
}

impl Axis {
    /// The component of `pos` along this axis
    #[inline]
    pub fn of(self, pos: Pos) -> i64 {
        match self {
            Axis::Column => pos.x,
            Axis::Row => pos.y,
        }
    }

    /// The other axis
    #[inline]
    pub fn cross(self) -> Axis {
        match self {
            Axis::Column => Axis::Row,
            Axis::Row => Axis::Column,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Column => "column",
            Axis::Row => "row",
        }
    }
}

/// A cell position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i64,
    pub y: i64,
}

impl Pos {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Build a position from an axis-major pair
    pub fn from_axis(axis: Axis, along: i64, across: i64) -> Self {
        match axis {
            Axis::Column => Pos::new(along, across),
            Axis::Row => Pos::new(across, along),
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_coord(self.x) && is_valid_coord(self.y)
    }

    pub fn translate(&self, dx: i64, dy: i64) -> Pos {
        Pos::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// An inclusive rectangle of cells. Either `max` component may be [`UNBOUNDED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub min: Pos,
    pub max: Pos,
}

impl Rect {
    /// Create a rectangle from two corners in any order
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self {
            min: Pos::new(x0.min(x1), y0.min(y1)),
            max: Pos::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn from_corners(a: Pos, b: Pos) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn single(pos: Pos) -> Self {
        Self { min: pos, max: pos }
    }

    /// Rectangle of `width` x `height` cells starting at `origin`
    pub fn from_origin(origin: Pos, width: i64, height: i64) -> Self {
        Self {
            min: origin,
            max: Pos::new(origin.x + width.max(1) - 1, origin.y + height.max(1) - 1),
        }
    }

    pub fn width(&self) -> i64 {
        if self.max.x == UNBOUNDED {
            UNBOUNDED
        } else {
            self.max.x - self.min.x + 1
        }
    }

    pub fn height(&self) -> i64 {
        if self.max.y == UNBOUNDED {
            UNBOUNDED
        } else {
            self.max.y - self.min.y + 1
        }
    }

    pub fn is_finite(&self) -> bool {
        self.max.x != UNBOUNDED && self.max.y != UNBOUNDED
    }

    pub fn is_single_cell(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// True if `other` lies entirely within `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect {
            min: Pos::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Pos::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        })
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Pos::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Pos::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn translate(&self, dx: i64, dy: i64) -> Rect {
        let shift = |v: i64, d: i64| if v == UNBOUNDED { v } else { v + d };
        Rect {
            min: Pos::new(self.min.x + dx, self.min.y + dy),
            max: Pos::new(shift(self.max.x, dx), shift(self.max.y, dy)),
        }
    }

    /// Span of this rectangle along `axis` as `(min, max)`
    pub fn span(&self, axis: Axis) -> (i64, i64) {
        (axis.of(self.min), axis.of(self.max))
    }

    /// Removes `exclude` from this rectangle.
    ///
    /// The remainder is returned as up to four rectangles, computed in the order
    /// top, bottom, left, right. Top and bottom span the full width; left and
    /// right are clipped to the rows between them.
    pub fn subtract(&self, exclude: &Rect) -> Vec<Rect> {
        let Some(cut) = self.intersection(exclude) else {
            return vec![*self];
        };

        let mut pieces = Vec::with_capacity(4);
        if self.min.y < cut.min.y {
            pieces.push(Rect {
                min: self.min,
                max: Pos::new(self.max.x, cut.min.y - 1),
            });
        }
        if self.max.y > cut.max.y {
            pieces.push(Rect {
                min: Pos::new(self.min.x, cut.max.y + 1),
                max: self.max,
            });
        }
        if self.min.x < cut.min.x {
            pieces.push(Rect {
                min: Pos::new(self.min.x, cut.min.y),
                max: Pos::new(cut.min.x - 1, cut.max.y),
            });
        }
        if self.max.x > cut.max.x {
            pieces.push(Rect {
                min: Pos::new(cut.max.x + 1, cut.min.y),
                max: Pos::new(self.max.x, cut.max.y),
            });
        }
        pieces
    }
}

/// A point in pixel space (world or screen, depending on context)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Grow (or shrink, for negative values) by `amount` on every side
    pub fn inflate(&self, amount: f64) -> PixelRect {
        PixelRect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &PixelRect) -> PixelRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        PixelRect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}
