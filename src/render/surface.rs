//! Drawing surface abstraction
//!
//! Layers record [`DrawOp`]s in screen pixels; a [`DrawSurface`] replays them
//! when the frame is presented. Colors are ARGB (0xAARRGGBB).

use crate::geometry::{PixelRect, Point};

/// A single drawing primitive in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Opaque fill
    FillRect { rect: PixelRect, color: u32 },
    /// Alpha-blended fill; alpha is taken from the color
    BlendRect { rect: PixelRect, color: u32 },
    /// Rectangle outline drawn inside `rect`
    StrokeRect { rect: PixelRect, color: u32, width: f64 },
    Line { from: Point, to: Point, color: u32, width: f64 },
    Text { at: Point, text: String, color: u32 },
}

impl DrawOp {
    /// Screen bounds touched by the op (text has no measured extent)
    pub fn bounds(&self) -> Option<PixelRect> {
        match self {
            DrawOp::FillRect { rect, .. }
            | DrawOp::BlendRect { rect, .. }
            | DrawOp::StrokeRect { rect, .. } => Some(*rect),
            DrawOp::Line { from, to, width, .. } => Some(PixelRect::new(
                from.x.min(to.x) - width / 2.0,
                from.y.min(to.y) - width / 2.0,
                (to.x - from.x).abs() + width,
                (to.y - from.y).abs() + width,
            )),
            DrawOp::Text { .. } => None,
        }
    }
}

/// Target the scheduler presents frames to
pub trait DrawSurface {
    /// Start a new frame filled with `background`
    fn clear(&mut self, background: u32);

    fn draw(&mut self, op: &DrawOp);

    /// Finish the frame
    fn present(&mut self);
}

/// Headless surface that keeps the ops of the last presented frame
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pending: Vec<DrawOp>,
    background: u32,
    presented: Vec<DrawOp>,
    present_count: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ops of the last presented frame, in paint order
    pub fn last_frame(&self) -> &[DrawOp] {
        &self.presented
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn present_count(&self) -> usize {
        self.present_count
    }

    /// Ops in the last frame drawn with `color`
    pub fn ops_with_color(&self, color: u32) -> Vec<&DrawOp> {
        self.presented
            .iter()
            .filter(|op| match op {
                DrawOp::FillRect { color: c, .. }
                | DrawOp::BlendRect { color: c, .. }
                | DrawOp::StrokeRect { color: c, .. }
                | DrawOp::Line { color: c, .. }
                | DrawOp::Text { color: c, .. } => *c == color,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, background: u32) {
        self.background = background;
        self.pending.clear();
    }

    fn draw(&mut self, op: &DrawOp) {
        self.pending.push(op.clone());
    }

    fn present(&mut self) {
        self.presented = std::mem::take(&mut self.pending);
        self.present_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_keeps_last_frame() {
        let mut surface = RecordingSurface::new();
        let op = DrawOp::FillRect {
            rect: PixelRect::new(0.0, 0.0, 10.0, 10.0),
            color: 0xFF00_0000,
        };
        surface.clear(0xFFFF_FFFF);
        surface.draw(&op);
        surface.present();
        surface.clear(0xFFFF_FFFF);
        assert_eq!(surface.last_frame(), &[op]);
        assert_eq!(surface.present_count(), 1);
        assert_eq!(surface.ops_with_color(0xFF00_0000).len(), 1);
    }

    #[test]
    fn test_line_bounds_include_width() {
        let op = DrawOp::Line {
            from: Point::new(10.0, 5.0),
            to: Point::new(10.0, 25.0),
            color: 0,
            width: 2.0,
        };
        assert_eq!(op.bounds(), Some(PixelRect::new(9.0, 4.0, 2.0, 22.0)));
    }
}
