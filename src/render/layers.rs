//! Retained draw layers
//!
//! Each [`Layer`] keeps the ops it produced on its last update. Viewport-relative
//! layers record in screen pixels; the rest record in world pixels and are
//! mapped through the camera when replayed, so a pan alone does not rebuild
//! them. Grid lines are built with overscan and refreshed once the visible
//! area leaves the covered region.

use crate::geometry::{Axis, PixelRect, Point, Rect, UNBOUNDED};
use crate::model::{AppModel, SheetOffsets};
use crate::pointer::autofill;
use crate::render::dirty::Layer;
use crate::render::surface::{DrawOp, DrawSurface};
use crate::selection::a1::column_name;
use crate::selection::CellRange;
use crate::viewport::Viewport;

/// Upper bound on grid lines per axis (very low zoom levels)
const MAX_GRID_LINES: usize = 2000;

const CURSOR_WIDTH: f64 = 2.0;
const LABEL_PADDING: f64 = 4.0;

/// Whether `layer` records in screen space
pub fn is_screen_space(layer: Layer) -> bool {
    Layer::VIEWPORT_RELATIVE.contains(&layer)
}

/// World rect of `rect`, clipped to `clip`; unbounded edges stop at the clip
pub fn clipped_world_rect(offsets: &SheetOffsets, rect: &Rect, clip: &PixelRect) -> Option<PixelRect> {
    let span = |axis: Axis, clip_lo: f64, clip_hi: f64| {
        let o = offsets.axis(axis);
        let (lo, hi) = rect.span(axis);
        let start = o.position(lo);
        let end = if hi == UNBOUNDED { clip_hi } else { o.position(hi + 1) };
        (start.max(clip_lo), end.min(clip_hi))
    };
    let (x0, x1) = span(Axis::Column, clip.x, clip.right());
    let (y0, y1) = span(Axis::Row, clip.y, clip.bottom());
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
}

/// Visible line indices along `axis` within world `start..end`
fn visible_lines(offsets: &SheetOffsets, axis: Axis, start: f64, end: f64) -> impl Iterator<Item = i64> + '_ {
    let o = offsets.axis(axis);
    let first = o.find_index(start).max(1);
    (first..)
        .take(MAX_GRID_LINES)
        .take_while(move |i| o.position(*i) < end)
}

#[derive(Debug, Default)]
struct LayerState {
    ops: Vec<DrawOp>,
    updates: u64,
}

#[derive(Debug, Default)]
pub struct LayerStack {
    layers: [LayerState; Layer::COUNT],
    grid_coverage: Option<PixelRect>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds `layer` if it is dirty (or `force` is set), clearing its flag.
    /// Returns true if the layer was rebuilt.
    pub fn update(&mut self, layer: Layer, model: &AppModel, force: bool) -> bool {
        let dirty = model.dirty.take(layer);
        if !dirty && !force {
            return false;
        }
        let ops = match layer {
            Layer::GridLines => {
                let (ops, coverage) = grid_lines(model);
                self.grid_coverage = coverage;
                ops
            }
            Layer::Headings => headings(model),
            Layer::SelectionFill => selection_fill(model),
            Layer::Cursor => cursor(model),
            Layer::RemoteCursors => remote_cursors(model),
            Layer::MovingCells => moving_cells(model),
            Layer::ColumnRowOverlay => column_row_overlay(model),
        };
        let state = &mut self.layers[layer.index()];
        state.ops = ops;
        state.updates += 1;
        true
    }

    /// True when the visible area is no longer inside the overscanned grid
    pub fn grid_needs_refresh(&self, viewport: &Viewport) -> bool {
        match self.grid_coverage {
            Some(coverage) => !coverage.contains_rect(&viewport.visible_world()),
            None => false,
        }
    }

    pub fn ops(&self, layer: Layer) -> &[DrawOp] {
        &self.layers[layer.index()].ops
    }

    pub fn update_count(&self, layer: Layer) -> u64 {
        self.layers[layer.index()].updates
    }

    /// Replays every layer in paint order, mapping world-space ops to the screen
    pub fn replay(&self, surface: &mut dyn DrawSurface, viewport: &Viewport) {
        for layer in Layer::ALL {
            let screen = is_screen_space(layer);
            for op in self.ops(layer) {
                if screen {
                    surface.draw(op);
                } else {
                    surface.draw(&to_screen(op, viewport));
                }
            }
        }
    }
}

/// Maps a world-space op to screen space; stroke widths stay in screen pixels
fn to_screen(op: &DrawOp, viewport: &Viewport) -> DrawOp {
    match op {
        DrawOp::FillRect { rect, color } => DrawOp::FillRect {
            rect: viewport.world_rect_to_screen(rect),
            color: *color,
        },
        DrawOp::BlendRect { rect, color } => DrawOp::BlendRect {
            rect: viewport.world_rect_to_screen(rect),
            color: *color,
        },
        DrawOp::StrokeRect { rect, color, width } => DrawOp::StrokeRect {
            rect: viewport.world_rect_to_screen(rect),
            color: *color,
            width: *width,
        },
        DrawOp::Line {
            from,
            to,
            color,
            width,
        } => DrawOp::Line {
            from: viewport.world_to_screen(*from),
            to: viewport.world_to_screen(*to),
            color: *color,
            width: *width,
        },
        DrawOp::Text { at, text, color } => DrawOp::Text {
            at: viewport.world_to_screen(*at),
            text: text.clone(),
            color: *color,
        },
    }
}

fn grid_lines(model: &AppModel) -> (Vec<DrawOp>, Option<PixelRect>) {
    let Some(entry) = model.current() else {
        return (Vec::new(), None);
    };
    let window = model.viewport.visible_world();
    let cover = window.inflate(window.width.max(window.height) / 2.0);
    let offsets = &entry.sheet.offsets;
    let color = model.theme.grid_line.to_argb_u32();
    let top = cover.y.max(0.0);
    let left = cover.x.max(0.0);

    let mut ops = Vec::new();
    for column in visible_lines(offsets, Axis::Column, left, cover.right()) {
        let x = offsets.columns.position(column);
        ops.push(DrawOp::Line {
            from: Point::new(x, top),
            to: Point::new(x, cover.bottom()),
            color,
            width: 1.0,
        });
    }
    for row in visible_lines(offsets, Axis::Row, top, cover.bottom()) {
        let y = offsets.rows.position(row);
        ops.push(DrawOp::Line {
            from: Point::new(left, y),
            to: Point::new(cover.right(), y),
            color,
            width: 1.0,
        });
    }
    (ops, Some(cover))
}

fn headings(model: &AppModel) -> Vec<DrawOp> {
    let Some(entry) = model.current() else {
        return Vec::new();
    };
    let viewport = &model.viewport;
    let theme = &model.theme;
    let (width, height) = viewport.size();
    let (inset_x, inset_y) = viewport.heading_inset();
    let scale = viewport.scale();
    let window = viewport.cell_window();
    let offsets = &entry.sheet.offsets;
    let selection = entry.cursor.selection();
    let background = theme.heading_background.to_argb_u32();
    let foreground = theme.heading_foreground.to_argb_u32();
    let highlight = theme.heading_selected.to_argb_u32();
    let separator = theme.grid_line.to_argb_u32();

    let touches = |axis: Axis, index: i64| {
        selection
            .ranges()
            .iter()
            .any(|r| {
                let (lo, hi) = r.to_rect().span(axis);
                index >= lo && index <= hi
            })
    };

    let mut ops = vec![
        DrawOp::FillRect {
            rect: PixelRect::new(0.0, 0.0, width, inset_y),
            color: background,
        },
        DrawOp::FillRect {
            rect: PixelRect::new(0.0, 0.0, inset_x, height),
            color: background,
        },
    ];

    for column in visible_lines(offsets, Axis::Column, window.x, window.right()) {
        let x = viewport
            .world_to_screen(Point::new(offsets.columns.position(column), 0.0))
            .x;
        let w = offsets.columns.size(column) * scale;
        if touches(Axis::Column, column) {
            ops.push(DrawOp::BlendRect {
                rect: PixelRect::new(x, 0.0, w, inset_y),
                color: highlight,
            });
        }
        ops.push(DrawOp::Line {
            from: Point::new(x, 0.0),
            to: Point::new(x, inset_y),
            color: separator,
            width: 1.0,
        });
        ops.push(DrawOp::Text {
            at: Point::new(x + LABEL_PADDING, inset_y - LABEL_PADDING),
            text: column_name(column),
            color: foreground,
        });
    }

    for row in visible_lines(offsets, Axis::Row, window.y, window.bottom()) {
        let y = viewport
            .world_to_screen(Point::new(0.0, offsets.rows.position(row)))
            .y;
        let h = offsets.rows.size(row) * scale;
        if touches(Axis::Row, row) {
            ops.push(DrawOp::BlendRect {
                rect: PixelRect::new(0.0, y, inset_x, h),
                color: highlight,
            });
        }
        ops.push(DrawOp::Line {
            from: Point::new(0.0, y),
            to: Point::new(inset_x, y),
            color: separator,
            width: 1.0,
        });
        ops.push(DrawOp::Text {
            at: Point::new(LABEL_PADDING, y + h - LABEL_PADDING),
            text: row.to_string(),
            color: foreground,
        });
    }

    // Insertion marker for a column/row drag-move
    if let Some(preview) = model.previews().line_move() {
        let color = if preview.valid {
            theme.move_valid.to_argb_u32()
        } else {
            theme.move_invalid.to_argb_u32()
        };
        let offsets = offsets.axis(preview.axis);
        let world = offsets.position(preview.to);
        let marker = match preview.axis {
            Axis::Column => {
                let x = viewport.world_to_screen(Point::new(world, 0.0)).x;
                DrawOp::Line {
                    from: Point::new(x, 0.0),
                    to: Point::new(x, inset_y),
                    color,
                    width: CURSOR_WIDTH,
                }
            }
            Axis::Row => {
                let y = viewport.world_to_screen(Point::new(0.0, world)).y;
                DrawOp::Line {
                    from: Point::new(0.0, y),
                    to: Point::new(inset_x, y),
                    color,
                    width: CURSOR_WIDTH,
                }
            }
        };
        ops.push(marker);
    }

    // Corner box covers labels scrolled under it
    ops.push(DrawOp::FillRect {
        rect: PixelRect::new(0.0, 0.0, inset_x, inset_y),
        color: background,
    });
    ops
}

fn selection_fill(model: &AppModel) -> Vec<DrawOp> {
    let Some(entry) = model.current() else {
        return Vec::new();
    };
    let selection = entry.cursor.selection();
    // A lone cursor cell has no fill
    if selection.is_single_selection() && selection.active_range().is_single_cell() {
        return Vec::new();
    }
    let viewport = &model.viewport;
    let window = viewport.cell_window();
    let color = model.theme.selection_fill.to_argb_u32();
    selection
        .ranges()
        .iter()
        .filter_map(|range| clipped_world_rect(&entry.sheet.offsets, &range.to_rect(), &window))
        .map(|rect| DrawOp::BlendRect {
            rect: viewport.world_rect_to_screen(&rect),
            color,
        })
        .collect()
}

fn cursor(model: &AppModel) -> Vec<DrawOp> {
    let Some(entry) = model.current() else {
        return Vec::new();
    };
    let theme = &model.theme;
    let sheet = &entry.sheet;
    let selection = entry.cursor.selection();
    let color = theme.cursor.to_argb_u32();
    let mut ops = vec![DrawOp::StrokeRect {
        rect: sheet.cell_bounds(selection.cursor()),
        color,
        width: CURSOR_WIDTH,
    }];

    if let Some(handle) = autofill::handle_world_rect(
        sheet,
        selection,
        model.viewport.scale(),
        model.config.autofill_handle_size,
    ) {
        ops.push(DrawOp::FillRect { rect: handle, color });
    }

    if let Some(preview) = model.previews().autofill() {
        let fill = theme.autofill_preview.to_argb_u32();
        for cleared in &preview.cleared {
            ops.push(DrawOp::BlendRect {
                rect: sheet.offsets.rect_pixels(cleared),
                color: fill,
            });
        }
        ops.push(DrawOp::StrokeRect {
            rect: sheet.offsets.rect_pixels(&preview.target),
            color: fill,
            width: 1.0,
        });
    }

    if let Some(preview) = model.previews().embedded() {
        if let Some(object) = sheet.embedded.get(preview.index) {
            let origin = sheet.offsets.cell_rect(object.anchor);
            ops.push(DrawOp::StrokeRect {
                rect: PixelRect::new(origin.x, origin.y, preview.width, preview.height),
                color: theme.resize_line.to_argb_u32(),
                width: 1.0,
            });
        }
    }
    ops
}

fn remote_cursors(model: &AppModel) -> Vec<DrawOp> {
    let Some(entry) = model.current() else {
        return Vec::new();
    };
    let sheet = &entry.sheet;
    let mut ops: Vec<DrawOp> = model
        .presence
        .on_sheet(&sheet.id)
        .map(|remote| DrawOp::StrokeRect {
            rect: sheet.cell_bounds(remote.selection.cursor()),
            color: model.theme.remote_cursor(remote.color).to_argb_u32(),
            width: CURSOR_WIDTH,
        })
        .collect();

    // Edge markers are computed in screen space; convert back so the layer stays world-space
    let viewport = &model.viewport;
    let size = 6.0 / viewport.scale();
    for indicator in model.presence.offscreen_indicators(sheet, viewport) {
        let at = viewport.screen_to_world(indicator.screen);
        ops.push(DrawOp::FillRect {
            rect: PixelRect::new(at.x - size / 2.0, at.y - size / 2.0, size, size),
            color: model.theme.remote_cursor(indicator.color).to_argb_u32(),
        });
    }
    ops
}

fn moving_cells(model: &AppModel) -> Vec<DrawOp> {
    let Some(entry) = model.current() else {
        return Vec::new();
    };
    let theme = &model.theme;
    let offsets = &entry.sheet.offsets;
    let color_for = |valid: bool| {
        if valid {
            theme.move_valid.to_argb_u32()
        } else {
            theme.move_invalid.to_argb_u32()
        }
    };
    let mut ops = Vec::new();

    if let Some(preview) = model.previews().moving() {
        ops.push(DrawOp::StrokeRect {
            rect: offsets.rect_pixels(&preview.destination),
            color: color_for(preview.valid),
            width: CURSOR_WIDTH,
        });
    }

    if let Some(preview) = model.previews().line_move() {
        let window = model.viewport.visible_world();
        let (lo, hi) = preview.span;
        let moved = CellRange::lines(preview.axis, lo, hi).to_rect();
        if let Some(rect) = clipped_world_rect(offsets, &moved, &window) {
            ops.push(DrawOp::BlendRect {
                rect,
                color: theme.selection_fill.to_argb_u32(),
            });
        }
        let at = offsets.axis(preview.axis).position(preview.to);
        let (from, to) = match preview.axis {
            Axis::Column => (Point::new(at, window.y), Point::new(at, window.bottom())),
            Axis::Row => (Point::new(window.x, at), Point::new(window.right(), at)),
        };
        ops.push(DrawOp::Line {
            from,
            to,
            color: color_for(preview.valid),
            width: CURSOR_WIDTH,
        });
    }
    ops
}

fn column_row_overlay(model: &AppModel) -> Vec<DrawOp> {
    let Some(entry) = model.current() else {
        return Vec::new();
    };
    let selection = entry.cursor.selection();
    let viewport = &model.viewport;
    let window = viewport.cell_window();
    let color = model.theme.column_row_overlay.to_argb_u32();
    let bulk = entry.cursor.bulk_select();

    selection
        .ranges()
        .iter()
        .filter(|range| match bulk {
            Some(axis) => range.line_span(axis).is_some(),
            None => range.is_line_range(),
        })
        .filter_map(|range| clipped_world_rect(&entry.sheet.offsets, &range.to_rect(), &window))
        .map(|rect| DrawOp::BlendRect {
            rect: viewport.world_rect_to_screen(&rect),
            color,
        })
        .collect()
}
