//! Autofill (drag-extend) from the handle at the selection's bottom-right
//!
//! Each axis of the drag target is classified on its own: inside the source
//! rectangle short of its last line shrinks, outside expands, anything else
//! leaves that axis alone. Shrinking clears the cells given up.

use crate::commands::Cmd;
use crate::engine::EngineRequest;
use crate::events::GestureKind;
use crate::geometry::{Axis, PixelRect, Pos, Rect};
use crate::model::{AppModel, AutofillPreview, Sheet};
use crate::pointer::{gesture_ended, gesture_started, Button, Claim, PointerEvent, PointerHandler};
use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stretch {
    None,
    Shrink,
    Expand,
}

/// Classifies `cell` against the source span `lo..=hi` on one axis
pub fn classify(lo: i64, hi: i64, cell: i64) -> Stretch {
    if cell < lo || cell > hi {
        Stretch::Expand
    } else if cell < hi {
        Stretch::Shrink
    } else {
        Stretch::None
    }
}

/// Rectangle the source becomes when the drag ends over `cell`
pub fn target_rect(source: Rect, cell: Pos) -> Rect {
    let span = |axis: Axis| {
        let (lo, hi) = source.span(axis);
        let c = axis.of(cell);
        match classify(lo, hi, c) {
            Stretch::None => (lo, hi),
            Stretch::Shrink => (lo, c),
            Stretch::Expand => (lo.min(c), hi.max(c)),
        }
    };
    let (x0, x1) = span(Axis::Column);
    let (y0, y1) = span(Axis::Row);
    Rect::new(x0, y0, x1, y1)
}

/// Parts of `source` outside `target`; these are cleared on commit
pub fn cleared_rects(source: &Rect, target: &Rect) -> Vec<Rect> {
    match source.intersection(target) {
        Some(kept) if kept == *source => Vec::new(),
        Some(kept) => source.subtract(&kept),
        None => vec![*source],
    }
}

/// World rect of the handle square, if the selection can be autofilled
pub fn handle_world_rect(sheet: &Sheet, selection: &Selection, scale: f64, size: f64) -> Option<PixelRect> {
    let rect = selection.single_rect()?;
    let bounds = sheet.offsets.rect_pixels(&rect);
    let side = size / scale;
    Some(PixelRect::new(
        bounds.right() - side / 2.0,
        bounds.bottom() - side / 2.0,
        side,
        side,
    ))
}

#[derive(Debug, Clone)]
struct Drag {
    source: Rect,
    target: Rect,
}

#[derive(Debug, Default)]
pub struct AutofillHandler {
    drag: Option<Drag>,
}

impl AutofillHandler {
    fn finish(&mut self, model: &mut AppModel) -> Option<Drag> {
        let drag = self.drag.take()?;
        model.set_autofill_preview(None);
        if let Some(entry) = model.current_mut() {
            entry.cursor.set_autofill_active(false);
        }
        Some(drag)
    }
}

impl PointerHandler for AutofillHandler {
    fn name(&self) -> &'static str {
        "autofill"
    }

    fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        if event.button != Button::Left || model.is_restricted() || !event.in_cells(model) {
            return Claim::Pass;
        }
        let Some(entry) = model.current() else {
            return Claim::Pass;
        };
        let selection = entry.cursor.selection();
        let hit = handle_world_rect(
            &entry.sheet,
            selection,
            model.viewport.scale(),
            model.config.autofill_handle_size,
        )
        .is_some_and(|handle| handle.contains(event.world));
        if !hit {
            return Claim::Pass;
        }
        let Some(source) = selection.single_rect() else {
            return Claim::Pass;
        };

        self.drag = Some(Drag {
            source,
            target: source,
        });
        if let Some(entry) = model.current_mut() {
            entry.cursor.set_autofill_active(true);
        }
        model.set_autofill_preview(Some(AutofillPreview {
            source,
            target: source,
            cleared: Vec::new(),
        }));
        gesture_started(model, GestureKind::Autofill);
        Claim::claimed()
    }

    fn pointer_move(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        let Some(drag) = self.drag.as_mut() else {
            return Claim::Pass;
        };
        let Some(cell) = event.cell(model) else {
            return Claim::claimed();
        };
        let target = target_rect(drag.source, cell);
        if target != drag.target {
            drag.target = target;
            let preview = AutofillPreview {
                source: drag.source,
                target,
                cleared: cleared_rects(&drag.source, &target),
            };
            model.set_autofill_preview(Some(preview));
            if let Some(rect) = model.current().map(|e| e.sheet.cell_bounds(cell)) {
                model.viewport.ensure_visible(&rect, model.now);
            }
        }
        Claim::claimed()
    }

    fn pointer_up(&mut self, model: &mut AppModel, _event: &PointerEvent) -> Claim {
        let Some(drag) = self.finish(model) else {
            return Claim::Pass;
        };
        let committed = drag.target != drag.source;
        let mut cmd = None;
        if committed {
            if let Some(entry) = model.current_mut() {
                cmd = Some(Cmd::engine(
                    entry.cursor.selection(),
                    EngineRequest::Autofill {
                        source: drag.source,
                        target: drag.target,
                    },
                ));
                entry.cursor.select_rect(drag.target, false);
            }
        }
        gesture_ended(model, GestureKind::Autofill, committed);
        Claim::with(cmd)
    }

    fn cancel(&mut self, model: &mut AppModel) -> bool {
        let cancelled = self.finish(model).is_some();
        if cancelled {
            gesture_ended(model, GestureKind::Autofill, false);
        }
        cancelled
    }

    fn is_active(&self) -> bool {
        self.drag.is_some()
    }
}
