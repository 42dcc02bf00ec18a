//! Resizing images and HTML outputs by their right/bottom edges

use crate::commands::Cmd;
use crate::engine::EngineRequest;
use crate::events::GestureKind;
use crate::geometry::{PixelRect, Point, Pos};
use crate::model::{AppModel, EmbeddedKind, EmbeddedPreview};
use crate::pointer::{gesture_ended, gesture_started, Button, Claim, PointerEvent, PointerHandler};
use crate::render::dirty::Layer;

/// Smallest size an embedded object can be dragged to, in world px
pub const MIN_EMBEDDED_SIZE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Right,
    Bottom,
    Corner,
}

impl Edge {
    fn resizes_width(self) -> bool {
        matches!(self, Edge::Right | Edge::Corner)
    }

    fn resizes_height(self) -> bool {
        matches!(self, Edge::Bottom | Edge::Corner)
    }
}

/// Which resize edge of `rect` the point is on, within `tolerance`
pub fn edge_at(rect: &PixelRect, world: Point, tolerance: f64) -> Option<Edge> {
    if !rect.inflate(tolerance).contains(world) {
        return None;
    }
    let right = (world.x - rect.right()).abs() <= tolerance;
    let bottom = (world.y - rect.bottom()).abs() <= tolerance;
    match (right, bottom) {
        (true, true) => Some(Edge::Corner),
        (true, false) => Some(Edge::Right),
        (false, true) => Some(Edge::Bottom),
        (false, false) => None,
    }
}

#[derive(Debug, Clone)]
struct Drag {
    index: usize,
    anchor: Pos,
    edge: Edge,
    start: Point,
    original: (f64, f64),
    size: (f64, f64),
}

#[derive(Debug)]
pub struct EmbeddedResizeHandler {
    kind: EmbeddedKind,
    drag: Option<Drag>,
}

impl EmbeddedResizeHandler {
    pub fn new(kind: EmbeddedKind) -> Self {
        Self { kind, drag: None }
    }
}

impl PointerHandler for EmbeddedResizeHandler {
    fn name(&self) -> &'static str {
        match self.kind {
            EmbeddedKind::Image => "embedded_image",
            EmbeddedKind::Html => "embedded_html",
        }
    }

    fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        if event.button != Button::Left || model.is_restricted() || !event.in_cells(model) {
            return Claim::Pass;
        }
        let Some(entry) = model.current() else {
            return Claim::Pass;
        };
        let tolerance = model.config.embedded_edge_tolerance / model.viewport.scale();
        // Topmost (last drawn) object wins
        let hit = entry
            .sheet
            .embedded
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, o)| o.kind == self.kind)
            .find_map(|(index, o)| {
                edge_at(&o.world_rect(&entry.sheet.offsets), event.world, tolerance).map(|edge| (index, o, edge))
            });
        let Some((index, object, edge)) = hit else {
            return Claim::Pass;
        };

        let size = (object.width, object.height);
        self.drag = Some(Drag {
            index,
            anchor: object.anchor,
            edge,
            start: event.world,
            original: size,
            size,
        });
        model.set_embedded_preview(Some(EmbeddedPreview {
            index,
            width: size.0,
            height: size.1,
        }));
        gesture_started(model, GestureKind::EmbeddedResize);
        Claim::claimed()
    }

    fn pointer_move(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        let Some(drag) = self.drag.as_mut() else {
            return Claim::Pass;
        };
        let mut size = drag.original;
        if drag.edge.resizes_width() {
            size.0 = (drag.original.0 + event.world.x - drag.start.x).max(MIN_EMBEDDED_SIZE);
        }
        if drag.edge.resizes_height() {
            size.1 = (drag.original.1 + event.world.y - drag.start.y).max(MIN_EMBEDDED_SIZE);
        }
        drag.size = size;
        model.set_embedded_preview(Some(EmbeddedPreview {
            index: drag.index,
            width: size.0,
            height: size.1,
        }));
        Claim::claimed()
    }

    fn pointer_up(&mut self, model: &mut AppModel, _event: &PointerEvent) -> Claim {
        let Some(drag) = self.drag.take() else {
            return Claim::Pass;
        };
        model.set_embedded_preview(None);
        let committed = drag.size != drag.original;
        let mut cmd = None;
        if committed {
            if let Some(entry) = model.current_mut() {
                if let Some(object) = entry.sheet.embedded.get_mut(drag.index) {
                    object.width = drag.size.0;
                    object.height = drag.size.1;
                }
                cmd = Some(Cmd::engine(
                    entry.cursor.selection(),
                    EngineRequest::ResizeEmbedded {
                        anchor: drag.anchor,
                        width: drag.size.0,
                        height: drag.size.1,
                    },
                ));
            }
            model.dirty.mark(Layer::Cursor);
        }
        gesture_ended(model, GestureKind::EmbeddedResize, committed);
        Claim::with(cmd)
    }

    fn cancel(&mut self, model: &mut AppModel) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        model.set_embedded_preview(None);
        gesture_ended(model, GestureKind::EmbeddedResize, false);
        true
    }

    fn is_active(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::config::GridConfig;
    use crate::model::{EmbeddedObject, SheetInfo};
    use crate::pointer::Modifiers;
    use crate::theme::Theme;

    fn model() -> AppModel {
        let mut model = AppModel::new(800.0, 600.0, GridConfig::default(), Theme::default());
        let mut info = SheetInfo::new("s1", "Sheet 1");
        info.embedded.push(EmbeddedObject {
            kind: EmbeddedKind::Image,
            anchor: Pos::new(2, 2),
            width: 200.0,
            height: 100.0,
        });
        model.sheets.upsert(info);
        model.ready = true;
        model
    }

    fn event(model: &AppModel, world: Point) -> PointerEvent {
        let screen = model.viewport.world_to_screen(world);
        PointerEvent::new(model, screen, Button::Left, Modifiers::none(), Instant::now())
    }

    fn image_rect(model: &AppModel) -> PixelRect {
        let entry = model.current().expect("sheet");
        entry.sheet.embedded[0].world_rect(&entry.sheet.offsets)
    }

    #[test]
    fn test_edge_at() {
        let rect = PixelRect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(edge_at(&rect, Point::new(100.0, 25.0), 4.0), Some(Edge::Right));
        assert_eq!(edge_at(&rect, Point::new(50.0, 52.0), 4.0), Some(Edge::Bottom));
        assert_eq!(edge_at(&rect, Point::new(98.0, 49.0), 4.0), Some(Edge::Corner));
        assert_eq!(edge_at(&rect, Point::new(50.0, 25.0), 4.0), None);
        assert_eq!(edge_at(&rect, Point::new(150.0, 25.0), 4.0), None);
    }

    #[test]
    fn test_corner_drag_resizes_and_commits() {
        let mut model = model();
        let mut handler = EmbeddedResizeHandler::new(EmbeddedKind::Image);
        let rect = image_rect(&model);
        let down = event(&model, Point::new(rect.right(), rect.bottom()));
        assert!(handler.pointer_down(&mut model, &down).is_claimed());

        let over = event(&model, Point::new(rect.right() + 40.0, rect.bottom() + 10.0));
        handler.pointer_move(&mut model, &over);
        let preview = *model.previews().embedded().expect("preview");
        assert!((preview.width - 240.0).abs() < 1e-6);
        assert!((preview.height - 110.0).abs() < 1e-6);

        let cmd = handler.pointer_up(&mut model, &over).into_cmd().expect("cmd");
        assert!(matches!(
            &cmd.engine_calls()[0].request,
            EngineRequest::ResizeEmbedded { anchor, .. } if *anchor == Pos::new(2, 2)
        ));
        assert!(model.previews().embedded().is_none());
        let object = &model.current().expect("sheet").sheet.embedded[0];
        assert!((object.width - 240.0).abs() < 1e-6);
    }

    #[test]
    fn test_size_is_clamped_and_cancel_sends_nothing() {
        let mut model = model();
        let mut handler = EmbeddedResizeHandler::new(EmbeddedKind::Image);
        let rect = image_rect(&model);
        let down = event(&model, Point::new(rect.right(), rect.center().y));
        handler.pointer_down(&mut model, &down);
        let over = event(&model, Point::new(rect.x - 500.0, rect.center().y));
        handler.pointer_move(&mut model, &over);
        let preview = *model.previews().embedded().expect("preview");
        assert_eq!(preview.width, MIN_EMBEDDED_SIZE);
        assert_eq!(preview.height, 100.0);

        assert!(handler.cancel(&mut model));
        assert!(model.previews().embedded().is_none());
        assert_eq!(model.current().expect("sheet").sheet.embedded[0].width, 200.0);
    }

    #[test]
    fn test_other_kind_passes() {
        let mut model = model();
        let mut handler = EmbeddedResizeHandler::new(EmbeddedKind::Html);
        let rect = image_rect(&model);
        let down = event(&model, Point::new(rect.right(), rect.bottom()));
        assert_eq!(handler.pointer_down(&mut model, &down), Claim::Pass);
    }
}
