//! Camera messages

use crate::commands::Cmd;
use crate::geometry::Point;
use crate::messages::ViewportMsg;
use crate::model::AppModel;

pub fn update_viewport(model: &mut AppModel, msg: ViewportMsg) -> Option<Cmd> {
    let now = model.now;
    match msg {
        ViewportMsg::ZoomIn => {
            let cell = model.cursor_world_rect();
            model.viewport.zoom_in(cell, now);
        }
        ViewportMsg::ZoomOut => {
            let cell = model.cursor_world_rect();
            model.viewport.zoom_out(cell, now);
        }
        ViewportMsg::ZoomToFit => {
            let content = model.content_world_rect();
            model.viewport.zoom_to_fit(content, now);
        }
        ViewportMsg::ZoomToSelection => {
            let Some(rect) = model.selection_world_rect() else {
                tracing::debug!("selection is unbounded, nothing to zoom to");
                return None;
            };
            model.viewport.zoom_to_selection(&rect, now);
        }
        ViewportMsg::PanStart => model.viewport.begin_pan(now),
        ViewportMsg::Pan { dx, dy } => model.viewport.pan_drag(dx, dy, now),
        ViewportMsg::PanEnd => model.viewport.end_pan(now),
        ViewportMsg::ZoomAt { x, y, scale } => model.viewport.wheel_zoom(Point::new(x, y), scale, now),
        ViewportMsg::Reset => model.viewport.reset(),
    }

    if model.viewport.has_changed() || model.viewport.is_animating() {
        Some(Cmd::Redraw)
    } else {
        None
    }
}
