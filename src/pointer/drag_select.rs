//! Plain cell selection: click, shift-click, ctrl-click and drag
//!
//! Last in the chain, so it sees every press in the cell area that no other
//! handler wanted.

use crate::events::GestureKind;
use crate::geometry::{Point, Pos, Rect};
use crate::model::AppModel;
use crate::pointer::{gesture_ended, gesture_started, past_threshold, Button, Claim, PointerEvent, PointerHandler};
use crate::selection::Selection;

#[derive(Debug, Clone)]
struct Drag {
    /// Selection before the press
    before: Selection,
    start: Point,
    last: Pos,
    dragging: bool,
}

#[derive(Debug, Default)]
pub struct DragSelectHandler {
    drag: Option<Drag>,
}

impl PointerHandler for DragSelectHandler {
    fn name(&self) -> &'static str {
        "drag_select"
    }

    fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        if !event.in_cells(model) {
            return Claim::Pass;
        }
        let Some(cell) = event.cell(model) else {
            return Claim::Pass;
        };
        let Some(entry) = model.current_mut() else {
            return Claim::Pass;
        };
        let cursor = &mut entry.cursor;

        match event.button {
            Button::Left => {}
            Button::Right => {
                // Context menu acts on the selection; only move when outside it
                if !cursor.selection().contains(cell) {
                    cursor.move_to(cell.x, cell.y, false);
                }
                return Claim::claimed();
            }
            Button::Middle => return Claim::Pass,
        }

        let before = cursor.selection().clone();
        if event.modifiers.shift {
            cursor.select_to(cell.x, cell.y, event.modifiers.ctrl, true);
        } else if event.modifiers.ctrl {
            if cursor.selection().contains(cell) {
                cursor.exclude_cells(Rect::single(cell));
                return Claim::claimed();
            }
            cursor.move_to(cell.x, cell.y, true);
        } else {
            cursor.move_to(cell.x, cell.y, false);
        }

        self.drag = Some(Drag {
            before,
            start: event.screen,
            last: cell,
            dragging: false,
        });
        Claim::claimed()
    }

    fn pointer_move(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        let Some(drag) = self.drag.as_mut() else {
            return Claim::Pass;
        };
        if !drag.dragging {
            if !past_threshold(model, drag.start, event.screen) {
                return Claim::claimed();
            }
            drag.dragging = true;
            gesture_started(model, GestureKind::DragSelect);
        }
        let Some(cell) = event.cell(model) else {
            return Claim::claimed();
        };
        if cell == drag.last {
            return Claim::claimed();
        }
        drag.last = cell;
        let Some(entry) = model.current_mut() else {
            return Claim::claimed();
        };
        entry.cursor.extend_active_to(cell.x, cell.y);
        let bounds = entry.sheet.cell_bounds(cell);
        model.viewport.ensure_visible(&bounds, model.now);
        Claim::claimed()
    }

    fn pointer_up(&mut self, model: &mut AppModel, _event: &PointerEvent) -> Claim {
        let Some(drag) = self.drag.take() else {
            return Claim::Pass;
        };
        if drag.dragging {
            gesture_ended(model, GestureKind::DragSelect, true);
        }
        Claim::claimed()
    }

    fn cancel(&mut self, model: &mut AppModel) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        if let Some(entry) = model.current_mut() {
            entry.cursor.replace(drag.before);
        }
        if drag.dragging {
            gesture_ended(model, GestureKind::DragSelect, false);
        }
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
    use crate::model::SheetInfo;
    use crate::pointer::Modifiers;
    use crate::selection::CellRange;
    use crate::theme::Theme;

    fn model() -> AppModel {
        let mut model = AppModel::new(800.0, 600.0, GridConfig::default(), Theme::default());
        model.sheets.upsert(SheetInfo::new("s1", "Sheet 1"));
        model.ready = true;
        model
    }

    fn at_cell(model: &AppModel, pos: Pos, button: Button, modifiers: Modifiers) -> PointerEvent {
        let center = model.current().expect("sheet").sheet.offsets.cell_rect(pos).center();
        let screen = model.viewport.world_to_screen(center);
        PointerEvent::new(model, screen, button, modifiers, Instant::now())
    }

    fn left(model: &AppModel, pos: Pos) -> PointerEvent {
        at_cell(model, pos, Button::Left, Modifiers::none())
    }

    fn ranges(model: &AppModel) -> Vec<CellRange> {
        model.current().expect("sheet").cursor.selection().ranges().to_vec()
    }

    #[test]
    fn test_click_moves_cursor() {
        let mut model = model();
        let mut handler = DragSelectHandler::default();
        let ev = left(&model, Pos::new(3, 4));
        handler.pointer_down(&mut model, &ev);
        let ev = left(&model, Pos::new(3, 4));
        handler.pointer_up(&mut model, &ev);
        assert_eq!(model.current().expect("sheet").cursor.position(), Pos::new(3, 4));
        assert!(!handler.is_active());
    }

    #[test]
    fn test_drag_extends_from_anchor() {
        let mut model = model();
        let mut handler = DragSelectHandler::default();
        let ev = left(&model, Pos::new(2, 2));
        handler.pointer_down(&mut model, &ev);
        let ev = left(&model, Pos::new(4, 5));
        handler.pointer_move(&mut model, &ev);
        let ev = left(&model, Pos::new(4, 5));
        handler.pointer_up(&mut model, &ev);
        assert_eq!(ranges(&model), vec![CellRange::Rect(Rect::new(2, 2, 4, 5))]);
        assert_eq!(model.current().expect("sheet").cursor.position(), Pos::new(2, 2));
    }

    #[test]
    fn test_shift_click_selects_to() {
        let mut model = model();
        let mut handler = DragSelectHandler::default();
        let ev = left(&model, Pos::new(2, 2));
        handler.pointer_down(&mut model, &ev);
        let ev = left(&model, Pos::new(2, 2));
        handler.pointer_up(&mut model, &ev);
        let shift = Modifiers {
            shift: true,
            ..Modifiers::none()
        };
        let event = at_cell(&model, Pos::new(3, 6), Button::Left, shift);
        handler.pointer_down(&mut model, &event);
        assert_eq!(ranges(&model), vec![CellRange::Rect(Rect::new(2, 2, 3, 6))]);
    }

    #[test]
    fn test_ctrl_click_appends_then_excludes() {
        let mut model = model();
        let mut handler = DragSelectHandler::default();
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::none()
        };
        let ev = left(&model, Pos::new(1, 1));
        handler.pointer_down(&mut model, &ev);
        let ev = left(&model, Pos::new(1, 1));
        handler.pointer_up(&mut model, &ev);

        let event = at_cell(&model, Pos::new(5, 5), Button::Left, ctrl);
        handler.pointer_down(&mut model, &event);
        let ev = at_cell(&model, Pos::new(6, 6), Button::Left, ctrl);
        handler.pointer_move(&mut model, &ev);
        handler.pointer_up(&mut model, &event);
        assert_eq!(
            ranges(&model),
            vec![CellRange::cell(Pos::new(1, 1)), CellRange::Rect(Rect::new(5, 5, 6, 6))]
        );

        let event = at_cell(&model, Pos::new(6, 6), Button::Left, ctrl);
        assert!(handler.pointer_down(&mut model, &event).is_claimed());
        assert!(!handler.is_active());
        assert!(!model.current().expect("sheet").cursor.selection().contains(Pos::new(6, 6)));
    }

    #[test]
    fn test_cancel_restores_selection_before_press() {
        let mut model = model();
        if let Some(entry) = model.current_mut() {
            entry.cursor.select_rect(Rect::new(2, 2, 3, 3), false);
        }
        let mut handler = DragSelectHandler::default();
        let ev = left(&model, Pos::new(6, 6));
        handler.pointer_down(&mut model, &ev);
        let ev = left(&model, Pos::new(8, 9));
        handler.pointer_move(&mut model, &ev);
        assert_eq!(ranges(&model), vec![CellRange::Rect(Rect::new(6, 6, 8, 9))]);

        assert!(handler.cancel(&mut model));
        assert_eq!(ranges(&model), vec![CellRange::Rect(Rect::new(2, 2, 3, 3))]);
        assert!(!handler.is_active());
        assert!(!handler.cancel(&mut model));
    }

    #[test]
    fn test_right_click_keeps_selection_under_pointer() {
        let mut model = model();
        if let Some(entry) = model.current_mut() {
            entry.cursor.select_rect(Rect::new(2, 2, 4, 4), false);
        }
        let mut handler = DragSelectHandler::default();
        let ev = at_cell(&model, Pos::new(3, 3), Button::Right, Modifiers::none());
        handler.pointer_down(&mut model, &ev);
        assert_eq!(ranges(&model), vec![CellRange::Rect(Rect::new(2, 2, 4, 4))]);
        let ev = at_cell(&model, Pos::new(8, 8), Button::Right, Modifiers::none());
        handler.pointer_down(&mut model, &ev);
        assert_eq!(model.current().expect("sheet").cursor.position(), Pos::new(8, 8));
    }
}
