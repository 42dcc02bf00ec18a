//! Dragging the selection (or a table) to a new place
//!
//! The destination is re-validated on every move and again at drop time;
//! an invalid destination shows in the preview and drops nothing.

use crate::commands::Cmd;
use crate::engine::EngineRequest;
use crate::events::GestureKind;
use crate::geometry::{Axis, PixelRect, Point, Pos, Rect};
use crate::model::{AppModel, MovePreview, TableMap};
use crate::pointer::{
    gesture_ended, gesture_started, past_threshold, Button, Claim, PointerEvent, PointerHandler,
};
use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveValidity {
    Valid,
    /// Lands on the data of a read-only (code) table
    ReadOnlyTable,
    /// A moved table would overlap another table
    OverlapsTable,
    /// Lands on a table's name or column header row
    TableHeader,
    /// A column/row move would split a table
    SplitsTable,
}

impl MoveValidity {
    pub fn is_valid(self) -> bool {
        self == MoveValidity::Valid
    }
}

/// Checks a cell/table move of `origin` to `destination`.
///
/// Tables inside `origin` travel with the move and are ignored, so a table
/// may land on its own prior footprint.
pub fn validate_move(tables: &TableMap, origin: &Rect, destination: &Rect, moving_table: bool) -> MoveValidity {
    for table in tables.iter() {
        if origin.contains_rect(&table.footprint) {
            continue;
        }
        if moving_table && table.footprint.intersects(destination) {
            return MoveValidity::OverlapsTable;
        }
        if table.header_rows().is_some_and(|h| h.intersects(destination)) {
            return MoveValidity::TableHeader;
        }
        if table.is_read_only() && table.interior().is_some_and(|i| i.intersects(destination)) {
            return MoveValidity::ReadOnlyTable;
        }
    }
    MoveValidity::Valid
}

/// Checks moving lines `min..=max` so they start at `to`.
///
/// The insertion point may not fall strictly inside a table unless the whole
/// table is part of the moved span.
pub fn validate_line_move(tables: &TableMap, axis: Axis, min: i64, max: i64, to: i64) -> MoveValidity {
    let len = max - min + 1;
    let insertion = if to < min { to } else { to + len };
    let splits = tables.iter().any(|t| {
        let (lo, hi) = t.footprint.span(axis);
        let carried = lo >= min && hi <= max;
        t.straddles(axis, insertion) && !carried
    });
    if splits {
        MoveValidity::SplitsTable
    } else {
        MoveValidity::Valid
    }
}

/// Move-in-progress shared by selection-border drags and table drags
#[derive(Debug, Clone)]
pub struct MoveGesture {
    kind: GestureKind,
    origin: Rect,
    /// Pressed cell relative to `origin.min`
    grab: (i64, i64),
    start: Point,
    destination: Rect,
    validity: MoveValidity,
    dragging: bool,
    /// Selection to put back on cancel, when the press changed it
    restore: Option<Selection>,
}

impl MoveGesture {
    pub fn new(kind: GestureKind, origin: Rect, pressed: Pos, start: Point) -> Self {
        Self {
            kind,
            origin,
            grab: (pressed.x - origin.min.x, pressed.y - origin.min.y),
            start,
            destination: origin,
            validity: MoveValidity::Valid,
            dragging: false,
            restore: None,
        }
    }

    pub fn restoring(mut self, selection: Selection) -> Self {
        self.restore = Some(selection);
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn destination(&self) -> Rect {
        self.destination
    }

    pub fn validity(&self) -> MoveValidity {
        self.validity
    }

    fn moving_table(&self) -> bool {
        self.kind == GestureKind::TableMove
    }

    fn validate(&self, model: &AppModel) -> MoveValidity {
        model.current().map_or(MoveValidity::Valid, |entry| {
            validate_move(&entry.sheet.tables, &self.origin, &self.destination, self.moving_table())
        })
    }

    /// Updates the destination; returns true once the drag threshold is passed
    pub fn drag(&mut self, model: &mut AppModel, event: &PointerEvent) -> bool {
        if !self.dragging {
            if !past_threshold(model, self.start, event.screen) {
                return false;
            }
            self.dragging = true;
            if let Some(entry) = model.current_mut() {
                entry.cursor.set_moving(true);
            }
            gesture_started(model, self.kind);
        }
        let Some(cell) = event.cell(model) else {
            return true;
        };
        let dx = (cell.x - self.grab.0).max(1) - self.origin.min.x;
        let dy = (cell.y - self.grab.1).max(1) - self.origin.min.y;
        let destination = self.origin.translate(dx, dy);
        if destination != self.destination {
            self.destination = destination;
            self.validity = self.validate(model);
            tracing::debug!(?destination, validity = ?self.validity, "move target");
        }
        model.set_move_preview(Some(MovePreview {
            origin: self.origin,
            destination: self.destination,
            valid: self.validity.is_valid(),
        }));
        true
    }

    fn clear(&self, model: &mut AppModel) {
        model.set_move_preview(None);
        if let Some(entry) = model.current_mut() {
            entry.cursor.set_moving(false);
        }
    }

    /// Ends the drag; at most one engine request
    pub fn drop(self, model: &mut AppModel) -> Option<Cmd> {
        self.clear(model);
        if !self.dragging {
            return None;
        }
        let validity = self.validate(model);
        let committed = validity.is_valid() && self.destination != self.origin;
        let mut cmd = None;
        if committed {
            if let Some(entry) = model.current_mut() {
                cmd = Some(Cmd::engine(
                    entry.cursor.selection(),
                    EngineRequest::MoveCells {
                        source: self.origin,
                        dest: self.destination.min,
                    },
                ));
                let dx = self.destination.min.x - self.origin.min.x;
                let dy = self.destination.min.y - self.origin.min.y;
                entry.cursor.translate(dx, dy);
            }
        } else if !validity.is_valid() {
            tracing::debug!(?validity, "move dropped on invalid target");
        }
        gesture_ended(model, self.kind, committed);
        cmd
    }

    pub fn cancel(self, model: &mut AppModel) {
        self.clear(model);
        if let (Some(selection), Some(entry)) = (self.restore, model.current_mut()) {
            entry.cursor.replace(selection);
        }
        if self.dragging {
            gesture_ended(model, self.kind, false);
        }
    }
}

/// Drags the selection by its border
#[derive(Debug, Default)]
pub struct CellMoveHandler {
    gesture: Option<MoveGesture>,
}

/// Whether `world` is on the outline of `bounds`, within `tolerance`
fn on_border(bounds: &PixelRect, world: Point, tolerance: f64) -> bool {
    bounds.inflate(tolerance).contains(world) && !bounds.inflate(-tolerance).contains(world)
}

impl PointerHandler for CellMoveHandler {
    fn name(&self) -> &'static str {
        "cell_move"
    }

    fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        if event.button != Button::Left
            || event.modifiers != Default::default()
            || !event.in_cells(model)
        {
            return Claim::Pass;
        }
        let Some(entry) = model.current() else {
            return Claim::Pass;
        };
        let Some(origin) = entry.cursor.selection().single_rect() else {
            return Claim::Pass;
        };
        let bounds = entry.sheet.offsets.rect_pixels(&origin);
        let tolerance = model.config.resize_tolerance / model.viewport.scale();
        if !on_border(&bounds, event.world, tolerance) {
            return Claim::Pass;
        }
        let Some(cell) = event.cell(model) else {
            return Claim::Pass;
        };
        let pressed = Pos::new(
            cell.x.clamp(origin.min.x, origin.max.x),
            cell.y.clamp(origin.min.y, origin.max.y),
        );
        self.gesture = Some(MoveGesture::new(GestureKind::CellMove, origin, pressed, event.screen));
        Claim::claimed()
    }

    fn pointer_move(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        match self.gesture.as_mut() {
            Some(gesture) => {
                gesture.drag(model, event);
                Claim::claimed()
            }
            None => Claim::Pass,
        }
    }

    fn pointer_up(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        let Some(gesture) = self.gesture.take() else {
            return Claim::Pass;
        };
        if !gesture.is_dragging() {
            // A click on the border selects the cell under it
            gesture.cancel(model);
            if let Some(cell) = event.cell(model) {
                if let Some(entry) = model.current_mut() {
                    entry.cursor.move_to(cell.x, cell.y, false);
                }
            }
            return Claim::claimed();
        }
        Claim::with(gesture.drop(model))
    }

    fn cancel(&mut self, model: &mut AppModel) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                gesture.cancel(model);
                true
            }
            None => false,
        }
    }

    fn is_active(&self) -> bool {
        self.gesture.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::config::GridConfig;
    use crate::model::{SheetInfo, TableKind, TableRegion};
    use crate::pointer::Modifiers;
    use crate::theme::Theme;

    fn tables() -> TableMap {
        TableMap::new(vec![
            TableRegion::new("Code", Rect::new(5, 1, 7, 6), TableKind::Code),
            TableRegion::new("Data", Rect::new(10, 10, 12, 15), TableKind::Import),
        ])
    }

    #[test]
    fn test_validate_move_rules() {
        let t = tables();
        let origin = Rect::new(1, 1, 1, 1);
        assert_eq!(validate_move(&t, &origin, &Rect::new(2, 2, 2, 2), false), MoveValidity::Valid);
        // code table data
        assert_eq!(
            validate_move(&t, &origin, &Rect::new(6, 4, 6, 4), false),
            MoveValidity::ReadOnlyTable
        );
        // import table header
        assert_eq!(
            validate_move(&t, &origin, &Rect::new(11, 11, 11, 11), false),
            MoveValidity::TableHeader
        );
        // import table data is fine for cells, not for tables
        assert_eq!(validate_move(&t, &origin, &Rect::new(11, 13, 11, 13), false), MoveValidity::Valid);
        assert_eq!(
            validate_move(&t, &Rect::new(1, 20, 3, 22), &Rect::new(11, 13, 13, 15), true),
            MoveValidity::OverlapsTable
        );
    }

    #[test]
    fn test_table_may_land_on_own_footprint() {
        let t = tables();
        let origin = Rect::new(10, 10, 12, 15);
        assert_eq!(validate_move(&t, &origin, &origin.translate(1, 1), true), MoveValidity::Valid);
    }

    #[test]
    fn test_validate_line_move() {
        let t = tables();
        // column 1 moved to index 5 goes before old column 6, inside "Code"
        assert_eq!(validate_line_move(&t, Axis::Column, 1, 1, 5), MoveValidity::SplitsTable);
        // landing right after the table
        assert_eq!(validate_line_move(&t, Axis::Column, 1, 1, 7), MoveValidity::Valid);
        // moving left into the table
        assert_eq!(validate_line_move(&t, Axis::Column, 9, 9, 6), MoveValidity::SplitsTable);
        assert_eq!(validate_line_move(&t, Axis::Column, 9, 9, 5), MoveValidity::Valid);
        // the table itself is carried
        assert_eq!(validate_line_move(&t, Axis::Column, 5, 7, 2), MoveValidity::Valid);
    }

    fn model() -> AppModel {
        let mut model = AppModel::new(800.0, 600.0, GridConfig::default(), Theme::default());
        let mut info = SheetInfo::new("s1", "Sheet 1");
        info.tables = tables();
        model.sheets.upsert(info);
        model.ready = true;
        if let Some(entry) = model.current_mut() {
            entry.cursor.select_rect(Rect::new(2, 2, 3, 3), false);
        }
        model
    }

    fn event(model: &AppModel, world: Point) -> PointerEvent {
        let screen = model.viewport.world_to_screen(world);
        PointerEvent::new(model, screen, Button::Left, Modifiers::none(), Instant::now())
    }

    fn center(model: &AppModel, pos: Pos) -> Point {
        model.current().expect("sheet").sheet.offsets.cell_rect(pos).center()
    }

    #[test]
    fn test_border_drag_moves_selection() {
        let mut model = model();
        let mut handler = CellMoveHandler::default();
        // left border of B2
        let left = model.current().expect("sheet").sheet.offsets.cell_rect(Pos::new(2, 2));
        let down = event(&model, Point::new(left.x + 1.0, left.center().y));
        assert!(handler.pointer_down(&mut model, &down).is_claimed());

        let over = event(&model, center(&model, Pos::new(3, 20)));
        handler.pointer_move(&mut model, &over);
        let preview = *model.previews().moving().expect("preview");
        assert_eq!(preview.destination, Rect::new(3, 20, 4, 21));
        assert!(preview.valid);

        let cmd = handler.pointer_up(&mut model, &over).into_cmd().expect("cmd");
        assert_eq!(
            cmd.engine_calls()[0].request,
            EngineRequest::MoveCells {
                source: Rect::new(2, 2, 3, 3),
                dest: Pos::new(3, 20)
            }
        );
        let entry = model.current().expect("sheet");
        assert_eq!(entry.cursor.selection().single_rect(), Some(Rect::new(3, 20, 4, 21)));
        assert!(!entry.cursor.is_moving());
    }

    #[test]
    fn test_invalid_drop_sends_nothing() {
        let mut model = model();
        let mut handler = CellMoveHandler::default();
        let left = model.current().expect("sheet").sheet.offsets.cell_rect(Pos::new(2, 2));
        let down = event(&model, Point::new(left.x + 1.0, left.center().y));
        handler.pointer_down(&mut model, &down);
        // onto the code table's data
        let over = event(&model, center(&model, Pos::new(6, 4)));
        handler.pointer_move(&mut model, &over);
        assert!(!model.previews().moving().expect("preview").valid);
        assert_eq!(handler.pointer_up(&mut model, &over).into_cmd(), None);
        let entry = model.current().expect("sheet");
        assert_eq!(entry.cursor.selection().single_rect(), Some(Rect::new(2, 2, 3, 3)));
    }

    #[test]
    fn test_press_inside_selection_passes() {
        let mut model = model();
        let mut handler = CellMoveHandler::default();
        let down = event(&model, center(&model, Pos::new(2, 2)));
        assert_eq!(handler.pointer_down(&mut model, &down), Claim::Pass);
    }
}
