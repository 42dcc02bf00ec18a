//! End-to-end pointer gestures through the running app

mod common;

use common::{ctrl, shift, Harness};
use sheetview::engine::EngineRequest;
use sheetview::geometry::{Axis, Point, Pos, Rect};
use sheetview::messages::{CursorMsg, EngineMsg, Msg, ViewportMsg};
use sheetview::model::{SheetId, TableKind, TableMap, TableRegion};
use sheetview::pointer::Modifiers;
use sheetview::selection::CellRange;

// ============================================================================
// Column heading selection
// ============================================================================

#[test]
fn test_column_heading_click_then_ctrl_click_reverts_to_cell() {
    let mut h = Harness::new();
    h.dispatch(Msg::Cursor(CursorMsg::MoveTo { x: 3, y: 3 }));

    // column 3 spans world x 200..300
    let heading = h.column_heading(250.0);
    h.click(heading, Modifiers::none());

    let selection = h.selection();
    assert!(selection.is_entire_column_selected(3));
    assert_eq!(
        selection.ranges(),
        &[CellRange::Columns {
            min: 3,
            max: 3,
            from_row: 1
        }]
    );
    assert_eq!(selection.cursor(), Pos::new(3, 3));

    h.click(heading, ctrl());
    let selection = h.selection();
    assert!(!selection.is_entire_column_selected(3));
    assert_eq!(selection.ranges(), &[CellRange::cell(Pos::new(3, 3))]);
    assert_eq!(selection.cursor(), Pos::new(3, 3));
    assert!(h.engine.calls().is_empty());
}

#[test]
fn test_heading_drag_selects_column_span() {
    let mut h = Harness::new();
    let start = h.column_heading(150.0);
    h.advance();
    h.down(start, Modifiers::none());
    assert_eq!(h.app.active_gesture(), Some("header"));
    h.drag_to(h.column_heading(450.0), Modifiers::none());
    h.up(h.column_heading(450.0), Modifiers::none());

    assert_eq!(h.selection().line_selection(Axis::Column), Some((2, 5)));
    assert_eq!(h.app.active_gesture(), None);
}

// ============================================================================
// Table moves
// ============================================================================

#[test]
fn test_table_drop_on_other_table_header_is_suppressed() {
    let mut h = Harness::with_tables(vec![
        TableRegion::new("Small", Rect::new(1, 1, 2, 2), TableKind::Import),
        TableRegion::new("Other", Rect::new(5, 5, 7, 9), TableKind::Import),
    ]);

    // the name row of "Small" is row 1
    let grab = h.cell_center(Pos::new(1, 1));
    h.advance();
    h.down(grab, Modifiers::none());
    assert_eq!(h.app.active_gesture(), Some("table_heading"));
    assert_eq!(h.selection().active_rect(), Rect::new(1, 1, 2, 2));

    let target = h.cell_center(Pos::new(5, 5));
    h.drag_to(target, Modifiers::none());
    let preview = *h.app.model().previews().moving().expect("move preview");
    assert_eq!(preview.destination, Rect::new(5, 5, 6, 6));
    assert!(!preview.valid);

    h.up(target, Modifiers::none());
    assert!(h
        .engine
        .requests()
        .iter()
        .all(|r| !matches!(r, EngineRequest::MoveCells { .. })));
    assert_eq!(h.selection().active_rect(), Rect::new(1, 1, 2, 2));
    assert!(h.app.model().previews().moving().is_none());
}

#[test]
fn test_table_drop_on_free_cells_moves_it() {
    let mut h = Harness::with_tables(vec![TableRegion::new(
        "Small",
        Rect::new(1, 1, 2, 2),
        TableKind::Import,
    )]);
    let grab = h.cell_center(Pos::new(1, 1));
    h.advance();
    h.down(grab, Modifiers::none());
    let target = h.cell_center(Pos::new(4, 6));
    h.drag_to(target, Modifiers::none());
    h.up(target, Modifiers::none());

    assert_eq!(
        h.engine.requests(),
        vec![EngineRequest::MoveCells {
            source: Rect::new(1, 1, 2, 2),
            dest: Pos::new(4, 6)
        }]
    );
    assert_eq!(h.selection().active_rect(), Rect::new(4, 6, 5, 7));
}

#[test]
fn test_escape_cancels_table_drag() {
    let mut h = Harness::with_tables(vec![TableRegion::new(
        "Small",
        Rect::new(1, 1, 2, 2),
        TableKind::Import,
    )]);
    let before = h.selection();
    let grab = h.cell_center(Pos::new(1, 1));
    h.advance();
    h.down(grab, Modifiers::none());
    assert_eq!(h.selection().active_rect(), Rect::new(1, 1, 2, 2));
    h.drag_to(h.cell_center(Pos::new(4, 6)), Modifiers::none());

    assert!(h.app.escape(h.now));
    assert!(h.app.model().previews().moving().is_none());
    assert!(h.engine.calls().is_empty());
    assert_eq!(h.selection(), before);
}

// ============================================================================
// Drop-time checks against tables that changed mid-drag
// ============================================================================

fn tables_changed(tables: Vec<TableRegion>) -> Msg {
    Msg::Engine(EngineMsg::TablesChanged {
        sheet_id: SheetId::from("s1"),
        tables: TableMap::new(tables),
    })
}

#[test]
fn test_cell_move_dropped_when_table_arrives_under_target() {
    let mut h = Harness::new();
    h.click(h.cell_center(Pos::new(2, 2)), Modifiers::none());
    h.click(h.cell_center(Pos::new(3, 3)), shift());

    // left border of B2
    let b2 = h.app.model().current().expect("sheet").sheet.cell_bounds(Pos::new(2, 2));
    let grab = h
        .app
        .model()
        .viewport
        .world_to_screen(Point::new(b2.x + 1.0, b2.center().y));
    h.advance();
    h.down(grab, Modifiers::none());
    assert_eq!(h.app.active_gesture(), Some("cell_move"));

    let target = h.cell_center(Pos::new(3, 8));
    h.drag_to(target, Modifiers::none());
    let preview = *h.app.model().previews().moving().expect("move preview");
    assert_eq!(preview.destination, Rect::new(3, 8, 4, 9));
    assert!(preview.valid);

    h.dispatch(tables_changed(vec![TableRegion::new(
        "Late",
        Rect::new(3, 7, 6, 12),
        TableKind::Code,
    )]));
    h.up(target, Modifiers::none());

    assert!(h.engine.calls().is_empty());
    assert_eq!(h.selection().active_rect(), Rect::new(2, 2, 3, 3));
}

#[test]
fn test_table_move_dropped_when_other_table_arrives() {
    let small = TableRegion::new("Small", Rect::new(1, 1, 2, 2), TableKind::Import);
    let mut h = Harness::with_tables(vec![small.clone()]);
    h.advance();
    h.down(h.cell_center(Pos::new(1, 1)), Modifiers::none());
    let target = h.cell_center(Pos::new(4, 6));
    h.drag_to(target, Modifiers::none());
    assert!(h.app.model().previews().moving().expect("move preview").valid);

    h.dispatch(tables_changed(vec![
        small,
        TableRegion::new("Late", Rect::new(5, 7, 8, 12), TableKind::Import),
    ]));
    h.up(target, Modifiers::none());

    assert!(h
        .engine
        .requests()
        .iter()
        .all(|r| !matches!(r, EngineRequest::MoveCells { .. })));
    assert_eq!(h.selection().active_rect(), Rect::new(1, 1, 2, 2));
}

#[test]
fn test_column_move_dropped_when_table_straddles_insertion() {
    let mut h = Harness::new();
    h.click(h.column_heading(150.0), Modifiers::none());
    assert!(h.selection().is_entire_column_selected(2));

    h.advance();
    h.down(h.column_heading(150.0), Modifiers::none());
    let target = h.column_heading(450.0);
    h.drag_to(target, Modifiers::none());
    let preview = *h.app.model().previews().line_move().expect("line preview");
    assert_eq!(preview.to, 5);
    assert!(preview.valid);

    h.dispatch(tables_changed(vec![TableRegion::new(
        "Late",
        Rect::new(5, 1, 8, 5),
        TableKind::Import,
    )]));
    h.up(target, Modifiers::none());

    assert!(h
        .engine
        .requests()
        .iter()
        .all(|r| !matches!(r, EngineRequest::MoveLines { .. })));
    assert!(h.selection().is_entire_column_selected(2));
}

// ============================================================================
// Header resize
// ============================================================================

#[test]
fn test_resizing_column_before_origin_shifts_viewport() {
    let mut h = Harness::new();
    h.dispatch(Msg::Viewport(ViewportMsg::Pan { dx: 400.0, dy: 0.0 }));
    let x_before = h.app.model().viewport.x();
    let scale = h.app.model().viewport.scale();
    assert_eq!(h.column_width(-2), 100.0);

    let start = h.column_heading(h.column_right_edge(-2));
    assert!(start.x > h.app.model().viewport.heading_inset().0);
    h.advance();
    h.down(start, Modifiers::none());
    assert_eq!(h.app.active_gesture(), Some("header"));

    let to = Point::new(start.x + 50.0, start.y);
    h.drag_to(to, Modifiers::none());
    assert_eq!(h.column_width(-2), 150.0);
    assert!((h.app.model().viewport.x() - (x_before + 50.0 * scale)).abs() < 1e-9);

    h.up(to, Modifiers::none());
    assert_eq!(
        h.engine.requests(),
        vec![EngineRequest::CommitResize {
            axis: Axis::Column,
            index: -2,
            old_size: 100.0,
            new_size: 150.0
        }]
    );
    assert_eq!(h.column_width(-2), 150.0);
}

#[test]
fn test_resizing_positive_column_keeps_viewport() {
    let mut h = Harness::new();
    let x_before = h.app.model().viewport.x();
    let start = h.column_heading(h.column_right_edge(2));
    h.advance();
    h.down(start, Modifiers::none());
    let to = Point::new(start.x + 30.0, start.y);
    h.drag_to(to, Modifiers::none());
    h.up(to, Modifiers::none());

    assert_eq!(h.column_width(2), 130.0);
    assert_eq!(h.app.model().viewport.x(), x_before);
}

// ============================================================================
// Cell clicks
// ============================================================================

#[test]
fn test_shift_click_extends_from_anchor() {
    let mut h = Harness::new();
    h.click(h.cell_center(Pos::new(2, 2)), Modifiers::none());
    h.click(h.cell_center(Pos::new(4, 5)), shift());

    let selection = h.selection();
    assert_eq!(selection.active_rect(), Rect::new(2, 2, 4, 5));
    assert_eq!(selection.anchor(), Pos::new(2, 2));
}

#[test]
fn test_ctrl_click_adds_second_range() {
    let mut h = Harness::new();
    h.click(h.cell_center(Pos::new(2, 2)), Modifiers::none());
    h.click(h.cell_center(Pos::new(6, 6)), ctrl());

    let selection = h.selection();
    assert!(selection.is_multi_range());
    assert!(selection.contains(Pos::new(2, 2)));
    assert_eq!(selection.cursor(), Pos::new(6, 6));
}
