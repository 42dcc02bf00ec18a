//! Selection model properties, checked over small exhaustive grids

use std::collections::BTreeSet;
use std::time::Instant;

use sheetview::config::GridConfig;
use sheetview::geometry::{PixelRect, Pos, Rect};
use sheetview::model::{SheetId, TableKind, TableRegion};
use sheetview::pointer::autofill::{cleared_rects, target_rect};
use sheetview::selection::{CellRange, Selection};
use sheetview::viewport::Viewport;

fn sheet() -> SheetId {
    SheetId::from("s1")
}

fn area(rect: &Rect) -> i64 {
    rect.width() * rect.height()
}

/// Every rectangle with corners in `1..=n`
fn rects(n: i64) -> Vec<Rect> {
    let mut out = Vec::new();
    for x0 in 1..=n {
        for y0 in 1..=n {
            for x1 in x0..=n {
                for y1 in y0..=n {
                    out.push(Rect::new(x0, y0, x1, y1));
                }
            }
        }
    }
    out
}

// ============================================================================
// Exclusion
// ============================================================================

#[test]
fn test_excluding_disjoint_area_changes_nothing() {
    let selected = Rect::new(2, 2, 3, 4);
    for excluded in rects(6).into_iter().filter(|r| !r.intersects(&selected)) {
        let mut sel = Selection::new(sheet());
        sel.select_rect(2, 2, 3, 4, false);
        let before = sel.clone();
        sel.exclude_cells(excluded);
        assert_eq!(sel, before, "excluding {excluded:?}");
    }
}

#[test]
fn test_excluding_superset_collapses_to_anchor() {
    for selected in rects(4) {
        let mut sel = Selection::new(sheet());
        sel.select_rect(selected.min.x, selected.min.y, selected.max.x, selected.max.y, false);
        sel.exclude_cells(Rect::new(1, 1, 4, 4));
        assert_eq!(sel.ranges(), &[CellRange::cell(selected.min)], "{selected:?}");
        assert_eq!(sel.cursor(), selected.min);
        assert_eq!(sel.anchor(), selected.min);
    }
}

#[test]
fn test_excluding_keeps_every_other_cell() {
    let selected = Rect::new(1, 1, 4, 4);
    for excluded in rects(5) {
        let mut sel = Selection::new(sheet());
        sel.select_rect(1, 1, 4, 4, false);
        sel.exclude_cells(excluded);
        if excluded.contains_rect(&selected) {
            continue;
        }
        for x in 1..=4 {
            for y in 1..=4 {
                let pos = Pos::new(x, y);
                assert_eq!(
                    sel.contains(pos),
                    !excluded.contains(pos),
                    "cell {pos:?} after excluding {excluded:?}"
                );
            }
        }
        assert!(sel.contains(sel.cursor()));
    }
}

// ============================================================================
// Column toggles
// ============================================================================

fn toggled_columns(order: &[i64]) -> BTreeSet<i64> {
    let mut sel = Selection::new(sheet());
    for &column in order {
        sel.select_column(column, true, false, None);
        sel.assert_invariants();
    }
    (1..=8).filter(|&c| sel.is_entire_column_selected(c)).collect()
}

#[test]
fn test_toggle_parity_is_order_independent() {
    let orders: [&[i64]; 4] = [
        &[2, 3, 4, 3, 6],
        &[1, 1, 5, 5, 5],
        &[7, 2, 2, 8, 1, 7],
        &[3, 4, 5, 6, 4],
    ];
    for order in orders {
        let mut reversed = order.to_vec();
        reversed.reverse();
        let expected: BTreeSet<i64> = (1..=8)
            .filter(|c| order.iter().filter(|&&x| x == *c).count() % 2 == 1)
            .collect();
        assert_eq!(toggled_columns(order), expected, "{order:?}");
        assert_eq!(toggled_columns(&reversed), expected, "{reversed:?}");
    }
}

#[test]
fn test_toggling_every_column_off_leaves_one_cell() {
    let mut sel = Selection::at(sheet(), Pos::new(2, 7));
    sel.select_column(3, false, false, None);
    sel.select_column(4, true, false, None);
    sel.select_column(3, true, false, None);
    sel.select_column(4, true, false, None);
    assert!(sel.is_single_selection());
    assert_eq!(sel.ranges().len(), 1);
}

// ============================================================================
// Autofill geometry
// ============================================================================

#[test]
fn test_autofill_target_holds_source_origin_and_pointer() {
    let source = Rect::new(3, 3, 5, 5);
    for x in 1..=8 {
        for y in 1..=8 {
            let cell = Pos::new(x, y);
            let target = target_rect(source, cell);
            assert!(target.contains(cell), "{cell:?} -> {target:?}");
            assert!(target.contains(source.min), "{cell:?} -> {target:?}");

            let kept = source.intersection(&target).map_or(0, |r| area(&r));
            let cleared: i64 = cleared_rects(&source, &target).iter().map(area).sum();
            assert_eq!(kept + cleared, area(&source), "{cell:?} -> {target:?}");
        }
    }
}

#[test]
fn test_autofill_over_bottom_right_keeps_source() {
    let source = Rect::new(3, 3, 5, 5);
    assert_eq!(target_rect(source, source.max), source);
    assert!(cleared_rects(&source, &source).is_empty());
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn test_ensure_visible_twice_is_a_noop() {
    let config = GridConfig::default();
    let now = Instant::now();
    let targets = [
        PixelRect::new(0.0, 0.0, 100.0, 21.0),
        PixelRect::new(5000.0, 0.0, 100.0, 21.0),
        PixelRect::new(0.0, 9000.0, 100.0, 21.0),
        PixelRect::new(-700.0, -300.0, 100.0, 21.0),
        PixelRect::new(200.0, 200.0, 2000.0, 2000.0),
    ];
    for target in targets {
        let mut viewport = Viewport::new(800.0, 600.0, &config);
        viewport.ensure_visible(&target, now);
        assert!(!viewport.ensure_visible(&target, now), "{target:?}");
    }
}

// ============================================================================
// Tokens
// ============================================================================

#[test]
fn test_tokens_round_trip_each_range_kind() {
    let table = TableRegion::new("Sales", Rect::new(2, 3, 5, 9), TableKind::Import);

    let mut selections = Vec::new();
    selections.push(Selection::at(sheet(), Pos::new(4, 9)));

    let mut multi = Selection::new(sheet());
    multi.select_rect(1, 1, 3, 3, false);
    multi.select_rect(6, 2, 7, 8, true);
    multi.exclude_cells(Rect::single(Pos::new(2, 2)));
    selections.push(multi);

    let mut columns = Selection::at(sheet(), Pos::new(1, 4));
    columns.select_column(3, false, false, None);
    columns.select_column(6, false, true, None);
    selections.push(columns);

    let mut all = Selection::new(sheet());
    all.select_all(false);
    selections.push(all);

    let mut tables = Selection::new(sheet());
    tables.select_table(&table, Some((1, 2)), false);
    selections.push(tables);

    for sel in selections {
        let token = sel.save();
        assert_eq!(Selection::load(&token).expect("token"), sel, "{token}");
    }
}

#[test]
fn test_a1_text_reselects_every_small_rect() {
    let tables = sheetview::model::TableMap::default();
    for rect in rects(4) {
        let mut sel = Selection::new(sheet());
        sel.select_rect(rect.min.x, rect.min.y, rect.max.x, rect.max.y, false);
        let a1 = sel.to_a1();
        let parsed = Selection::from_a1(&a1, sheet(), &tables).expect("a1");
        assert_eq!(parsed.ranges(), sel.ranges(), "{a1}");
        assert_eq!(parsed.to_cursor_a1(), format!("{}{}", sheetview::selection::a1::column_name(rect.min.x), rect.min.y));
    }
}
