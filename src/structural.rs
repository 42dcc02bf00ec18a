//! Column/row insertion and deletion planning
//!
//! Turns the current selection into an insert/delete request, or explains why
//! the action is unavailable.

use std::fmt;

use crate::geometry::Axis;
use crate::model::Sheet;
use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// Structural edits are disabled (embedded/restricted mode)
    Restricted,
    /// The affected set of columns/rows is unbounded
    Unbounded,
    /// The insertion point splits a read-only table
    ReadOnlyTable,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Restricted => f.write_str("structural edits are disabled"),
            Unavailable::Unbounded => f.write_str("selection covers unbounded columns or rows"),
            Unavailable::ReadOnlyTable => f.write_str("cannot insert inside a read-only table"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertPlan {
    pub axis: Axis,
    pub at: i64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub axis: Axis,
    pub indices: Vec<i64>,
}

/// Lines the action applies to: the entire lines selected, else every line touched
fn affected_lines(selection: &Selection, axis: Axis) -> Result<Vec<i64>, Unavailable> {
    match selection.selected_lines(axis) {
        None => Err(Unavailable::Unbounded),
        Some(lines) if !lines.is_empty() => Ok(lines),
        Some(_) => match selection.lines_touched(axis) {
            Some(lines) if !lines.is_empty() => Ok(lines),
            _ => Err(Unavailable::Unbounded),
        },
    }
}

/// Plan inserting as many lines as are selected, before or after the selection.
///
/// When the cursor sits in a merged cell the insertion point moves outside
/// the merge.
pub fn plan_insert(
    selection: &Selection,
    sheet: &Sheet,
    axis: Axis,
    before: bool,
    restricted: bool,
) -> Result<InsertPlan, Unavailable> {
    if restricted {
        return Err(Unavailable::Restricted);
    }
    let lines = affected_lines(selection, axis)?;
    let count = lines.len() as i64;
    let (mut lo, mut hi) = (lines[0], lines[lines.len() - 1]);

    if let Some(merge) = sheet.merge_at(selection.cursor()) {
        let (m_lo, m_hi) = merge.span(axis);
        lo = lo.min(m_lo);
        hi = hi.max(m_hi);
    }

    let at = if before { lo } else { hi + 1 };
    if sheet
        .tables
        .iter()
        .any(|t| t.is_read_only() && t.straddles(axis, at))
    {
        return Err(Unavailable::ReadOnlyTable);
    }

    Ok(InsertPlan { axis, at, count })
}

/// Plan deleting the selected lines (or every line the selection touches)
pub fn plan_delete(selection: &Selection, axis: Axis, restricted: bool) -> Result<DeletePlan, Unavailable> {
    if restricted {
        return Err(Unavailable::Restricted);
    }
    Ok(DeletePlan {
        axis,
        indices: affected_lines(selection, axis)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{SheetId, SheetOffsets, TableKind, TableRegion};

    fn sheet() -> Sheet {
        Sheet::new(SheetId::from("s1"), "Sheet 1", SheetOffsets::default())
    }

    fn selection() -> Selection {
        Selection::new(SheetId::from("s1"))
    }

    #[test]
    fn test_count_from_selected_columns() {
        let mut sel = selection();
        sel.select_column(3, false, false, None);
        sel.select_column(5, false, true, None);
        let plan = plan_insert(&sel, &sheet(), Axis::Column, true, false).expect("plan");
        assert_eq!(plan, InsertPlan { axis: Axis::Column, at: 3, count: 3 });
        let plan = plan_insert(&sel, &sheet(), Axis::Column, false, false).expect("plan");
        assert_eq!(plan.at, 6);
    }

    #[test]
    fn test_count_from_distinct_columns_touched() {
        let mut sel = selection();
        sel.select_rect(2, 1, 3, 4, false);
        sel.select_rect(3, 8, 3, 9, true);
        let plan = plan_insert(&sel, &sheet(), Axis::Column, true, false).expect("plan");
        assert_eq!(plan.count, 2);
        assert_eq!(plan.at, 2);

        // single cell still inserts one
        let plan = plan_insert(&selection(), &sheet(), Axis::Row, false, false).expect("plan");
        assert_eq!(plan, InsertPlan { axis: Axis::Row, at: 2, count: 1 });
    }

    #[test]
    fn test_merged_cell_moves_insertion_point() {
        let mut s = sheet();
        s.merges.push(Rect::new(2, 2, 4, 2));
        let mut sel = selection();
        sel.move_to(3, 2, false);
        let before = plan_insert(&sel, &s, Axis::Column, true, false).expect("plan");
        assert_eq!(before.at, 2);
        let after = plan_insert(&sel, &s, Axis::Column, false, false).expect("plan");
        assert_eq!(after.at, 5);
        assert_eq!(after.count, 1);
    }

    #[test]
    fn test_unavailable_cases() {
        let mut sel = selection();
        assert_eq!(
            plan_insert(&sel, &sheet(), Axis::Column, true, true),
            Err(Unavailable::Restricted)
        );
        sel.select_all(false);
        assert_eq!(
            plan_insert(&sel, &sheet(), Axis::Column, true, false),
            Err(Unavailable::Unbounded)
        );
        sel.select_row(4, false, false, None);
        // a row selection touches unbounded columns
        assert_eq!(plan_delete(&sel, Axis::Column, false), Err(Unavailable::Unbounded));
        assert_eq!(
            plan_delete(&sel, Axis::Row, false),
            Ok(DeletePlan { axis: Axis::Row, indices: vec![4] })
        );
    }

    #[test]
    fn test_read_only_table_blocks_insert_inside() {
        let mut s = sheet();
        s.tables = crate::model::TableMap::new(vec![TableRegion::new(
            "Out",
            Rect::new(2, 1, 4, 5),
            TableKind::Code,
        )]);
        let mut sel = selection();
        sel.move_to(3, 1, false);
        assert_eq!(
            plan_insert(&sel, &s, Axis::Column, true, false),
            Err(Unavailable::ReadOnlyTable)
        );
        sel.move_to(2, 1, false);
        assert!(plan_insert(&sel, &s, Axis::Column, true, false).is_ok());
    }
}
