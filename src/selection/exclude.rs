use crate::geometry::Rect;

use super::{CellRange, Selection};

impl Selection {
    /// Removes `rect` from every range it overlaps.
    ///
    /// Overlapped ranges are decomposed into the pieces above, below, left of and
    /// right of the excluded area; ranges that do not touch `rect` are kept as
    /// they are (including table ranges). An emptied selection collapses to the
    /// anchor cell, and a cursor that is no longer selected moves to the last
    /// range's finite corner.
    pub fn exclude_cells(&mut self, rect: Rect) {
        if !self.ranges.iter().any(|r| r.intersects(&rect)) {
            return;
        }

        let mut remaining = Vec::with_capacity(self.ranges.len() + 3);
        for range in &self.ranges {
            if !range.intersects(&rect) {
                remaining.push(range.clone());
                continue;
            }
            remaining.extend(
                range
                    .to_rect()
                    .subtract(&rect)
                    .into_iter()
                    .map(CellRange::from_rect),
            );
        }

        if remaining.is_empty() {
            self.collapse_to_anchor();
            return;
        }
        self.set_ranges(remaining);

        if !self.contains(self.cursor) {
            self.cursor = self.active_range().last_finite_corner();
            self.anchor = self.cursor;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{Pos, UNBOUNDED};
    use crate::model::sheet::SheetId;

    use super::*;

    fn sheet() -> SheetId {
        SheetId::from("s1")
    }

    #[test]
    fn test_exclude_disjoint_is_noop() {
        let mut sel = Selection::at(sheet(), Pos::new(1, 1));
        sel.select_rect(1, 1, 3, 3, false);
        let before = sel.clone();
        sel.exclude_cells(Rect::new(10, 10, 12, 12));
        assert_eq!(sel, before);
    }

    #[test]
    fn test_exclude_superset_collapses_to_anchor() {
        let mut sel = Selection::at(sheet(), Pos::new(1, 1));
        sel.select_rect(2, 2, 3, 3, false);
        sel.exclude_cells(Rect::new(1, 1, 5, 5));
        assert_eq!(sel.ranges(), &[CellRange::cell(Pos::new(2, 2))]);
        assert_eq!(sel.cursor(), Pos::new(2, 2));
    }

    #[test]
    fn test_exclude_center_cell() {
        let mut sel = Selection::at(sheet(), Pos::new(1, 1));
        sel.select_rect(1, 1, 3, 3, false);
        sel.exclude_cells(Rect::single(Pos::new(2, 2)));
        assert_eq!(
            sel.ranges(),
            &[
                CellRange::Rect(Rect::new(1, 1, 3, 1)),
                CellRange::Rect(Rect::new(1, 3, 3, 3)),
                CellRange::Rect(Rect::new(1, 2, 1, 2)),
                CellRange::Rect(Rect::new(3, 2, 3, 2)),
            ]
        );
        // cursor (1,1) is still selected
        assert_eq!(sel.cursor(), Pos::new(1, 1));
        assert_eq!(sel.active_index(), 3);
    }

    #[test]
    fn test_exclude_cursor_moves_to_last_corner() {
        let mut sel = Selection::at(sheet(), Pos::new(1, 1));
        sel.select_rect(1, 1, 4, 1, false);
        sel.exclude_cells(Rect::new(1, 1, 2, 1));
        assert_eq!(sel.ranges(), &[CellRange::Rect(Rect::new(3, 1, 4, 1))]);
        assert_eq!(sel.cursor(), Pos::new(4, 1));
    }

    #[test]
    fn test_exclude_from_unbounded_column() {
        let mut sel = Selection::at(sheet(), Pos::new(2, 1));
        sel.select_column(2, false, false, None);
        sel.exclude_cells(Rect::new(2, 1, 2, 4));
        assert_eq!(
            sel.ranges(),
            &[CellRange::Columns {
                min: 2,
                max: 2,
                from_row: 5
            }]
        );
        // unbounded range: cursor goes to its start
        assert_eq!(sel.cursor(), Pos::new(2, 5));
        assert!(sel.ranges()[0].to_rect().max.y == UNBOUNDED);
    }
}
