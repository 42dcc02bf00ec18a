//! A1 notation for selections
//!
//! Ranges are comma separated. Each one is a cell (`B5`), a rectangle
//! (`A1:C3`), whole columns (`B:D`, or `B5:D` to start at row 5), whole rows
//! (`3:5`, or `C3:5`), the whole sheet (`*`) or a table name. An empty end
//! (`C:`, `B3:`) runs to the edge of the sheet. `$` markers are accepted and
//! dropped.

use anyhow::{bail, Context, Result};

use crate::geometry::{is_valid_coord, Pos, Rect, UNBOUNDED};
use crate::model::sheet::SheetId;
use crate::model::table::TableMap;

use super::{CellRange, Selection, TableRange};

/// Spreadsheet column name: 1 → "A", 27 → "AA"
pub fn column_name(index: i64) -> String {
    let mut n = index;
    let mut name = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        name.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Column index from a name, case-insensitive
pub fn column_from_name(name: &str) -> Option<i64> {
    if name.is_empty() {
        return None;
    }
    let mut index: i64 = 0;
    for c in name.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as i64 + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    is_valid_coord(index).then_some(index)
}

pub fn cell_name(pos: Pos) -> String {
    format!("{}{}", column_name(pos.x), pos.y)
}

/// One side of a range: either part may be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RefEnd {
    col: Option<i64>,
    row: Option<i64>,
}

impl RefEnd {
    fn parse(s: &str) -> Result<RefEnd> {
        let col_abs = s.starts_with('$');
        let rest = s.strip_prefix('$').unwrap_or(s);
        let split = rest.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(rest.len());
        let (letters, rest) = rest.split_at(split);
        let row_abs = rest.starts_with('$');
        let digits = rest.strip_prefix('$').unwrap_or(rest);

        if letters.is_empty() && digits.is_empty() {
            bail!("empty cell reference {s:?}");
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            bail!("invalid cell reference {s:?}");
        }
        if (row_abs && digits.is_empty()) || (col_abs && letters.is_empty() && row_abs) {
            bail!("misplaced '$' in {s:?}");
        }

        let col = match letters {
            "" => None,
            name => Some(column_from_name(name).with_context(|| format!("invalid column {name:?}"))?),
        };
        let row = match digits {
            "" => None,
            digits => {
                let row: i64 = digits.parse().with_context(|| format!("invalid row {digits:?}"))?;
                if !is_valid_coord(row) {
                    bail!("invalid row {row}");
                }
                Some(row)
            }
        };
        Ok(RefEnd { col, row })
    }
}

fn parse_range(part: &str, tables: &TableMap) -> Result<CellRange> {
    if part == "*" {
        return Ok(CellRange::All);
    }
    if let Some(table) = tables.iter().find(|t| t.name.eq_ignore_ascii_case(part)) {
        return Ok(CellRange::Table(TableRange {
            name: table.name.clone(),
            columns: None,
            footprint: table.footprint,
        }));
    }

    let (start, end) = match part.split_once(':') {
        Some((start, end)) => (RefEnd::parse(start)?, Some(end)),
        None => (RefEnd::parse(part)?, None),
    };
    // "B" alone is column B, "5" alone is row 5
    let end = match end {
        None => Some(start),
        Some("") => None,
        Some(end) => Some(RefEnd::parse(end)?),
    };

    let range = match (start.col, start.row, end) {
        // Open end: to the edge of the sheet
        (Some(col), None, None) => CellRange::Columns {
            min: col,
            max: UNBOUNDED,
            from_row: 1,
        },
        (None, Some(row), None) => CellRange::Rows {
            min: row,
            max: UNBOUNDED,
            from_col: 1,
        },
        (Some(col), Some(row), None) => CellRange::from_rect(Rect {
            min: Pos::new(col, row),
            max: Pos::new(UNBOUNDED, UNBOUNDED),
        }),
        (Some(col), Some(row), Some(RefEnd { col: Some(x), row: Some(y) })) => {
            CellRange::from_corners(Pos::new(col, row), Pos::new(x, y))
        }
        (Some(a), start_row, Some(RefEnd { col: Some(b), row: None })) => CellRange::Columns {
            min: a.min(b),
            max: a.max(b),
            from_row: start_row.unwrap_or(1),
        },
        (start_col, Some(a), Some(RefEnd { col: None, row: Some(b) })) => CellRange::Rows {
            min: a.min(b),
            max: a.max(b),
            from_col: start_col.unwrap_or(1),
        },
        _ => bail!("unsupported range {part:?}"),
    };
    Ok(range)
}

fn range_to_a1(range: &CellRange, out: &mut String) {
    let bound = |v: i64, render: &dyn Fn(i64) -> String| if v == UNBOUNDED { String::new() } else { render(v) };
    let (start, end) = match range {
        CellRange::All => {
            out.push('*');
            return;
        }
        CellRange::Table(table) if table.columns.is_none() => {
            out.push_str(&table.name);
            return;
        }
        // Column spans of a table print as their cells
        CellRange::Table(table) => (cell_name(table.footprint.min), cell_name(table.footprint.max)),
        CellRange::Rect(rect) => (cell_name(rect.min), cell_name(rect.max)),
        CellRange::Columns { min, max, from_row } => {
            let start = if *from_row > 1 {
                cell_name(Pos::new(*min, *from_row))
            } else {
                column_name(*min)
            };
            (start, bound(*max, &column_name))
        }
        CellRange::Rows { min, max, from_col } => {
            let start = if *from_col > 1 {
                cell_name(Pos::new(*from_col, *min))
            } else {
                min.to_string()
            };
            (start, bound(*max, &|v| v.to_string()))
        }
    };
    out.push_str(&start);
    if start != end {
        out.push(':');
        out.push_str(&end);
    }
}

impl Selection {
    /// Parse A1 notation; the last range becomes active with the cursor on
    /// its top-left cell.
    pub fn from_a1(a1: &str, sheet_id: SheetId, tables: &TableMap) -> Result<Selection> {
        let ranges = a1
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| parse_range(part, tables))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("invalid selection {a1:?}"))?;
        let Some(last) = ranges.last() else {
            bail!("empty selection {a1:?}");
        };
        let cursor = last.to_rect().min;
        Ok(Selection {
            sheet_id,
            active: ranges.len() - 1,
            ranges,
            anchor: cursor,
            cursor,
        })
    }

    pub fn to_a1(&self) -> String {
        let mut out = String::new();
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            range_to_a1(range, &mut out);
        }
        out
    }

    /// The cursor cell, e.g. `C5`
    pub fn to_cursor_a1(&self) -> String {
        cell_name(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::table::{TableKind, TableRegion};

    fn parse(a1: &str) -> Result<Selection> {
        Selection::from_a1(a1, SheetId::from("s1"), &TableMap::default())
    }

    fn ranges(a1: &str) -> Vec<CellRange> {
        parse(a1).expect("parses").ranges().to_vec()
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(1), "A");
        assert_eq!(column_name(26), "Z");
        assert_eq!(column_name(27), "AA");
        assert_eq!(column_name(703), "AAA");
        assert_eq!(column_name(0), "");
        assert_eq!(column_from_name("A"), Some(1));
        assert_eq!(column_from_name("aa"), Some(27));
        assert_eq!(column_from_name("AAA"), Some(703));
        assert_eq!(column_from_name(""), None);
        assert_eq!(column_from_name("A1"), None);
        assert_eq!(column_from_name("ZZZZZZZZZZZZZZZZ"), None);
    }

    #[test]
    fn test_parse_range_kinds() {
        assert_eq!(ranges("B5"), vec![CellRange::cell(Pos::new(2, 5))]);
        assert_eq!(ranges("C3:A1"), vec![CellRange::Rect(Rect::new(1, 1, 3, 3))]);
        assert_eq!(ranges("B:D"), vec![CellRange::lines(crate::geometry::Axis::Column, 2, 4)]);
        assert_eq!(ranges("D"), vec![CellRange::lines(crate::geometry::Axis::Column, 4, 4)]);
        assert_eq!(ranges("5:3"), vec![CellRange::lines(crate::geometry::Axis::Row, 3, 5)]);
        assert_eq!(
            ranges("B5:D"),
            vec![CellRange::Columns {
                min: 2,
                max: 4,
                from_row: 5
            }]
        );
        assert_eq!(
            ranges("C3:5"),
            vec![CellRange::Rows {
                min: 3,
                max: 5,
                from_col: 3
            }]
        );
        assert_eq!(ranges("*"), vec![CellRange::All]);
        assert_eq!(ranges("A1:"), vec![CellRange::All]);
        assert_eq!(
            ranges("C:"),
            vec![CellRange::Columns {
                min: 3,
                max: UNBOUNDED,
                from_row: 1
            }]
        );
    }

    #[test]
    fn test_absolute_markers_are_dropped() {
        assert_eq!(ranges("$B$2:$C3"), ranges("B2:C3"));
        assert_eq!(ranges("$5"), ranges("5"));
    }

    #[test]
    fn test_multiple_ranges_last_is_active() {
        let selection = parse("A1, c3:d4 ,F").expect("parses");
        assert_eq!(selection.ranges().len(), 3);
        assert_eq!(selection.active_index(), 2);
        assert_eq!(selection.cursor(), Pos::new(6, 1));
        assert_eq!(selection.to_cursor_a1(), "F1");
        assert_eq!(selection.to_a1(), "A1,C3:D4,F");
    }

    #[test]
    fn test_rejects_bad_references() {
        for bad in ["", "A0", "1A", "A1:B2:C3", "$", "A$", "$$5", "B:A1", "A-1", "!"] {
            assert!(parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_to_a1_forms() {
        let mut selection = parse("A1").expect("parses");
        assert_eq!(selection.to_a1(), "A1");
        selection.ranges = vec![
            CellRange::Rect(Rect::new(1, 1, 2, 2)),
            CellRange::lines(crate::geometry::Axis::Row, 3, 3),
            CellRange::Rows {
                min: 4,
                max: UNBOUNDED,
                from_col: 1,
            },
            CellRange::Columns {
                min: 2,
                max: 2,
                from_row: 5,
            },
            CellRange::All,
        ];
        assert_eq!(selection.to_a1(), "A1:B2,3,4:,B5:B,*");
    }

    #[test]
    fn test_to_a1_reparses_to_same_ranges() {
        for a1 in ["A1:B2,3,4:,B5:B,*", "AA10:AB12", "C:E,2:9", "B3:"] {
            let selection = parse(a1).expect("parses");
            assert_eq!(parse(&selection.to_a1()).expect("reparses").ranges(), selection.ranges());
        }
    }

    #[test]
    fn test_table_names() {
        let tables = TableMap::new(vec![TableRegion::new("Sales", Rect::new(3, 3, 5, 9), TableKind::Import)]);
        let selection = Selection::from_a1("sales,A1", SheetId::from("s1"), &tables).expect("parses");
        let CellRange::Table(table) = &selection.ranges()[0] else {
            panic!("expected a table range");
        };
        assert_eq!(table.name, "Sales");
        assert_eq!(table.footprint, Rect::new(3, 3, 5, 9));
        assert_eq!(selection.to_a1(), "Sales,A1");
        // Without the table the name reads as a column
        assert!(parse("Sales").expect("column").ranges()[0].is_line_range());
    }
}
