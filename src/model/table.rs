//! Table regions (code output and imported data tables)

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Pos, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Output of a code cell; its interior is never directly editable
    Code,
    Import,
}

/// A table laid out on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    pub name: String,
    pub footprint: Rect,
    pub kind: TableKind,
    #[serde(default)]
    pub first_row_header: bool,
    #[serde(default = "default_true")]
    pub show_name: bool,
    #[serde(default = "default_true")]
    pub show_columns: bool,
    #[serde(default)]
    pub alternating_colors: bool,
    #[serde(default)]
    pub read_only: bool,
}

fn default_true() -> bool {
    true
}

impl TableRegion {
    pub fn new(name: impl Into<String>, footprint: Rect, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            footprint,
            kind,
            first_row_header: false,
            show_name: true,
            show_columns: true,
            alternating_colors: false,
            read_only: false,
        }
    }

    /// The name row, when shown
    pub fn name_row(&self) -> Option<Rect> {
        self.show_name.then(|| Rect {
            min: self.footprint.min,
            max: Pos::new(self.footprint.max.x, self.footprint.min.y),
        })
    }

    /// Name row plus the column header row
    pub fn header_rows(&self) -> Option<Rect> {
        let count = self.show_name as i64 + self.show_columns as i64;
        if count == 0 {
            return None;
        }
        let last = (self.footprint.min.y + count - 1).min(self.footprint.max.y);
        Some(Rect {
            min: self.footprint.min,
            max: Pos::new(self.footprint.max.x, last),
        })
    }

    /// Row of column headings, when shown
    pub fn column_header_row(&self) -> Option<Rect> {
        if !self.show_columns {
            return None;
        }
        let y = self.footprint.min.y + self.show_name as i64;
        (y <= self.footprint.max.y).then(|| Rect::new(self.footprint.min.x, y, self.footprint.max.x, y))
    }

    /// Data cells below the headers
    pub fn interior(&self) -> Option<Rect> {
        let top = match self.header_rows() {
            Some(h) => h.max.y + 1,
            None => self.footprint.min.y,
        };
        (top <= self.footprint.max.y).then(|| Rect {
            min: Pos::new(self.footprint.min.x, top),
            max: self.footprint.max,
        })
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only || self.kind == TableKind::Code
    }

    pub fn column_count(&self) -> u32 {
        self.footprint.width() as u32
    }

    /// Footprint of a table column span below the name row, or the whole table
    pub fn resolve_columns(&self, columns: Option<(u32, u32)>) -> Option<Rect> {
        let Some((first, last)) = columns else {
            return Some(self.footprint);
        };
        let (first, last) = (first.min(last), first.max(last));
        if last >= self.column_count() {
            return None;
        }
        let top = self.footprint.min.y + self.show_name as i64;
        Some(Rect::new(
            self.footprint.min.x + first as i64,
            top.min(self.footprint.max.y),
            self.footprint.min.x + last as i64,
            self.footprint.max.y,
        ))
    }

    /// True if the table covers lines on both sides of the boundary before `index`
    pub fn straddles(&self, axis: Axis, index: i64) -> bool {
        let (min, max) = self.footprint.span(axis);
        min < index && index <= max
    }
}

/// All tables of a sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableMap {
    tables: Vec<TableRegion>,
}

impl TableMap {
    pub fn new(tables: Vec<TableRegion>) -> Self {
        Self { tables }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableRegion> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TableRegion> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn at(&self, pos: Pos) -> Option<&TableRegion> {
        self.tables.iter().find(|t| t.footprint.contains(pos))
    }

    pub fn intersecting<'a>(&'a self, rect: &'a Rect) -> impl Iterator<Item = &'a TableRegion> {
        self.tables.iter().filter(move |t| t.footprint.intersects(rect))
    }

    /// Current footprint for a table range, None if the table is gone
    pub fn resolve(&self, name: &str, columns: Option<(u32, u32)>) -> Option<Rect> {
        self.get(name)?.resolve_columns(columns)
    }
}
