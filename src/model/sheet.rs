//! Sheet state mirrored from the engine

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, PixelRect, Point, Pos, Rect};

use super::offsets::SheetOffsets;
use super::table::TableMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(String);

impl SheetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SheetId {
    fn from(s: &str) -> Self {
        SheetId(s.to_string())
    }
}

impl From<String> for SheetId {
    fn from(s: String) -> Self {
        SheetId(s)
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedKind {
    Image,
    Html,
}

/// An image or HTML output anchored at a cell, sized in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedObject {
    pub kind: EmbeddedKind,
    pub anchor: Pos,
    pub width: f64,
    pub height: f64,
}

impl EmbeddedObject {
    pub fn world_rect(&self, offsets: &SheetOffsets) -> PixelRect {
        let origin = offsets.cell_rect(self.anchor);
        PixelRect::new(origin.x, origin.y, self.width, self.height)
    }
}

/// Widest (tallest) rendered content per column (row), for auto-size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentExtents {
    #[serde(default)]
    pub columns: BTreeMap<i64, f64>,
    #[serde(default)]
    pub rows: BTreeMap<i64, f64>,
}

impl ContentExtents {
    pub fn get(&self, axis: Axis, index: i64) -> Option<f64> {
        match axis {
            Axis::Column => self.columns.get(&index).copied(),
            Axis::Row => self.rows.get(&index).copied(),
        }
    }
}

/// Authoritative sheet snapshot as sent by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetInfo {
    pub id: SheetId,
    pub name: String,
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub offsets: Option<SheetOffsets>,
    #[serde(default)]
    pub content_bounds: Option<Rect>,
    #[serde(default)]
    pub tables: TableMap,
    #[serde(default)]
    pub merges: Vec<Rect>,
    #[serde(default)]
    pub embedded: Vec<EmbeddedObject>,
    #[serde(default)]
    pub content_extents: ContentExtents,
}

impl SheetInfo {
    /// Snapshot of an empty sheet with default sizes
    pub fn new(id: impl Into<SheetId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order: String::new(),
            offsets: None,
            content_bounds: None,
            tables: TableMap::default(),
            merges: Vec::new(),
            embedded: Vec::new(),
            content_extents: ContentExtents::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    pub order: String,
    pub offsets: SheetOffsets,
    /// Bounds of all non-empty cells, None for an empty sheet
    pub content_bounds: Option<Rect>,
    pub tables: TableMap,
    pub merges: Vec<Rect>,
    pub embedded: Vec<EmbeddedObject>,
    pub content_extents: ContentExtents,
}

impl Sheet {
    pub fn new(id: SheetId, name: impl Into<String>, offsets: SheetOffsets) -> Self {
        Self {
            id,
            name: name.into(),
            order: String::new(),
            offsets,
            content_bounds: None,
            tables: TableMap::default(),
            merges: Vec::new(),
            embedded: Vec::new(),
            content_extents: ContentExtents::default(),
        }
    }

    /// Build from a snapshot, using `default_offsets` when it carries none
    pub fn from_info(info: SheetInfo, default_offsets: &SheetOffsets) -> Self {
        Self {
            id: info.id,
            name: info.name,
            order: info.order,
            offsets: info.offsets.unwrap_or_else(|| default_offsets.clone()),
            content_bounds: info.content_bounds,
            tables: info.tables,
            merges: info.merges,
            embedded: info.embedded,
            content_extents: info.content_extents,
        }
    }

    /// Overwrite everything from a newer snapshot
    pub fn apply_info(&mut self, info: SheetInfo) {
        let offsets = info.offsets.clone().unwrap_or_else(|| self.offsets.clone());
        *self = Sheet::from_info(info, &offsets);
    }

    pub fn merge_at(&self, pos: Pos) -> Option<Rect> {
        self.merges.iter().find(|m| m.contains(pos)).copied()
    }

    pub fn cell_at(&self, world: Point) -> Pos {
        self.offsets.cell_at(world)
    }

    /// World rect of a cell, widened to its merged area if any
    pub fn cell_bounds(&self, pos: Pos) -> PixelRect {
        match self.merge_at(pos) {
            Some(merge) => self.offsets.rect_pixels(&merge),
            None => self.offsets.cell_rect(pos),
        }
    }

    pub fn embedded_at(&self, kind: EmbeddedKind, world: Point) -> Option<usize> {
        self.embedded
            .iter()
            .position(|o| o.kind == kind && o.world_rect(&self.offsets).contains(world))
    }
}
