//! Sheet registry
//!
//! Owns every sheet together with its cursor and tracks which sheet is shown.

use crate::render::dirty::DirtyFlags;

use super::cursor::Cursor;
use super::offsets::SheetOffsets;
use super::sheet::{Sheet, SheetId, SheetInfo};

/// A sheet and the cursor that lives and dies with it
#[derive(Debug, Clone)]
pub struct SheetEntry {
    pub sheet: Sheet,
    pub cursor: Cursor,
}

#[derive(Debug)]
pub struct Sheets {
    entries: Vec<SheetEntry>,
    current: Option<SheetId>,
    default_offsets: SheetOffsets,
    dirty: DirtyFlags,
}

impl Sheets {
    pub fn new(default_offsets: SheetOffsets, dirty: DirtyFlags) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            default_offsets,
            dirty,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sheet ids in display order
    pub fn ids(&self) -> impl Iterator<Item = &SheetId> {
        self.entries.iter().map(|e| &e.sheet.id)
    }

    pub fn current_id(&self) -> Option<&SheetId> {
        self.current.as_ref()
    }

    pub fn get(&self, id: &SheetId) -> Option<&SheetEntry> {
        self.entries.iter().find(|e| &e.sheet.id == id)
    }

    pub fn get_mut(&mut self, id: &SheetId) -> Option<&mut SheetEntry> {
        self.entries.iter_mut().find(|e| &e.sheet.id == id)
    }

    pub fn current(&self) -> Option<&SheetEntry> {
        let id = self.current.as_ref()?;
        self.get(id)
    }

    pub fn current_mut(&mut self) -> Option<&mut SheetEntry> {
        let id = self.current.clone()?;
        self.get_mut(&id)
    }

    /// Adds a sheet from a snapshot, or overwrites the existing one.
    ///
    /// The first sheet added becomes current.
    pub fn upsert(&mut self, info: SheetInfo) {
        let is_current = self.current.as_ref() == Some(&info.id);
        if let Some(entry) = self.get_mut(&info.id) {
            entry.sheet.apply_info(info);
            let tables = entry.sheet.tables.clone();
            entry.cursor.refresh_tables(&tables);
            if is_current {
                self.dirty.mark_all();
            }
            return;
        }

        let id = info.id.clone();
        let sheet = Sheet::from_info(info, &self.default_offsets);
        tracing::debug!(sheet = %id, name = %sheet.name, "sheet added");
        self.entries.push(SheetEntry {
            cursor: Cursor::new(id.clone(), self.dirty.clone()),
            sheet,
        });
        self.entries.sort_by(|a, b| a.sheet.order.cmp(&b.sheet.order));

        if self.current.is_none() {
            self.current = Some(id);
            self.dirty.mark_all();
        }
    }

    /// Removes a sheet (and its cursor). The first remaining sheet becomes
    /// current if the removed one was.
    pub fn remove(&mut self, id: &SheetId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.sheet.id != id);
        if self.entries.len() == before {
            return false;
        }
        if self.current.as_ref() == Some(id) {
            self.current = self.entries.first().map(|e| e.sheet.id.clone());
            self.dirty.mark_all();
        }
        true
    }

    /// Shows another sheet. Returns false for unknown ids.
    pub fn set_current(&mut self, id: &SheetId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if self.current.as_ref() != Some(id) {
            self.current = Some(id.clone());
            self.dirty.mark_all();
        }
        true
    }
}
