//! Per-layer dirty flags
//!
//! Producers mark layers through a cloned [`DirtyFlags`] handle; the frame
//! scheduler is the only consumer that clears them.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Drawable layers, in paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    GridLines,
    Headings,
    SelectionFill,
    Cursor,
    RemoteCursors,
    MovingCells,
    ColumnRowOverlay,
}

impl Layer {
    pub const COUNT: usize = 7;

    pub const ALL: [Layer; Layer::COUNT] = [
        Layer::GridLines,
        Layer::Headings,
        Layer::SelectionFill,
        Layer::Cursor,
        Layer::RemoteCursors,
        Layer::MovingCells,
        Layer::ColumnRowOverlay,
    ];

    /// Layers that depend on the local selection
    pub const CURSOR_DEPENDENT: [Layer; 4] = [
        Layer::Cursor,
        Layer::SelectionFill,
        Layer::Headings,
        Layer::ColumnRowOverlay,
    ];

    /// Layers positioned relative to the viewport; redrawn on any camera change
    pub const VIEWPORT_RELATIVE: [Layer; 3] =
        [Layer::Headings, Layer::SelectionFill, Layer::ColumnRowOverlay];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::GridLines => "grid_lines",
            Layer::Headings => "headings",
            Layer::SelectionFill => "selection_fill",
            Layer::Cursor => "cursor",
            Layer::RemoteCursors => "remote_cursors",
            Layer::MovingCells => "moving_cells",
            Layer::ColumnRowOverlay => "column_row_overlay",
        }
    }
}

/// Shared handle to one boolean per [`Layer`]
#[derive(Clone)]
pub struct DirtyFlags {
    flags: Rc<[Cell<bool>; Layer::COUNT]>,
}

impl DirtyFlags {
    /// All layers start dirty so the first frame paints everything
    pub fn new() -> Self {
        Self {
            flags: Rc::new(std::array::from_fn(|_| Cell::new(true))),
        }
    }

    pub fn mark(&self, layer: Layer) {
        self.flags[layer.index()].set(true);
    }

    pub fn mark_many(&self, layers: &[Layer]) {
        for layer in layers {
            self.mark(*layer);
        }
    }

    pub fn mark_all(&self) {
        self.mark_many(&Layer::ALL);
    }

    /// Selection changed
    pub fn mark_cursor(&self) {
        self.mark_many(&Layer::CURSOR_DEPENDENT);
    }

    pub fn is_dirty(&self, layer: Layer) -> bool {
        self.flags[layer.index()].get()
    }

    pub fn any(&self) -> bool {
        self.flags.iter().any(Cell::get)
    }

    /// Clears the flag, returning whether it was set
    pub(crate) fn take(&self, layer: Layer) -> bool {
        self.flags[layer.index()].replace(false)
    }

    /// Clears every flag (for tests and freshly restored state)
    pub fn clear_all(&self) {
        for flag in self.flags.iter() {
            flag.set(false);
        }
    }

    pub fn dirty_layers(&self) -> Vec<Layer> {
        Layer::ALL.into_iter().filter(|l| self.is_dirty(*l)).collect()
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DirtyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyFlags")
            .field("dirty", &self.dirty_layers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flags() {
        let flags = DirtyFlags::new();
        flags.clear_all();
        let producer = flags.clone();
        producer.mark(Layer::Cursor);
        assert!(flags.is_dirty(Layer::Cursor));
        assert!(!flags.is_dirty(Layer::GridLines));
        assert!(flags.take(Layer::Cursor));
        assert!(!producer.any());
    }

    #[test]
    fn test_mark_cursor_marks_dependents_only() {
        let flags = DirtyFlags::new();
        flags.clear_all();
        flags.mark_cursor();
        assert_eq!(
            flags.dirty_layers(),
            vec![
                Layer::Headings,
                Layer::SelectionFill,
                Layer::Cursor,
                Layer::ColumnRowOverlay
            ]
        );
    }
}
