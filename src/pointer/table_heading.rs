//! Table name row and column headers
//!
//! A press on the name row selects the table and can drag it elsewhere; a
//! press on a column header selects that table column, or opens its menu
//! when it lands on the dropdown at the header's right edge.

use crate::events::{Event, GestureKind};
use crate::geometry::Pos;
use crate::model::{AppModel, TableRegion};
use crate::pointer::cell_move::MoveGesture;
use crate::pointer::{Button, Claim, PointerEvent, PointerHandler};
use crate::selection::CellRange;

/// Width of the column header dropdown, in screen pixels
const DROPDOWN_WIDTH: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableHit {
    NameRow,
    ColumnHeader(u32),
    Dropdown(u32),
}

/// What part of `table` the press at `cell` / `world_x` landed on
pub fn hit_test(model: &AppModel, table: &TableRegion, cell: Pos, world_x: f64) -> Option<TableHit> {
    if table.name_row().is_some_and(|r| r.contains(cell)) {
        return Some(TableHit::NameRow);
    }
    if !table.column_header_row().is_some_and(|r| r.contains(cell)) {
        return None;
    }
    let column = (cell.x - table.footprint.min.x) as u32;
    let right = model
        .current()?
        .sheet
        .offsets
        .columns
        .position(cell.x + 1);
    if world_x >= right - DROPDOWN_WIDTH / model.viewport.scale() {
        Some(TableHit::Dropdown(column))
    } else {
        Some(TableHit::ColumnHeader(column))
    }
}

#[derive(Debug, Default)]
pub struct TableHeadingHandler {
    gesture: Option<MoveGesture>,
}

impl TableHeadingHandler {
    fn select_column(model: &mut AppModel, table: &TableRegion, column: u32, event: &PointerEvent) {
        let Some(entry) = model.current_mut() else {
            return;
        };
        let columns = if event.modifiers.shift {
            match entry.cursor.selection().active_range() {
                CellRange::Table(t) if t.name == table.name => {
                    let (first, last) = t.columns.unwrap_or((0, table.column_count().saturating_sub(1)));
                    Some((first.min(last).min(column), first.max(last).max(column)))
                }
                _ => Some((column, column)),
            }
        } else {
            Some((column, column))
        };
        entry.cursor.select_table(table, columns, event.modifiers.ctrl);
    }
}

impl PointerHandler for TableHeadingHandler {
    fn name(&self) -> &'static str {
        "table_heading"
    }

    fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        if event.button != Button::Left || !event.in_cells(model) {
            return Claim::Pass;
        }
        let Some(cell) = event.cell(model) else {
            return Claim::Pass;
        };
        let Some(table) = model
            .current()
            .and_then(|entry| entry.sheet.tables.at(cell))
            .cloned()
        else {
            return Claim::Pass;
        };
        let Some(hit) = hit_test(model, &table, cell, event.world.x) else {
            return Claim::Pass;
        };
        tracing::debug!(table = %table.name, ?hit, "table heading press");

        match hit {
            TableHit::NameRow => {
                let Some(entry) = model.current_mut() else {
                    return Claim::Pass;
                };
                let before = entry.cursor.selection().clone();
                entry.cursor.select_table(&table, None, event.modifiers.ctrl);
                if !model.is_restricted() && !event.modifiers.ctrl {
                    self.gesture = Some(
                        MoveGesture::new(GestureKind::TableMove, table.footprint, cell, event.screen)
                            .restoring(before),
                    );
                }
            }
            TableHit::ColumnHeader(column) => Self::select_column(model, &table, column, event),
            TableHit::Dropdown(column) => {
                Self::select_column(model, &table, column, event);
                model.events.emit(&Event::TableMenuRequested {
                    table: table.name.clone(),
                    column,
                });
            }
        }
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

    fn pointer_up(&mut self, model: &mut AppModel, _event: &PointerEvent) -> Claim {
        match self.gesture.take() {
            Some(gesture) => Claim::with(gesture.drop(model)),
            None => Claim::Pass,
        }
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
