//! Keyboard selection handlers

use crate::commands::Cmd;
use crate::engine::EngineRequest;
use crate::geometry::Pos;
use crate::messages::CursorMsg;
use crate::model::AppModel;
use crate::selection::Selection;

/// Handle keyboard selection messages
pub fn update_cursor(model: &mut AppModel, msg: CursorMsg) -> Option<Cmd> {
    let entry = model.current_mut()?;
    let cursor = &mut entry.cursor;

    let changed = match msg {
        CursorMsg::Move(direction) => cursor.move_cursor(direction),
        CursorMsg::Extend(direction) => {
            if !cursor.extend(direction) {
                return None;
            }
            // Follow the moving edge, not the cursor (which stays on the anchor)
            let selection = cursor.selection();
            let rect = selection.active_rect();
            let anchor = selection.anchor();
            if rect.is_finite() {
                let far = Pos::new(
                    if rect.min.x == anchor.x { rect.max.x } else { rect.min.x },
                    if rect.min.y == anchor.y { rect.max.y } else { rect.min.y },
                );
                let bounds = entry.sheet.cell_bounds(far);
                model.viewport.ensure_visible(&bounds, model.now);
            }
            return Some(Cmd::Redraw);
        }
        CursorMsg::MoveTo { x, y } => cursor.move_to(x, y, false),
        CursorMsg::SelectAll => {
            cursor.select_all(false);
            return Some(Cmd::Redraw);
        }
        CursorMsg::SelectColumns => {
            cursor.set_columns_selected();
            return Some(Cmd::Redraw);
        }
        CursorMsg::SelectRows => {
            cursor.set_rows_selected();
            return Some(Cmd::Redraw);
        }
        CursorMsg::SelectTable { name, columns } => {
            let Some(table) = entry.sheet.tables.get(&name) else {
                tracing::debug!(%name, "no such table");
                return None;
            };
            entry.cursor.select_table(table, columns, false)
        }
        CursorMsg::Goto { a1 } => {
            let sheet_id = entry.cursor.selection().sheet_id().clone();
            match Selection::from_a1(&a1, sheet_id, &entry.sheet.tables) {
                Ok(selection) => entry.cursor.replace(selection),
                Err(err) => {
                    tracing::warn!(%a1, "go to failed: {err:#}");
                    return None;
                }
            }
        }
        CursorMsg::DeleteCells => {
            return Some(Cmd::engine(cursor.selection(), EngineRequest::DeleteCells));
        }
    };

    if !changed {
        return None;
    }
    model.ensure_cursor_visible();
    Some(Cmd::Redraw)
}
