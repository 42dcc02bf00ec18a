//! Engine snapshots
//!
//! The engine is authoritative: whatever it sends overwrites local state,
//! including provisional changes made while a request was in flight.

use crate::commands::Cmd;
use crate::engine::ResizeAck;
use crate::events::Event;
use crate::messages::EngineMsg;
use crate::model::AppModel;
use crate::pointer::header::AUTO_SIZE_LABEL;
use crate::selection::Selection;

use super::app::{show_current, switch_sheet};

pub(crate) fn variant_name(msg: &EngineMsg) -> &'static str {
    match msg {
        EngineMsg::SheetInfo(_) => "SheetInfo",
        EngineMsg::SheetDeleted { .. } => "SheetDeleted",
        EngineMsg::OffsetsChanged { .. } => "OffsetsChanged",
        EngineMsg::TablesChanged { .. } => "TablesChanged",
        EngineMsg::ContentBounds { .. } => "ContentBounds",
        EngineMsg::CursorRestore { .. } => "CursorRestore",
        EngineMsg::ResizeAck { .. } => "ResizeAck",
    }
}

pub fn update_engine(model: &mut AppModel, msg: EngineMsg) -> Option<Cmd> {
    tracing::trace!(msg = variant_name(&msg), "engine snapshot");
    match msg {
        EngineMsg::SheetInfo(info) => {
            let had_current = model.sheets.current_id().is_some();
            model.sheets.upsert(info);
            model.ready = true;
            if !had_current {
                show_current(model);
            }
            Some(Cmd::Redraw)
        }

        EngineMsg::SheetDeleted { sheet_id } => {
            let was_current = model.sheets.current_id() == Some(&sheet_id);
            if !model.sheets.remove(&sheet_id) {
                return None;
            }
            model.presence.forget_sheet(&sheet_id);
            if was_current {
                show_current(model);
            }
            Some(Cmd::Redraw)
        }

        EngineMsg::OffsetsChanged { sheet_id, offsets } => {
            let is_current = model.sheets.current_id() == Some(&sheet_id);
            let Some(entry) = model.sheets.get_mut(&sheet_id) else {
                tracing::warn!(sheet = %sheet_id, "offsets for unknown sheet");
                return None;
            };
            entry.sheet.offsets = offsets;
            model.pending.finish_labeled(AUTO_SIZE_LABEL);
            if is_current {
                model.dirty.mark_all();
            }
            model.events.emit(&Event::OffsetsChanged { sheet: sheet_id });
            is_current.then_some(Cmd::Redraw)
        }

        EngineMsg::TablesChanged { sheet_id, tables } => {
            let is_current = model.sheets.current_id() == Some(&sheet_id);
            let Some(entry) = model.sheets.get_mut(&sheet_id) else {
                tracing::warn!(sheet = %sheet_id, "tables for unknown sheet");
                return None;
            };
            entry.cursor.refresh_tables(&tables);
            entry.sheet.tables = tables;
            if is_current {
                model.dirty.mark_all();
            }
            model.events.emit(&Event::TablesChanged { sheet: sheet_id });
            is_current.then_some(Cmd::Redraw)
        }

        EngineMsg::ContentBounds { sheet_id, bounds } => {
            let entry = model.sheets.get_mut(&sheet_id)?;
            entry.sheet.content_bounds = bounds;
            None
        }

        EngineMsg::CursorRestore { token } => {
            let selection = match Selection::load(&token) {
                Ok(selection) => selection,
                Err(e) => {
                    tracing::warn!("ignoring cursor restore: {:#}", e);
                    return None;
                }
            };
            let sheet_id = selection.sheet_id().clone();
            if model.sheets.get(&sheet_id).is_none() {
                tracing::warn!(sheet = %sheet_id, "cursor restore for unknown sheet");
                return None;
            }
            switch_sheet(model, &sheet_id);
            let entry = model.sheets.get_mut(&sheet_id)?;
            entry.cursor.replace(selection);
            model.ensure_cursor_visible();
            Some(Cmd::Redraw)
        }

        EngineMsg::ResizeAck { payload } => {
            let ack = match ResizeAck::parse(&payload) {
                Ok(ack) => ack,
                Err(e) => {
                    tracing::warn!("{:#}", e);
                    return None;
                }
            };
            let is_current = model.sheets.current_id() == Some(&ack.sheet_id);
            let entry = model.sheets.get_mut(&ack.sheet_id)?;
            let sizes = entry.sheet.offsets.axis_mut(ack.axis);
            if sizes.size(ack.index) == ack.size {
                return None;
            }
            sizes.set_size(ack.index, ack.size);
            if is_current {
                model.dirty.mark_all();
                return Some(Cmd::Redraw);
            }
            None
        }
    }
}
