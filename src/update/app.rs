//! App message handlers (window events, sheet switching)

use crate::commands::Cmd;
use crate::events::Event;
use crate::messages::AppMsg;
use crate::model::{AppModel, SheetId};

/// Handle app messages (window events, sheet switching)
pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Resize { width, height } => {
            model.viewport.resize(width, height);
            Some(Cmd::Redraw)
        }

        AppMsg::SwitchSheet(id) => switch_sheet(model, &id).then_some(Cmd::Redraw),

        AppMsg::Pause => {
            model.paused = true;
            None
        }

        AppMsg::Resume => {
            model.paused = false;
            // Whatever changed while hidden was never drawn
            model.dirty.mark_all();
            Some(Cmd::Redraw)
        }
    }
}

/// Show another sheet, keeping each sheet's camera with its cursor.
///
/// Returns false if the sheet is unknown or already shown.
pub fn switch_sheet(model: &mut AppModel, id: &SheetId) -> bool {
    if model.sheets.current_id() == Some(id) {
        return false;
    }
    if model.sheets.get(id).is_none() {
        tracing::warn!(sheet = %id, "switch to unknown sheet");
        return false;
    }

    let camera = model.viewport.snapshot();
    if let Some(entry) = model.current_mut() {
        entry.cursor.camera = Some(camera);
    }
    model.sheets.set_current(id);
    show_current(model);
    true
}

/// Restores the camera saved for the current sheet (or resets it) and
/// announces the switch
pub(super) fn show_current(model: &mut AppModel) {
    let Some(entry) = model.current() else {
        return;
    };
    let sheet = entry.sheet.id.clone();
    match entry.cursor.camera {
        Some(camera) => model.viewport.restore(camera),
        None => model.viewport.reset(),
    }
    tracing::debug!(%sheet, "sheet switched");
    model.events.emit(&Event::SheetSwitched { sheet });
}
