//! Presence traffic in both directions

use crate::commands::Cmd;
use crate::events::Event;
use crate::messages::PresenceMsg;
use crate::model::AppModel;

pub fn update_presence(model: &mut AppModel, msg: PresenceMsg) -> Option<Cmd> {
    let changed = match msg {
        PresenceMsg::Update {
            session,
            name,
            color,
            token,
            camera,
        } => model.presence.update(&session, &name, color, &token, camera),
        PresenceMsg::Leave { session } => model.presence.leave(&session),
    };
    if !changed {
        return None;
    }
    model.events.emit(&Event::RemoteCursorsChanged);
    Some(Cmd::Redraw)
}

/// Broadcast the local cursor and camera if either changed since the last send
pub fn outbound_presence(model: &mut AppModel) -> Option<Cmd> {
    if !model.ready {
        return None;
    }
    let camera = model.viewport.snapshot();
    let entry = model.sheets.current()?;
    model
        .presence
        .outbound(&entry.cursor, camera)
        .map(Cmd::SendPresence)
}
