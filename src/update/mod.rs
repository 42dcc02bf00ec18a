//! Update functions for the Elm-style architecture
//!
//! All state transformations that are not pointer gestures flow through these
//! functions.

mod app;
mod cursor;
mod engine;
mod presence;
mod structural;
mod table;
mod viewport;

use crate::commands::{merge, Cmd};
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::{switch_sheet, update_app};
pub use cursor::update_cursor;
pub use engine::update_engine;
pub use presence::{outbound_presence, update_presence};
pub use structural::update_structural;
pub use table::update_table;
pub use viewport::update_viewport;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let result = match msg {
        Msg::Cursor(m) => cursor::update_cursor(model, m),
        Msg::Viewport(m) => viewport::update_viewport(model, m),
        Msg::Structural(m) => structural::update_structural(model, m),
        Msg::Table(m) => table::update_table(model, m),
        Msg::Engine(m) => engine::update_engine(model, m),
        Msg::Presence(m) => presence::update_presence(model, m),
        Msg::App(m) => app::update_app(model, m),
    };

    merge(result, presence::outbound_presence(model))
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after selection state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = model.current().map(|e| SelectionSnapshot::from_cursor(&e.cursor));

    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    if let (Some(before), Some(entry)) = (&before, model.current()) {
        let after = SelectionSnapshot::from_cursor(&entry.cursor);
        if let Some(diff) = before.diff(&after) {
            debug!(target: "selection", %diff, "state changed");
        }
    }

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Cursor::Move(Up)`
/// - `Viewport::ZoomIn`
/// - `App::Resize { width: 800.0, height: 600.0 }`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Cursor(m) => format!("Cursor::{:?}", m),
        Msg::Viewport(m) => format!("Viewport::{:?}", m),
        Msg::Structural(m) => format!("Structural::{:?}", m),
        Msg::Table(m) => format!("Table::{:?}", m),
        // Snapshots can be large; the variant is enough
        Msg::Engine(m) => format!("Engine::{}", engine::variant_name(m)),
        Msg::Presence(m) => format!("Presence::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}
