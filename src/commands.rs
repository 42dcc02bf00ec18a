//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::engine::{EngineCall, EngineRequest};
use crate::presence::PresenceOut;
use crate::selection::Selection;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a frame
    Redraw,
    /// Send a request to the engine
    Engine(EngineCall),
    /// Broadcast local cursor/camera to other users
    SendPresence(PresenceOut),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    pub fn engine(selection: &Selection, request: EngineRequest) -> Self {
        Cmd::Engine(EngineCall::new(selection, request))
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            // Engine replies arrive as messages and redraw then
            Cmd::Engine(_) => false,
            Cmd::SendPresence(_) => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Flatten nested batches, dropping `None`
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }

    /// Engine calls contained in this command, in order
    pub fn engine_calls(&self) -> Vec<&EngineCall> {
        match self {
            Cmd::Engine(call) => vec![call],
            Cmd::Batch(cmds) => cmds.iter().flat_map(Cmd::engine_calls).collect(),
            _ => Vec::new(),
        }
    }
}

/// Merge two optional commands into one
pub fn merge(a: Option<Cmd>, b: Option<Cmd>) -> Option<Cmd> {
    match (a, b) {
        (None, None) => None,
        (Some(cmd), None) | (None, Some(cmd)) => Some(cmd),
        (Some(a), Some(b)) => Some(Cmd::Batch(vec![a, b])),
    }
}
