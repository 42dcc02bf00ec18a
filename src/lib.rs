//! sheetview - interaction core of a canvas spreadsheet grid
//!
//! Selection model, pointer gesture machines, dirty-flag render scheduling and
//! the viewport camera, wired together in the Elm Architecture: state lives in
//! [`AppModel`], [`update`](update::update) transforms it and returns
//! [`Cmd`]s for the runtime to execute.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod messages;
pub mod model;
pub mod pointer;
pub mod presence;
pub mod render;
pub mod runtime;
pub mod selection;
pub mod structural;
pub mod theme;
pub mod tracing;
pub mod update;
pub mod viewport;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::GridConfig;
pub use messages::Msg;
pub use model::AppModel;
pub use runtime::GridApp;
pub use selection::{CellRange, Selection};
pub use theme::Theme;
