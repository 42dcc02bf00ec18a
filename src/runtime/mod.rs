//! Runtime module - headless application shell
//!
//! - `app` - [`GridApp`], which wires the model to the pointer chain, the
//!   frame scheduler and the engine client
//! - `replay` - drives a [`GridApp`] from a YAML interaction script

pub mod app;
pub mod replay;

pub use app::GridApp;
pub use replay::{replay, ReplayReport, Replayer, Script, Step};
