//! Dirty-flag driven rendering: layers, surface and frame scheduling

pub mod dirty;
pub mod layers;
pub mod scheduler;
pub mod surface;

pub use dirty::{DirtyFlags, Layer};
pub use layers::LayerStack;
pub use scheduler::{FrameOutcome, FrameScheduler, FrameStats};
pub use surface::{DrawOp, DrawSurface, RecordingSurface};
