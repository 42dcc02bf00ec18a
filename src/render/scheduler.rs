//! Frame scheduling
//!
//! One call to [`FrameScheduler::frame`] per display refresh. Only dirty
//! layers are rebuilt; the surface is presented at most once per frame.

use std::time::Instant;

use crate::events::Event;
use crate::model::AppModel;
use crate::render::dirty::Layer;
use crate::render::layers::LayerStack;
use crate::render::surface::DrawSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Paused or not ready; nothing touched, try again next frame
    Skipped,
    /// Nothing changed
    Idle,
    Redrawn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub presented: u64,
    pub idle: u64,
    pub skipped: u64,
    /// Rebuild count per layer, indexed by [`Layer::index`]
    pub layer_updates: [u64; Layer::COUNT],
}

impl FrameStats {
    pub fn updates(&self, layer: Layer) -> u64 {
        self.layer_updates[layer.index()]
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    layers: LayerStack,
    stats: FrameStats,
    last_scale: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Whether a frame would do any work
    pub fn wants_frame(model: &AppModel) -> bool {
        model.dirty.any() || model.viewport.is_animating() || model.viewport.has_changed()
    }

    pub fn frame(&mut self, model: &mut AppModel, surface: &mut dyn DrawSurface, now: Instant) -> FrameOutcome {
        if model.paused || !model.ready {
            self.stats.skipped += 1;
            return FrameOutcome::Skipped;
        }

        model.viewport.tick(now);
        let transform_changed = model.viewport.take_changed();
        if transform_changed {
            let scale = model.viewport.scale();
            if self.last_scale != Some(scale) {
                // Handle and marker sizes are scale-dependent
                model.dirty.mark_many(&[Layer::Cursor, Layer::RemoteCursors]);
                self.last_scale = Some(scale);
            }
            model.events.emit(&Event::ViewportChanged);
        }

        let mut updated = false;
        for layer in Layer::ALL {
            let force = transform_changed
                && match layer {
                    Layer::GridLines => self.layers.grid_needs_refresh(&model.viewport),
                    Layer::RemoteCursors => !model.presence.is_empty(),
                    other => Layer::VIEWPORT_RELATIVE.contains(&other),
                };
            if self.layers.update(layer, model, force) {
                self.stats.layer_updates[layer.index()] += 1;
                updated = true;
            }
        }

        if !updated && !transform_changed {
            self.stats.idle += 1;
            return FrameOutcome::Idle;
        }

        surface.clear(model.theme.background.to_argb_u32());
        self.layers.replay(surface, &model.viewport);
        surface.present();
        self.stats.presented += 1;
        tracing::trace!(presented = self.stats.presented, "frame presented");
        FrameOutcome::Redrawn
    }
}
