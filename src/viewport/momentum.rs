//! Coasting after a pan gesture
//!
//! Camera positions are sampled while the pan is live. On release the
//! velocity over the last 100ms carries the camera on, decaying by
//! `friction` every 16ms until it drops below `min_speed`.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Decay period (one 60Hz frame, ms)
const PERIOD_MS: f64 = 16.0;

/// Only samples this recent count towards the release velocity
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

const MAX_SAMPLES: usize = 60;

#[derive(Debug, Clone, Copy)]
struct Sample {
    left: f64,
    top: f64,
    at: Instant,
}

#[derive(Debug, Clone)]
pub struct Momentum {
    friction: f64,
    /// Screen px per ms
    min_speed: f64,
    panning: bool,
    samples: VecDeque<Sample>,
    /// World px per ms, with the time of the last step
    velocity: Option<((f64, f64), Instant)>,
}

impl Momentum {
    pub fn new(friction: f64, min_speed: f64) -> Self {
        Self {
            friction: friction.min(0.999),
            min_speed,
            panning: false,
            samples: VecDeque::with_capacity(MAX_SAMPLES),
            velocity: None,
        }
    }

    pub fn is_coasting(&self) -> bool {
        self.velocity.is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// World px per ms
    pub fn velocity(&self) -> Option<(f64, f64)> {
        self.velocity.map(|(v, _)| v)
    }

    /// Pointer went down on the canvas: stop and start sampling
    pub fn begin(&mut self, left: f64, top: f64, now: Instant) {
        self.stop();
        self.panning = true;
        self.record(left, top, now);
    }

    pub fn record(&mut self, left: f64, top: f64, now: Instant) {
        if !self.panning {
            return;
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { left, top, at: now });
    }

    /// Pointer released; starts coasting if the pan was still moving
    pub fn release(&mut self, left: f64, top: f64, now: Instant) {
        if !self.panning {
            return;
        }
        self.panning = false;
        if self.friction <= 0.0 {
            self.samples.clear();
            return;
        }
        let recent = self
            .samples
            .iter()
            .find(|s| now.saturating_duration_since(s.at) <= VELOCITY_WINDOW);
        if let Some(sample) = recent {
            let dt = now.saturating_duration_since(sample.at).as_secs_f64() * 1000.0;
            if dt > 0.0 {
                let velocity = ((left - sample.left) / dt, (top - sample.top) / dt);
                tracing::trace!(?velocity, "pan released");
                self.velocity = Some((velocity, now));
            }
        }
        self.samples.clear();
    }

    pub fn stop(&mut self) {
        self.velocity = None;
        self.panning = false;
        self.samples.clear();
    }

    /// Stop one axis (it hit a boundary)
    pub fn stop_axis(&mut self, horizontal: bool) {
        if let Some(((vx, vy), at)) = self.velocity {
            let v = if horizontal { (0.0, vy) } else { (vx, 0.0) };
            self.velocity = (v != (0.0, 0.0)).then_some((v, at));
        }
    }

    /// Camera displacement (world px) since the previous step
    pub fn step(&mut self, now: Instant, scale: f64) -> Option<(f64, f64)> {
        let ((vx, vy), last) = self.velocity?;
        let elapsed = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
        if elapsed <= 0.0 {
            return None;
        }
        // Integral of v * k^(t / period) over the elapsed time
        let k = self.friction;
        let decay = k.powf(elapsed / PERIOD_MS);
        let travel = PERIOD_MS / k.ln() * (decay - 1.0);
        let delta = (vx * travel, vy * travel);

        let v = (vx * decay, vy * decay);
        let speed = (v.0 * v.0 + v.1 * v.1).sqrt() * scale;
        self.velocity = (speed >= self.min_speed).then_some((v, now));
        Some(delta)
    }
}
