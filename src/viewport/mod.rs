//! Viewport camera
//!
//! The camera is the world-space point shown at the screen origin plus a scale:
//! `screen = (world - origin) * scale`. The heading strips are drawn over the
//! top/left edge of the screen, so the area available to cells is inset by
//! their size.
//!
//! A released pan coasts ([`momentum`]). A wheel zoom that exposes the area
//! before A1 eases back after a short delay, so continuous zooming is not
//! interrupted.

mod momentum;

use std::time::{Duration, Instant};

use crate::config::GridConfig;
use crate::geometry::{PixelRect, Point};
use crate::model::cursor::CameraSnapshot;

pub use momentum::Momentum;

/// Snap-back speed, screen px per ms, reached at `SNAP_BACK_FULL_DISTANCE`
const SNAP_BACK_SPEED: f64 = 1.5;
const SNAP_BACK_FULL_DISTANCE: f64 = 200.0;
/// Slowest snap-back, as a fraction of `SNAP_BACK_SPEED`
const SNAP_BACK_MIN_FRACTION: f64 = 0.3;

/// Camera position and zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub left: f64,
    pub top: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: CameraState,
    to: CameraState,
    start: Instant,
    duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    camera: CameraState,
    width: f64,
    height: f64,
    /// Row heading width and column heading height (screen px)
    heading: (f64, f64),
    min_zoom: f64,
    max_zoom: f64,
    zoom_factor: f64,
    fit_margin: f64,
    max_fit_zoom: f64,
    animation_duration: Duration,
    short_animation_duration: Duration,
    short_move_threshold: f64,
    animation: Option<Animation>,
    momentum: Momentum,
    snap_back_delay: Duration,
    snap_back: Option<SnapBack>,
    changed: bool,
}

#[derive(Debug, Clone, Copy)]
struct SnapBack {
    /// Starts moving at this time
    from: Instant,
    last: Instant,
}

impl Viewport {
    pub fn new(width: f64, height: f64, config: &GridConfig) -> Self {
        let heading = (config.row_heading_width, config.column_heading_height);
        Self {
            camera: CameraState {
                left: -heading.0,
                top: -heading.1,
                scale: 1.0,
            },
            width,
            height,
            heading,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_factor: config.zoom_factor,
            fit_margin: config.fit_margin,
            max_fit_zoom: config.max_fit_zoom,
            animation_duration: Duration::from_millis(config.animation_ms),
            short_animation_duration: Duration::from_millis(config.short_animation_ms),
            short_move_threshold: config.short_move_threshold_px,
            animation: None,
            momentum: Momentum::new(config.momentum_friction, config.momentum_min_speed),
            snap_back_delay: Duration::from_millis(config.snap_back_delay_ms),
            snap_back: None,
            changed: true,
        }
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn scale(&self) -> f64 {
        self.camera.scale
    }

    /// Screen-space x translation of the world
    pub fn x(&self) -> f64 {
        -self.camera.left * self.camera.scale
    }

    /// Screen-space y translation of the world
    pub fn y(&self) -> f64 {
        -self.camera.top * self.camera.scale
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn heading_inset(&self) -> (f64, f64) {
        self.heading
    }

    /// Anything that moves the camera without input: animation, coasting, snap-back
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.momentum.is_coasting() || self.snap_back.is_some()
    }

    pub fn is_coasting(&self) -> bool {
        self.momentum.is_coasting()
    }

    /// The cell window shows world space before A1
    pub fn is_out_of_bounds(&self) -> bool {
        let home = self.home(self.camera.scale);
        self.camera.left < home.0 - 1e-9 || self.camera.top < home.1 - 1e-9
    }

    pub fn is_snapping_back(&self) -> bool {
        self.snap_back.is_some()
    }

    /// Smallest camera left/top that keeps A1 at the cell window's top-left
    fn home(&self, scale: f64) -> (f64, f64) {
        (-self.heading.0 / scale, -self.heading.1 / scale)
    }

    /// Where the camera will rest once the current animation ends
    pub fn destination(&self) -> CameraState {
        self.animation.map_or(self.camera, |a| a.to)
    }

    /// Returns whether the transform changed since the last call
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new(
            p.x / self.camera.scale + self.camera.left,
            p.y / self.camera.scale + self.camera.top,
        )
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.camera.left) * self.camera.scale,
            (p.y - self.camera.top) * self.camera.scale,
        )
    }

    pub fn world_rect_to_screen(&self, r: &PixelRect) -> PixelRect {
        let origin = self.world_to_screen(Point::new(r.x, r.y));
        PixelRect::new(
            origin.x,
            origin.y,
            r.width * self.camera.scale,
            r.height * self.camera.scale,
        )
    }

    /// World area covered by the whole screen
    pub fn visible_world(&self) -> PixelRect {
        Self::window(self.camera, self.width, self.height, (0.0, 0.0))
    }

    /// World area not covered by the headings
    pub fn cell_window(&self) -> PixelRect {
        Self::window(self.camera, self.width, self.height, self.heading)
    }

    fn window(camera: CameraState, width: f64, height: f64, inset: (f64, f64)) -> PixelRect {
        PixelRect::new(
            camera.left + inset.0 / camera.scale,
            camera.top + inset.1 / camera.scale,
            ((width - inset.0) / camera.scale).max(0.0),
            ((height - inset.1) / camera.scale).max(0.0),
        )
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.changed = true;
        }
    }

    /// Jump without animation
    pub fn set_camera(&mut self, camera: CameraState) {
        let camera = CameraState {
            scale: self.clamp_scale(camera.scale),
            ..camera
        };
        self.animation = None;
        self.momentum.stop();
        self.snap_back = None;
        self.move_camera(camera);
    }

    fn move_camera(&mut self, camera: CameraState) {
        if camera != self.camera {
            self.camera = camera;
            self.changed = true;
        }
    }

    /// Pan by a screen-space delta (content follows the pointer)
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let scale = self.camera.scale;
        self.shift_world(dx / scale, dy / scale);
    }

    /// Move the world by `(dx, dy)` world px; screen translation grows by `d * scale`
    pub fn shift_world(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let mut camera = self.destination();
        camera.left -= dx;
        camera.top -= dy;
        self.set_camera(camera);
    }

    /// A pan drag started; stops any coasting
    pub fn begin_pan(&mut self, now: Instant) {
        self.animation = None;
        self.snap_back = None;
        self.momentum.begin(self.camera.left, self.camera.top, now);
    }

    /// One step of a pan drag: moves immediately and samples for momentum
    pub fn pan_drag(&mut self, dx: f64, dy: f64, now: Instant) {
        if !self.momentum.is_panning() {
            self.pan(dx, dy);
            return;
        }
        let scale = self.camera.scale;
        let camera = CameraState {
            left: self.camera.left - dx / scale,
            top: self.camera.top - dy / scale,
            scale,
        };
        self.move_camera(camera);
        self.momentum.record(camera.left, camera.top, now);
    }

    /// The pan drag was released; the camera may coast on
    pub fn end_pan(&mut self, now: Instant) {
        self.momentum.release(self.camera.left, self.camera.top, now);
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        let camera = self.destination();
        CameraSnapshot {
            x: camera.left,
            y: camera.top,
            scale: camera.scale,
        }
    }

    pub fn restore(&mut self, snapshot: CameraSnapshot) {
        self.set_camera(CameraState {
            left: snapshot.x,
            top: snapshot.y,
            scale: snapshot.scale,
        });
    }

    /// Back to A1 at 100%
    pub fn reset(&mut self) {
        self.set_camera(CameraState {
            left: -self.heading.0,
            top: -self.heading.1,
            scale: 1.0,
        });
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_zoom, self.max_zoom)
    }

    /// Camera that shows `world` at `screen` with the given scale
    fn camera_anchored(&self, world: Point, screen: Point, scale: f64) -> CameraState {
        let scale = self.clamp_scale(scale);
        CameraState {
            left: world.x - screen.x / scale,
            top: world.y - screen.y / scale,
            scale,
        }
    }

    /// Duration for a move, shorter for small nudges
    pub fn animation_duration_for(&self, to: &CameraState) -> Duration {
        let from = self.camera;
        let distance = ((to.left - from.left).powi(2) + (to.top - from.top).powi(2)).sqrt() * from.scale;
        let same_scale = (to.scale - from.scale).abs() < f64::EPSILON;
        if same_scale && distance < self.short_move_threshold {
            self.short_animation_duration
        } else {
            self.animation_duration
        }
    }

    /// Start animating towards `to`
    pub fn animate_to(&mut self, to: CameraState, now: Instant) {
        let to = CameraState {
            scale: self.clamp_scale(to.scale),
            ..to
        };
        if to == self.camera {
            self.animation = None;
            return;
        }
        self.momentum.stop();
        let duration = self.animation_duration_for(&to);
        if duration.is_zero() {
            self.set_camera(to);
            return;
        }
        self.animation = Some(Animation {
            from: self.camera,
            to,
            start: now,
            duration,
        });
    }

    /// Advance animation, coasting and snap-back. Returns true if the camera moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let animated = self.tick_animation(now);
        let coasted = self.tick_momentum(now);
        let snapped = self.tick_snap_back(now);
        animated || coasted || snapped
    }

    fn tick_momentum(&mut self, now: Instant) -> bool {
        let Some((dx, dy)) = self.momentum.step(now, self.camera.scale) else {
            return false;
        };
        let home = self.home(self.camera.scale);
        let mut camera = self.camera;
        camera.left += dx;
        camera.top += dy;
        // Coasting stops at A1 instead of carrying past it
        if camera.left < home.0 && self.camera.left >= home.0 {
            camera.left = home.0;
            self.momentum.stop_axis(true);
        }
        if camera.top < home.1 && self.camera.top >= home.1 {
            camera.top = home.1;
            self.momentum.stop_axis(false);
        }
        let moved = camera != self.camera;
        self.move_camera(camera);
        moved
    }

    fn tick_snap_back(&mut self, now: Instant) -> bool {
        let Some(mut snap) = self.snap_back else {
            return false;
        };
        if now < snap.from || self.animation.is_some() || self.momentum.is_coasting() {
            return false;
        }
        let elapsed = now.saturating_duration_since(snap.last).as_secs_f64() * 1000.0;
        snap.last = now;
        let scale = self.camera.scale;
        let home = self.home(scale);
        let step = |pos: f64, home: f64| -> f64 {
            if pos >= home {
                return pos;
            }
            let distance = (home - pos) * scale;
            let speed = (distance / SNAP_BACK_FULL_DISTANCE).max(SNAP_BACK_MIN_FRACTION) * SNAP_BACK_SPEED;
            let travel = speed * elapsed;
            if travel >= distance {
                home
            } else {
                pos + travel / scale
            }
        };
        let camera = CameraState {
            left: step(self.camera.left, home.0),
            top: step(self.camera.top, home.1),
            scale,
        };
        let moved = camera != self.camera;
        self.move_camera(camera);
        self.snap_back = (camera.left < home.0 || camera.top < home.1).then_some(snap);
        moved
    }

    fn tick_animation(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(anim.start);
        let t = (elapsed.as_secs_f64() / anim.duration.as_secs_f64()).min(1.0);
        let eased = 1.0 - (1.0 - t).powi(2);
        let lerp = |a: f64, b: f64| a + (b - a) * eased;
        self.camera = CameraState {
            left: lerp(anim.from.left, anim.to.left),
            top: lerp(anim.from.top, anim.to.top),
            scale: lerp(anim.from.scale, anim.to.scale),
        };
        if t >= 1.0 {
            self.camera = anim.to;
            self.animation = None;
        }
        self.changed = true;
        true
    }

    /// Scrolls the minimal amount that brings `target` (world px) fully inside
    /// the cell window.
    ///
    /// Computed against the animation destination, so repeating the call while
    /// an animation is in flight changes nothing. Returns true if a move started.
    pub fn ensure_visible(&mut self, target: &PixelRect, now: Instant) -> bool {
        let dest = self.destination();
        let window = Self::window(dest, self.width, self.height, self.heading);

        let axis_shift = |start: f64, size: f64, win_start: f64, win_size: f64| -> f64 {
            if start < win_start || size > win_size {
                start - win_start
            } else if start + size > win_start + win_size {
                start + size - (win_start + win_size)
            } else {
                0.0
            }
        };
        let dx = axis_shift(target.x, target.width, window.x, window.width);
        let dy = axis_shift(target.y, target.height, window.y, window.height);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        tracing::debug!(dx, dy, "ensure_visible: scrolling");
        self.animate_to(
            CameraState {
                left: dest.left + dx,
                top: dest.top + dy,
                scale: dest.scale,
            },
            now,
        );
        true
    }

    /// Fit a world rectangle into the cell window, centered, at most `cap` zoom
    fn zoom_to_rect(&mut self, target: &PixelRect, cap: f64, now: Instant) {
        let avail_w = (self.width - self.heading.0 - 2.0 * self.fit_margin).max(1.0);
        let avail_h = (self.height - self.heading.1 - 2.0 * self.fit_margin).max(1.0);
        let scale = (avail_w / target.width.max(1.0))
            .min(avail_h / target.height.max(1.0))
            .min(cap);
        let center_screen = Point::new(
            self.heading.0 + (self.width - self.heading.0) / 2.0,
            self.heading.1 + (self.height - self.heading.1) / 2.0,
        );
        let camera = self.camera_anchored(target.center(), center_screen, scale);
        self.animate_to(camera, now);
    }

    /// Fit all content, never zooming past `max_fit_zoom`. No content resets the camera.
    pub fn zoom_to_fit(&mut self, content: Option<PixelRect>, now: Instant) {
        match content {
            Some(rect) => self.zoom_to_rect(&rect, self.max_fit_zoom, now),
            None => self.reset(),
        }
    }

    pub fn zoom_to_selection(&mut self, selection: &PixelRect, now: Instant) {
        self.zoom_to_rect(selection, self.max_zoom, now);
    }

    pub fn zoom_in(&mut self, cursor_cell: Option<PixelRect>, now: Instant) {
        self.zoom_by(self.zoom_factor, cursor_cell, now);
    }

    pub fn zoom_out(&mut self, cursor_cell: Option<PixelRect>, now: Instant) {
        self.zoom_by(1.0 / self.zoom_factor, cursor_cell, now);
    }

    /// Zoom around the cursor cell if it is on screen, otherwise the view center
    fn zoom_by(&mut self, factor: f64, cursor_cell: Option<PixelRect>, now: Instant) {
        let window = self.cell_window();
        let world_center = match cursor_cell {
            Some(cell) if window.contains(cell.center()) => cell.center(),
            _ => window.center(),
        };
        let screen_center = self.world_to_screen(world_center);
        let camera = self.camera_anchored(world_center, screen_center, self.camera.scale * factor);
        self.animate_to(camera, now);
    }

    /// Zoom keeping the world point under `screen` fixed
    pub fn zoom_at(&mut self, screen: Point, scale: f64) {
        let world = self.screen_to_world(screen);
        let camera = self.camera_anchored(world, screen, scale);
        self.set_camera(camera);
    }

    /// Wheel or pinch zoom. Exposing space before A1 arms a snap-back, and
    /// each further zoom restarts its delay.
    pub fn wheel_zoom(&mut self, screen: Point, scale: f64, now: Instant) {
        self.zoom_at(screen, scale);
        if self.is_out_of_bounds() {
            let from = now + self.snap_back_delay;
            self.snap_back = Some(SnapBack { from, last: from });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, &GridConfig::default())
    }

    #[test]
    fn test_screen_world_round_trip() {
        let mut vp = viewport();
        vp.zoom_at(Point::new(100.0, 100.0), 2.0);
        let p = Point::new(333.0, 222.0);
        let back = vp.world_to_screen(vp.screen_to_world(p));
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_a1_starts_after_headings() {
        let vp = viewport();
        let window = vp.cell_window();
        assert_eq!(window.x, 0.0);
        assert_eq!(window.y, 0.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = viewport();
        vp.zoom_at(Point::new(0.0, 0.0), 100.0);
        assert_eq!(vp.scale(), GridConfig::default().max_zoom);
        vp.zoom_at(Point::new(0.0, 0.0), 0.0);
        assert_eq!(vp.scale(), GridConfig::default().min_zoom);
    }

    #[test]
    fn test_ensure_visible_noop_when_inside() {
        let mut vp = viewport();
        let now = Instant::now();
        assert!(!vp.ensure_visible(&PixelRect::new(10.0, 10.0, 50.0, 20.0), now));
        assert!(!vp.is_animating());
    }

    #[test]
    fn test_ensure_visible_minimal_translation() {
        let mut vp = viewport();
        let now = Instant::now();
        // right edge at 1000, window right edge at 760
        assert!(vp.ensure_visible(&PixelRect::new(900.0, 10.0, 100.0, 20.0), now));
        let dest = vp.destination();
        assert_eq!(dest.left, -40.0 + 240.0);
        assert_eq!(dest.top, -21.0);
    }

    #[test]
    fn test_ensure_visible_idempotent_during_animation() {
        let mut vp = viewport();
        let now = Instant::now();
        let target = PixelRect::new(2000.0, 3000.0, 100.0, 20.0);
        assert!(vp.ensure_visible(&target, now));
        let dest = vp.destination();
        assert!(!vp.ensure_visible(&target, now + Duration::from_millis(10)));
        assert_eq!(vp.destination(), dest);
    }

    #[test]
    fn test_short_moves_animate_faster() {
        let vp = viewport();
        let mut near = vp.camera();
        near.left += 10.0;
        let mut far = vp.camera();
        far.left += 5000.0;
        assert!(vp.animation_duration_for(&near) < vp.animation_duration_for(&far));
    }

    #[test]
    fn test_tick_finishes_animation() {
        let mut vp = viewport();
        let now = Instant::now();
        vp.ensure_visible(&PixelRect::new(5000.0, 0.0, 100.0, 20.0), now);
        let dest = vp.destination();
        assert!(vp.tick(now + Duration::from_secs(5)));
        assert_eq!(vp.camera(), dest);
        assert!(!vp.is_animating());
        assert!(!vp.tick(now + Duration::from_secs(6)));
    }

    #[test]
    fn test_zoom_to_fit_caps_at_max_fit_zoom() {
        let mut vp = viewport();
        let now = Instant::now();
        vp.zoom_to_fit(Some(PixelRect::new(0.0, 0.0, 10.0, 10.0)), now);
        assert_eq!(vp.destination().scale, 2.0);
    }

    fn run_until_still(vp: &mut Viewport, mut now: Instant) -> Instant {
        let mut frames = 0;
        while vp.is_animating() {
            now += Duration::from_millis(16);
            vp.tick(now);
            frames += 1;
            assert!(frames < 2000, "camera never settled");
        }
        now
    }

    #[test]
    fn test_released_pan_coasts_then_stops() {
        let mut vp = viewport();
        let t0 = Instant::now();
        vp.begin_pan(t0);
        vp.pan_drag(-100.0, 0.0, t0 + Duration::from_millis(16));
        vp.pan_drag(-100.0, 0.0, t0 + Duration::from_millis(32));
        let released = vp.camera().left;
        assert_eq!(released, 160.0);
        vp.end_pan(t0 + Duration::from_millis(32));
        assert!(vp.is_coasting());

        assert!(vp.tick(t0 + Duration::from_millis(48)));
        let after_one = vp.camera().left;
        assert!(after_one > released);
        run_until_still(&mut vp, t0 + Duration::from_millis(48));
        assert!(vp.camera().left > after_one);
        assert!(!vp.is_coasting());
        assert_eq!(vp.camera().top, -21.0);
    }

    #[test]
    fn test_coasting_stops_at_a1() {
        let mut vp = viewport();
        vp.pan(-300.0, 0.0);
        let t0 = Instant::now();
        vp.begin_pan(t0);
        vp.pan_drag(50.0, 0.0, t0 + Duration::from_millis(16));
        vp.end_pan(t0 + Duration::from_millis(16));
        run_until_still(&mut vp, t0 + Duration::from_millis(16));
        assert_eq!(vp.camera().left, -40.0);
        assert!(!vp.is_out_of_bounds());
    }

    #[test]
    fn test_plain_pan_does_not_coast() {
        let mut vp = viewport();
        let now = Instant::now();
        vp.pan_drag(-100.0, 0.0, now);
        vp.end_pan(now + Duration::from_millis(16));
        assert!(!vp.is_animating());
        assert_eq!(vp.camera().left, 60.0);
    }

    #[test]
    fn test_wheel_zoom_before_a1_snaps_back_after_delay() {
        let mut vp = viewport();
        let t0 = Instant::now();
        vp.wheel_zoom(Point::new(400.0, 300.0), 0.5, t0);
        assert!(vp.is_out_of_bounds());
        assert!(vp.is_snapping_back());
        let zoomed = vp.camera();

        // still waiting out the delay
        assert!(!vp.tick(t0 + Duration::from_millis(100)));
        assert_eq!(vp.camera(), zoomed);
        assert!(vp.is_animating());

        run_until_still(&mut vp, t0 + Duration::from_millis(100));
        let camera = vp.camera();
        assert_eq!((camera.left, camera.top, camera.scale), (-80.0, -42.0, 0.5));
        assert!(!vp.is_snapping_back());
    }

    #[test]
    fn test_explicit_pan_cancels_snap_back() {
        let mut vp = viewport();
        let t0 = Instant::now();
        vp.wheel_zoom(Point::new(400.0, 300.0), 0.5, t0);
        vp.pan(10.0, 0.0);
        assert!(!vp.is_snapping_back());
        assert!(vp.is_out_of_bounds());
    }

    #[test]
    fn test_shift_world_moves_screen_translation() {
        let mut vp = viewport();
        vp.zoom_at(Point::new(0.0, 0.0), 2.0);
        let before = vp.x();
        vp.shift_world(50.0, 0.0);
        assert!((vp.x() - (before + 100.0)).abs() < 1e-9);
    }
}
