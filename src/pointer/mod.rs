//! Pointer gesture machines
//!
//! Each handler is a small state machine (idle, armed, dragging) polled in a
//! fixed order by [`PointerChain`]. The first handler that claims a press
//! receives the following moves and the release.

pub mod autofill;
pub mod cell_move;
pub mod chain;
pub mod drag_select;
pub mod embedded;
pub mod header;
pub mod table_heading;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub use chain::PointerChain;

use crate::commands::Cmd;
use crate::events::{Event, GestureKind};
use crate::geometry::{Point, Pos};
use crate::model::AppModel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    #[default]
    Left,
    Middle,
    Right,
}

/// A pointer event in both screen and world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub screen: Point,
    pub world: Point,
    pub button: Button,
    pub modifiers: Modifiers,
    /// 1 for a single click, 2 for a double click; 0 on moves
    pub click_count: u8,
    pub at: Instant,
}

impl PointerEvent {
    pub fn new(model: &AppModel, screen: Point, button: Button, modifiers: Modifiers, at: Instant) -> Self {
        Self {
            screen,
            world: model.viewport.screen_to_world(screen),
            button,
            modifiers,
            click_count: 0,
            at,
        }
    }

    /// Cell under the pointer, clamped to the first row and column
    pub fn cell(&self, model: &AppModel) -> Option<Pos> {
        let sheet = &model.current()?.sheet;
        let pos = sheet.cell_at(self.world);
        Some(Pos::new(pos.x.max(1), pos.y.max(1)))
    }

    pub fn in_column_heading(&self, model: &AppModel) -> bool {
        let (inset_x, inset_y) = model.viewport.heading_inset();
        self.screen.y < inset_y && self.screen.x >= inset_x
    }

    pub fn in_row_heading(&self, model: &AppModel) -> bool {
        let (inset_x, inset_y) = model.viewport.heading_inset();
        self.screen.x < inset_x && self.screen.y >= inset_y
    }

    pub fn in_corner(&self, model: &AppModel) -> bool {
        let (inset_x, inset_y) = model.viewport.heading_inset();
        self.screen.x < inset_x && self.screen.y < inset_y
    }

    pub fn in_cells(&self, model: &AppModel) -> bool {
        let (inset_x, inset_y) = model.viewport.heading_inset();
        self.screen.x >= inset_x && self.screen.y >= inset_y
    }
}

/// Whether a handler took the event
#[derive(Debug, Clone, PartialEq)]
pub enum Claim {
    Claimed { cmd: Option<Cmd> },
    /// Not handled; offer the event to the next handler
    Pass,
}

impl Claim {
    pub fn claimed() -> Self {
        Claim::Claimed { cmd: None }
    }

    pub fn with(cmd: Option<Cmd>) -> Self {
        Claim::Claimed { cmd }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, Claim::Claimed { .. })
    }

    pub fn into_cmd(self) -> Option<Cmd> {
        match self {
            Claim::Claimed { cmd } => cmd,
            Claim::Pass => None,
        }
    }
}

pub trait PointerHandler {
    fn name(&self) -> &'static str;

    fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim;

    /// Only called while this handler holds the capture
    fn pointer_move(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim;

    fn pointer_up(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim;

    /// Escape or capture loss: restore the state from before the gesture and
    /// issue nothing. Returns true if there was something to cancel.
    fn cancel(&mut self, model: &mut AppModel) -> bool;

    fn is_active(&self) -> bool;
}

/// Screen distance the pointer must travel before a press becomes a drag
pub(crate) fn past_threshold(model: &AppModel, start: Point, now: Point) -> bool {
    start.distance(now) >= model.config.drag_threshold
}

pub(crate) fn gesture_started(model: &mut AppModel, kind: GestureKind) {
    tracing::debug!(?kind, "gesture started");
    model.events.emit(&Event::GestureStarted(kind));
}

pub(crate) fn gesture_ended(model: &mut AppModel, kind: GestureKind, committed: bool) {
    tracing::debug!(?kind, committed, "gesture ended");
    model.events.emit(&Event::GestureEnded { kind, committed });
}

/// Click tracking for double-click detection
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last: Option<(Instant, Point)>,
    count: u8,
}

impl ClickTracker {
    /// Records a press and returns its click count (1 or 2)
    pub fn track(&mut self, at: Instant, screen: Point, window: Duration, tolerance: f64) -> u8 {
        let repeated = self.last.is_some_and(|(time, pos)| {
            at.saturating_duration_since(time) <= window && pos.distance(screen) <= tolerance
        });
        self.count = if repeated && self.count == 1 { 2 } else { 1 };
        self.last = Some((at, screen));
        self.count
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_tracker_double_click() {
        let mut tracker = ClickTracker::default();
        let start = Instant::now();
        let window = Duration::from_millis(500);
        let p = Point::new(10.0, 10.0);
        assert_eq!(tracker.track(start, p, window, 3.0), 1);
        assert_eq!(tracker.track(start + Duration::from_millis(200), p, window, 3.0), 2);
        // a third press starts over
        assert_eq!(tracker.track(start + Duration::from_millis(300), p, window, 3.0), 1);
        // too slow
        assert_eq!(tracker.track(start + Duration::from_secs(2), p, window, 3.0), 1);
        // too far
        let far = Point::new(50.0, 10.0);
        assert_eq!(tracker.track(start + Duration::from_millis(2100), far, window, 3.0), 1);
    }

    #[test]
    fn test_claim_helpers() {
        assert!(Claim::claimed().is_claimed());
        assert!(!Claim::Pass.is_claimed());
        assert_eq!(Claim::with(Some(Cmd::Redraw)).into_cmd(), Some(Cmd::Redraw));
        assert_eq!(Claim::Pass.into_cmd(), None);
    }
}
