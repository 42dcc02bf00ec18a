//! Column and row headings
//!
//! A press near a boundary between two headings resizes the line before it;
//! a double click there sizes the line(s) to fit their content. A press on a
//! heading body selects the line and drags out a range of lines, or, when the
//! press lands inside the current line selection, drags those lines to a new
//! position.
//!
//! Lines at or before index 0 grow toward the top-left, so resizing them
//! shifts the viewport by the same amount to keep the dragged edge under the
//! pointer.

use crate::commands::Cmd;
use crate::engine::EngineRequest;
use crate::events::{Event, GestureKind};
use crate::geometry::{Axis, Point};
use crate::model::{AppModel, LineMovePreview};
use crate::pointer::cell_move::{validate_line_move, MoveValidity};
use crate::pointer::{
    gesture_ended, gesture_started, past_threshold, Button, Claim, PointerEvent, PointerHandler,
};
use crate::selection::Selection;

/// Label of the pending operation started by an auto-size
pub const AUTO_SIZE_LABEL: &str = "auto_size";

/// Room left around measured content when sizing to fit (world px)
const AUTO_SIZE_PADDING: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    Corner,
    /// Boundary after line `index`
    Boundary { axis: Axis, index: i64 },
    Line { axis: Axis, index: i64 },
}

fn along(axis: Axis, p: Point) -> f64 {
    match axis {
        Axis::Column => p.x,
        Axis::Row => p.y,
    }
}

fn shift_along(model: &mut AppModel, axis: Axis, amount: f64) {
    match axis {
        Axis::Column => model.viewport.shift_world(amount, 0.0),
        Axis::Row => model.viewport.shift_world(0.0, amount),
    }
}

pub fn hit_test(model: &AppModel, event: &PointerEvent) -> Option<HeaderHit> {
    if event.in_corner(model) {
        return Some(HeaderHit::Corner);
    }
    let axis = if event.in_column_heading(model) {
        Axis::Column
    } else if event.in_row_heading(model) {
        Axis::Row
    } else {
        return None;
    };
    let offsets = model.current()?.sheet.offsets.axis(axis);
    let at = along(axis, event.world);
    let tolerance = model.config.resize_tolerance / model.viewport.scale();
    let index = offsets.find_index(at);
    if offsets.position(index + 1) - at <= tolerance {
        Some(HeaderHit::Boundary { axis, index })
    } else if at - offsets.position(index) <= tolerance {
        Some(HeaderHit::Boundary { axis, index: index - 1 })
    } else {
        Some(HeaderHit::Line { axis, index })
    }
}

#[derive(Debug, Clone)]
struct Resize {
    axis: Axis,
    index: i64,
    original: f64,
    size: f64,
    start: Point,
    /// Viewport shift applied so far, undone on cancel
    shifted: f64,
}

impl Resize {
    fn apply(&mut self, model: &mut AppModel, size: f64) {
        if size == self.size {
            return;
        }
        let delta = size - self.size;
        if let Some(entry) = model.current_mut() {
            entry.sheet.offsets.axis_mut(self.axis).set_size(self.index, size);
        }
        if self.index <= 0 {
            shift_along(model, self.axis, delta);
            self.shifted += delta;
        }
        self.size = size;
        model.dirty.mark_all();
    }

    fn drag(&mut self, model: &mut AppModel, event: &PointerEvent) {
        let delta = (along(self.axis, event.screen) - along(self.axis, self.start)) / model.viewport.scale();
        let size = (self.original + delta).max(model.config.min_size(self.axis));
        self.apply(model, size);
    }

    fn rollback(mut self, model: &mut AppModel) {
        let original = self.original;
        self.apply(model, original);
        if let Some(entry) = model.current_mut() {
            entry.cursor.set_resizing(false);
        }
        gesture_ended(model, GestureKind::HeaderResize(self.axis), false);
    }

    fn commit(self, model: &mut AppModel) -> Option<Cmd> {
        let Some(entry) = model.current_mut() else {
            return None;
        };
        entry.cursor.set_resizing(false);
        let committed = self.size != self.original;
        let mut cmd = None;
        if committed {
            let selection = entry.cursor.selection();
            let request = if selection.is_all_selected() {
                EngineRequest::ResizeAll {
                    axis: self.axis,
                    size: self.size,
                }
            } else {
                match selection.selected_lines(self.axis) {
                    Some(lines) if lines.len() > 1 && lines.contains(&self.index) => {
                        let offsets = entry.sheet.offsets.axis_mut(self.axis);
                        for &line in &lines {
                            offsets.set_size(line, self.size);
                        }
                        EngineRequest::ResizeLines {
                            axis: self.axis,
                            indices: lines,
                            size: self.size,
                        }
                    }
                    _ => EngineRequest::CommitResize {
                        axis: self.axis,
                        index: self.index,
                        old_size: self.original,
                        new_size: self.size,
                    },
                }
            };
            tracing::debug!(request = request.name(), index = self.index, size = self.size, "resize committed");
            cmd = Some(Cmd::engine(entry.cursor.selection(), request));
            let sheet = entry.sheet.id.clone();
            model.dirty.mark_all();
            model.events.emit(&Event::OffsetsChanged { sheet });
        }
        gesture_ended(model, GestureKind::HeaderResize(self.axis), committed);
        cmd
    }
}

#[derive(Debug, Clone)]
struct LineMove {
    axis: Axis,
    span: (i64, i64),
    pressed: i64,
    start: Point,
    to: i64,
    validity: MoveValidity,
    dragging: bool,
}

impl LineMove {
    fn drag(&mut self, model: &mut AppModel, event: &PointerEvent) {
        if !self.dragging {
            if !past_threshold(model, self.start, event.screen) {
                return;
            }
            self.dragging = true;
            if let Some(entry) = model.current_mut() {
                entry.cursor.set_moving(true);
            }
            gesture_started(model, GestureKind::HeaderMove(self.axis));
        }
        let Some(entry) = model.current() else {
            return;
        };
        let index = entry.sheet.offsets.axis(self.axis).find_index(along(self.axis, event.world));
        let (min, max) = self.span;
        let to = (index - (self.pressed - min)).max(1);
        if to != self.to {
            self.to = to;
            self.validity = validate_line_move(&entry.sheet.tables, self.axis, min, max, to);
        }
        model.set_line_move_preview(Some(LineMovePreview {
            axis: self.axis,
            span: self.span,
            to: self.to,
            valid: self.validity.is_valid(),
        }));
    }

    fn clear(&self, model: &mut AppModel) {
        model.set_line_move_preview(None);
        if let Some(entry) = model.current_mut() {
            entry.cursor.set_moving(false);
        }
    }

    fn drop(self, model: &mut AppModel) -> Option<Cmd> {
        self.clear(model);
        if !self.dragging {
            // Plain click inside the selection selects just that line
            if let Some(entry) = model.current_mut() {
                entry.cursor.select_line(self.axis, self.pressed, false, false);
            }
            return None;
        }
        let (min, max) = self.span;
        // Tables may have changed under the drag
        let validity = model
            .current()
            .map_or(MoveValidity::Valid, |entry| {
                validate_line_move(&entry.sheet.tables, self.axis, min, max, self.to)
            });
        let committed = validity.is_valid() && self.to != min;
        let mut cmd = None;
        if committed {
            if let Some(entry) = model.current_mut() {
                cmd = Some(Cmd::engine(
                    entry.cursor.selection(),
                    EngineRequest::MoveLines {
                        axis: self.axis,
                        min,
                        max,
                        to: self.to,
                    },
                ));
                entry.sheet.offsets.axis_mut(self.axis).move_span(min, max, self.to);
                let delta = self.to - min;
                match self.axis {
                    Axis::Column => entry.cursor.translate(delta, 0),
                    Axis::Row => entry.cursor.translate(0, delta),
                }
                let sheet = entry.sheet.id.clone();
                model.dirty.mark_all();
                model.events.emit(&Event::OffsetsChanged { sheet });
            }
        } else if !validity.is_valid() {
            tracing::debug!(?validity, "line move dropped on invalid target");
        }
        gesture_ended(model, GestureKind::HeaderMove(self.axis), committed);
        cmd
    }

    fn cancel(self, model: &mut AppModel) {
        self.clear(model);
        if self.dragging {
            gesture_ended(model, GestureKind::HeaderMove(self.axis), false);
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    Resize(Resize),
    LineMove(LineMove),
    BulkSelect {
        axis: Axis,
        last: i64,
        /// Selection at the press, put back on cancel
        before: Box<Selection>,
    },
}

#[derive(Debug, Default)]
pub struct HeaderHandler {
    state: Option<State>,
}

impl HeaderHandler {
    /// Sizes `index` (or the selected lines containing it) to fit their content
    fn auto_size(model: &mut AppModel, axis: Axis, index: i64) -> Option<Cmd> {
        let min = model.config.min_size(axis);
        let entry = model.current_mut()?;
        let lines = match entry.cursor.selection().selected_lines(axis) {
            Some(lines) if lines.contains(&index) => lines,
            _ => vec![index],
        };
        let sizes: Vec<(i64, f64)> = lines
            .iter()
            .filter_map(|&line| {
                entry
                    .sheet
                    .content_extents
                    .get(axis, line)
                    .map(|extent| (line, (extent + AUTO_SIZE_PADDING).max(min)))
            })
            .collect();
        if sizes.is_empty() {
            tracing::debug!(?axis, index, "nothing to auto-size");
            return None;
        }
        let offsets = entry.sheet.offsets.axis_mut(axis);
        for &(line, size) in &sizes {
            offsets.set_size(line, size);
        }
        let cmd = Cmd::engine(entry.cursor.selection(), EngineRequest::ResizeToFit { axis, sizes });
        let sheet = entry.sheet.id.clone();
        model.pending.start(AUTO_SIZE_LABEL);
        model.dirty.mark_all();
        model.events.emit(&Event::OffsetsChanged { sheet });
        Some(cmd)
    }

    fn press_line(&mut self, model: &mut AppModel, event: &PointerEvent, axis: Axis, index: i64) {
        let restricted = model.config.restricted;
        let Some(entry) = model.current_mut() else {
            return;
        };
        let plain = !event.modifiers.ctrl && !event.modifiers.shift;
        let span = entry
            .cursor
            .selection()
            .line_selection(axis)
            .filter(|(min, max)| (*min..=*max).contains(&index));
        if let (true, Some(span), false) = (plain, span, restricted) {
            self.state = Some(State::LineMove(LineMove {
                axis,
                span,
                pressed: index,
                start: event.screen,
                to: span.0,
                validity: MoveValidity::Valid,
                dragging: false,
            }));
            return;
        }

        let before = entry.cursor.selection().clone();
        if entry
            .cursor
            .select_line(axis, index, event.modifiers.ctrl, event.modifiers.shift)
        {
            entry.cursor.set_bulk_select(Some(axis));
            self.state = Some(State::BulkSelect {
                axis,
                last: index,
                before: Box::new(before),
            });
            gesture_started(model, GestureKind::BulkSelect(axis));
        }
    }
}

impl PointerHandler for HeaderHandler {
    fn name(&self) -> &'static str {
        "header"
    }

    fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        if event.button != Button::Left {
            return Claim::Pass;
        }
        let Some(hit) = hit_test(model, event) else {
            return Claim::Pass;
        };
        tracing::debug!(?hit, clicks = event.click_count, "header press");

        match hit {
            HeaderHit::Corner => {
                if let Some(entry) = model.current_mut() {
                    entry.cursor.select_all(false);
                }
                Claim::claimed()
            }
            HeaderHit::Boundary { axis, index } if !model.is_restricted() => {
                if event.click_count >= 2 {
                    return Claim::with(Self::auto_size(model, axis, index));
                }
                let Some(entry) = model.current_mut() else {
                    return Claim::Pass;
                };
                let original = entry.sheet.offsets.axis(axis).size(index);
                entry.cursor.set_resizing(true);
                self.state = Some(State::Resize(Resize {
                    axis,
                    index,
                    original,
                    size: original,
                    start: event.screen,
                    shifted: 0.0,
                }));
                gesture_started(model, GestureKind::HeaderResize(axis));
                Claim::claimed()
            }
            HeaderHit::Boundary { axis, index } => {
                // Resizing is off; treat it as a press on the nearer line
                self.press_line(model, event, axis, index.max(1));
                Claim::claimed()
            }
            HeaderHit::Line { axis, index } => {
                self.press_line(model, event, axis, index);
                Claim::claimed()
            }
        }
    }

    fn pointer_move(&mut self, model: &mut AppModel, event: &PointerEvent) -> Claim {
        match self.state.as_mut() {
            Some(State::Resize(resize)) => resize.drag(model, event),
            Some(State::LineMove(line_move)) => line_move.drag(model, event),
            Some(State::BulkSelect { axis, last, .. }) => {
                let axis = *axis;
                let Some(entry) = model.current_mut() else {
                    return Claim::claimed();
                };
                let index = entry
                    .sheet
                    .offsets
                    .axis(axis)
                    .find_index(along(axis, event.world))
                    .max(1);
                if index != *last {
                    *last = index;
                    entry.cursor.select_line(axis, index, false, true);
                }
            }
            None => return Claim::Pass,
        }
        Claim::claimed()
    }

    fn pointer_up(&mut self, model: &mut AppModel, _event: &PointerEvent) -> Claim {
        match self.state.take() {
            Some(State::Resize(resize)) => Claim::with(resize.commit(model)),
            Some(State::LineMove(line_move)) => Claim::with(line_move.drop(model)),
            Some(State::BulkSelect { axis, .. }) => {
                if let Some(entry) = model.current_mut() {
                    entry.cursor.set_bulk_select(None);
                }
                gesture_ended(model, GestureKind::BulkSelect(axis), true);
                Claim::claimed()
            }
            None => Claim::Pass,
        }
    }

    fn cancel(&mut self, model: &mut AppModel) -> bool {
        match self.state.take() {
            Some(State::Resize(resize)) => resize.rollback(model),
            Some(State::LineMove(line_move)) => line_move.cancel(model),
            Some(State::BulkSelect { axis, before, .. }) => {
                if let Some(entry) = model.current_mut() {
                    entry.cursor.set_bulk_select(None);
                    entry.cursor.replace(*before);
                }
                gesture_ended(model, GestureKind::BulkSelect(axis), false);
            }
            None => return false,
        }
        true
    }

    fn is_active(&self) -> bool {
        self.state.is_some()
    }
}
