//! Headless application shell
//!
//! Owns the model and everything around it: the pointer chain, the frame
//! scheduler, the engine client and the draw surface. Platform glue feeds it
//! window events; the replay driver feeds it a script.

use std::time::Instant;

use crate::commands::Cmd;
use crate::engine::EngineClient;
use crate::events::Event;
use crate::geometry::{Point, Pos};
use crate::messages::Msg;
use crate::model::{AppModel, SheetId};
use crate::pointer::{Button, Modifiers, PointerChain, PointerEvent};
use crate::presence::PresenceOut;
use crate::render::{DrawSurface, FrameOutcome, FrameScheduler};
use crate::update::{outbound_presence, update};

pub struct GridApp<S: DrawSurface> {
    model: AppModel,
    chain: PointerChain,
    scheduler: FrameScheduler,
    engine: Box<dyn EngineClient>,
    surface: S,
    /// Presence updates waiting for the transport
    outbox: Vec<PresenceOut>,
    last_cursor: Option<(SheetId, Pos)>,
    /// Button of the press being tracked; moves and releases reuse it
    pressed: Option<Button>,
}

impl<S: DrawSurface> GridApp<S> {
    pub fn new(model: AppModel, engine: Box<dyn EngineClient>, surface: S) -> Self {
        Self {
            model,
            chain: PointerChain::standard(),
            scheduler: FrameScheduler::new(),
            engine,
            surface,
            outbox: Vec::new(),
            last_cursor: None,
            pressed: None,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Name of the gesture handler holding the pointer, if any
    pub fn active_gesture(&self) -> Option<&'static str> {
        self.chain.active()
    }

    /// Presence updates produced so far; the transport drains them
    pub fn take_presence(&mut self) -> Vec<PresenceOut> {
        std::mem::take(&mut self.outbox)
    }

    /// Process a message and run the resulting commands
    pub fn dispatch(&mut self, msg: Msg, now: Instant) {
        self.model.now = now;
        let cmd = update(&mut self.model, msg);
        self.finish_event(cmd);
    }

    pub fn pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers, now: Instant) {
        self.model.now = now;
        self.pressed = Some(button);
        let event = PointerEvent::new(&self.model, screen, button, modifiers, now);
        let cmd = self.chain.pointer_down(&mut self.model, &event);
        self.finish_pointer(cmd);
    }

    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers, now: Instant) {
        self.model.now = now;
        let button = self.pressed.unwrap_or_default();
        let event = PointerEvent::new(&self.model, screen, button, modifiers, now);
        let cmd = self.chain.pointer_move(&mut self.model, &event);
        self.finish_pointer(cmd);
    }

    pub fn pointer_up(&mut self, screen: Point, modifiers: Modifiers, now: Instant) {
        self.model.now = now;
        let button = self.pressed.take().unwrap_or_default();
        let event = PointerEvent::new(&self.model, screen, button, modifiers, now);
        let cmd = self.chain.pointer_up(&mut self.model, &event);
        self.finish_pointer(cmd);
    }

    /// Escape: abandon the live gesture. Returns false if there was none.
    pub fn escape(&mut self, now: Instant) -> bool {
        self.model.now = now;
        self.pressed = None;
        let cancelled = self.chain.cancel(&mut self.model);
        self.finish_pointer(None);
        cancelled
    }

    /// One display refresh
    pub fn frame(&mut self, now: Instant) -> FrameOutcome {
        let outcome = self.scheduler.frame(&mut self.model, &mut self.surface, now);
        // Animations move the camera, which other users see
        let cmd = outbound_presence(&mut self.model);
        self.run(cmd);
        outcome
    }

    pub fn wants_frame(&self) -> bool {
        FrameScheduler::wants_frame(&self.model)
    }

    fn finish_pointer(&mut self, cmd: Option<Cmd>) {
        let presence = outbound_presence(&mut self.model);
        self.finish_event(crate::commands::merge(cmd, presence));
    }

    fn finish_event(&mut self, cmd: Option<Cmd>) {
        self.run(cmd);
        self.announce_cursor();
    }

    fn run(&mut self, cmd: Option<Cmd>) {
        let Some(cmd) = cmd else {
            return;
        };
        for cmd in cmd.flatten() {
            match cmd {
                Cmd::None | Cmd::Redraw => {}
                Cmd::Engine(call) => self.engine.send(call),
                Cmd::SendPresence(out) => self.outbox.push(out),
                Cmd::Batch(cmds) => self.run(Some(Cmd::Batch(cmds))),
            }
        }
    }

    fn announce_cursor(&mut self) {
        let Some(entry) = self.model.current() else {
            return;
        };
        let now = (entry.sheet.id.clone(), entry.cursor.position());
        if self.last_cursor.as_ref() == Some(&now) {
            return;
        }
        let (sheet, position) = now.clone();
        self.last_cursor = Some(now);
        self.model.events.emit(&Event::CursorMoved { sheet, position });
    }
}

impl<S: DrawSurface> std::fmt::Debug for GridApp<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridApp")
            .field("chain", &self.chain)
            .field("outbox", &self.outbox.len())
            .finish_non_exhaustive()
    }
}
