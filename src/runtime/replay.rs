//! Scripted interaction replay
//!
//! A script is YAML: the viewport size, the sheets the engine starts with, and
//! a list of steps. Every step is followed by one 16ms display refresh, so
//! camera animations advance the way they would on screen.
//!
//! ```yaml
//! width: 800
//! height: 600
//! sheets:
//!   - id: s1
//!     name: Sheet 1
//! steps:
//!   - msg: { cursor: { move_to: { x: 3, y: 3 } } }
//!   - down: { cell: { x: 5, y: 2 }, shift: true }
//!   - up: { cell: { x: 5, y: 2 } }
//!   - wait: 300
//! ```

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::engine::{EngineCall, RecordingEngine};
use crate::geometry::{Point, Pos};
use crate::messages::{EngineMsg, Msg};
use crate::model::{AppModel, CameraSnapshot, SheetId, SheetInfo};
use crate::pointer::{Button, Modifiers};
use crate::presence::PresenceOut;
use crate::render::{DrawSurface, RecordingSurface};
use crate::runtime::GridApp;
use crate::theme::Theme;

const FRAME: Duration = Duration::from_millis(16);

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub sheets: Vec<SheetInfo>,
    /// Enums are written as one-key maps (`msg: { cursor: select_all }`)
    /// rather than YAML tags
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Msg(Msg),
    Down(PointerStep),
    Move(PointerStep),
    Up(PointerStep),
    Escape,
    /// An extra display refresh
    Frame,
    /// Let time pass (ms), refreshing as usual
    Wait(u64),
}

/// Pointer position in screen px, or the center of a cell
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointerStep {
    pub x: f64,
    pub y: f64,
    pub cell: Option<Pos>,
    pub button: Button,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl PointerStep {
    fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.shift,
            ctrl: self.ctrl,
            alt: self.alt,
        }
    }

    fn screen(&self, model: &AppModel) -> Point {
        let cell = self
            .cell
            .and_then(|pos| model.current().map(|e| e.sheet.cell_bounds(pos).center()));
        match cell {
            Some(world) => model.viewport.world_to_screen(world),
            None => Point::new(self.x, self.y),
        }
    }
}

impl Script {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid replay script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("in {}", path.display()))
    }
}

/// What a replay produced
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub engine_calls: Vec<EngineCall>,
    pub presence: Vec<PresenceOut>,
    pub frames_presented: u64,
    pub frames_idle: u64,
    pub sheet: Option<SheetId>,
    /// Final selection token
    pub cursor: Option<String>,
    pub camera: CameraSnapshot,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "engine requests: {}", self.engine_calls.len())?;
        for call in &self.engine_calls {
            writeln!(f, "  {} on {}", call.request.name(), call.sheet_id)?;
        }
        writeln!(f, "presence updates: {}", self.presence.len())?;
        writeln!(
            f,
            "frames: {} presented, {} idle",
            self.frames_presented, self.frames_idle
        )?;
        if let (Some(sheet), Some(cursor)) = (&self.sheet, &self.cursor) {
            writeln!(f, "sheet {sheet}: {cursor}")?;
        }
        write!(
            f,
            "camera: ({:.1}, {:.1}) x{:.2}",
            self.camera.x, self.camera.y, self.camera.scale
        )
    }
}

/// Drives a [`GridApp`] through a script with a simulated clock
pub struct Replayer<S: DrawSurface> {
    app: GridApp<S>,
    engine: RecordingEngine,
    now: Instant,
}

impl Replayer<RecordingSurface> {
    pub fn new(script: &Script, config: GridConfig, theme: Theme) -> Self {
        let engine = RecordingEngine::new();
        let model = AppModel::new(script.width, script.height, config, theme);
        let app = GridApp::new(model, Box::new(engine.clone()), RecordingSurface::new());
        let mut replayer = Self {
            app,
            engine,
            now: Instant::now(),
        };
        for info in &script.sheets {
            replayer.step(&Step::Msg(Msg::Engine(EngineMsg::SheetInfo(info.clone()))));
        }
        replayer
    }
}

impl<S: DrawSurface> Replayer<S> {
    pub fn app(&self) -> &GridApp<S> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut GridApp<S> {
        &mut self.app
    }

    pub fn engine(&self) -> &RecordingEngine {
        &self.engine
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn step(&mut self, step: &Step) {
        tracing::debug!(?step, "replay step");
        let now = self.now;
        match step {
            Step::Msg(msg) => self.app.dispatch(msg.clone(), now),
            Step::Down(p) => {
                let screen = p.screen(self.app.model());
                self.app.pointer_down(screen, p.button, p.modifiers(), now);
            }
            Step::Move(p) => {
                let screen = p.screen(self.app.model());
                self.app.pointer_move(screen, p.modifiers(), now);
            }
            Step::Up(p) => {
                let screen = p.screen(self.app.model());
                self.app.pointer_up(screen, p.modifiers(), now);
            }
            Step::Escape => {
                self.app.escape(now);
            }
            Step::Frame => {
                self.app.frame(now);
            }
            Step::Wait(ms) => {
                let until = now + Duration::from_millis(*ms);
                while self.now < until {
                    self.tick();
                }
                return;
            }
        }
        self.tick();
    }

    fn tick(&mut self) {
        self.now += FRAME;
        self.app.frame(self.now);
    }

    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            self.step(step);
        }
    }

    pub fn report(&mut self) -> ReplayReport {
        let model = self.app.model();
        let stats = self.app.scheduler().stats();
        let current = model.current();
        ReplayReport {
            engine_calls: self.engine.calls(),
            frames_presented: stats.presented,
            frames_idle: stats.idle,
            sheet: current.map(|e| e.sheet.id.clone()),
            cursor: current.map(|e| e.cursor.selection().save()),
            camera: model.viewport.snapshot(),
            presence: self.app.take_presence(),
        }
    }
}

/// Run a whole script and report
pub fn replay(script: &Script, config: GridConfig, theme: Theme) -> ReplayReport {
    let mut replayer = Replayer::new(script, config, theme);
    replayer.run(&script.steps);
    let report = replayer.report();
    tracing::info!(
        steps = script.steps.len(),
        requests = report.engine_calls.len(),
        "replay finished"
    );
    report
}
