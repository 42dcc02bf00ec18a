//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use sheetview::config::GridConfig;
use sheetview::engine::RecordingEngine;
use sheetview::geometry::{Point, Pos};
use sheetview::messages::{EngineMsg, Msg};
use sheetview::model::{AppModel, SheetInfo, TableMap, TableRegion};
use sheetview::pointer::{Button, Modifiers};
use sheetview::render::RecordingSurface;
use sheetview::selection::Selection;
use sheetview::theme::Theme;
use sheetview::GridApp;

pub type TestApp = GridApp<RecordingSurface>;

/// A running app with sheet "s1" loaded, plus a handle on its engine log
pub struct Harness {
    pub app: TestApp,
    pub engine: RecordingEngine,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_tables(Vec::new())
    }

    pub fn with_tables(tables: Vec<TableRegion>) -> Self {
        let mut info = SheetInfo::new("s1", "Sheet 1");
        info.tables = TableMap::new(tables);
        Self::with_sheet(info, GridConfig::default())
    }

    pub fn with_sheet(info: SheetInfo, config: GridConfig) -> Self {
        let engine = RecordingEngine::new();
        let model = AppModel::new(800.0, 600.0, config, Theme::default());
        let mut app = GridApp::new(model, Box::new(engine.clone()), RecordingSurface::new());
        let now = Instant::now();
        app.dispatch(Msg::Engine(EngineMsg::SheetInfo(info)), now);
        Self { app, engine, now }
    }

    /// Moves the clock far enough that the next press is not a double click
    pub fn advance(&mut self) {
        self.now += Duration::from_secs(1);
    }

    pub fn dispatch(&mut self, msg: Msg) {
        self.app.dispatch(msg, self.now);
    }

    pub fn down(&mut self, screen: Point, modifiers: Modifiers) {
        self.app.pointer_down(screen, Button::Left, modifiers, self.now);
    }

    pub fn drag_to(&mut self, screen: Point, modifiers: Modifiers) {
        self.now += Duration::from_millis(16);
        self.app.pointer_move(screen, modifiers, self.now);
    }

    pub fn up(&mut self, screen: Point, modifiers: Modifiers) {
        self.app.pointer_up(screen, modifiers, self.now);
    }

    /// Press and release in one place
    pub fn click(&mut self, screen: Point, modifiers: Modifiers) {
        self.advance();
        self.down(screen, modifiers);
        self.up(screen, modifiers);
    }

    pub fn selection(&self) -> Selection {
        self.app
            .model()
            .current()
            .expect("current sheet")
            .cursor
            .selection()
            .clone()
    }

    /// Screen point at the center of a cell
    pub fn cell_center(&self, pos: Pos) -> Point {
        let model = self.app.model();
        let world = model.current().expect("current sheet").sheet.cell_bounds(pos).center();
        model.viewport.world_to_screen(world)
    }

    /// Screen point in the column heading strip over world x
    pub fn column_heading(&self, world_x: f64) -> Point {
        let viewport = &self.app.model().viewport;
        let x = viewport.world_to_screen(Point::new(world_x, 0.0)).x;
        Point::new(x, viewport.heading_inset().1 / 2.0)
    }

    /// World x of the right edge of column `index`
    pub fn column_right_edge(&self, index: i64) -> f64 {
        self.app
            .model()
            .current()
            .expect("current sheet")
            .sheet
            .offsets
            .columns
            .position(index + 1)
    }

    pub fn column_width(&self, index: i64) -> f64 {
        self.app
            .model()
            .current()
            .expect("current sheet")
            .sheet
            .offsets
            .columns
            .size(index)
    }
}

pub fn ctrl() -> Modifiers {
    Modifiers {
        ctrl: true,
        ..Modifiers::none()
    }
}

pub fn shift() -> Modifiers {
    Modifiers {
        shift: true,
        ..Modifiers::none()
    }
}
