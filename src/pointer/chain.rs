//! Ordered pointer handler chain

use std::time::Duration;

use crate::commands::Cmd;
use crate::model::{AppModel, EmbeddedKind};
use crate::pointer::autofill::AutofillHandler;
use crate::pointer::cell_move::CellMoveHandler;
use crate::pointer::drag_select::DragSelectHandler;
use crate::pointer::embedded::EmbeddedResizeHandler;
use crate::pointer::header::HeaderHandler;
use crate::pointer::table_heading::TableHeadingHandler;
use crate::pointer::{ClickTracker, PointerEvent, PointerHandler};

pub struct PointerChain {
    handlers: Vec<Box<dyn PointerHandler>>,
    /// Index of the handler that claimed the current press
    captured: Option<usize>,
    clicks: ClickTracker,
}

impl PointerChain {
    pub fn new(handlers: Vec<Box<dyn PointerHandler>>) -> Self {
        Self {
            handlers,
            captured: None,
            clicks: ClickTracker::default(),
        }
    }

    /// Images, HTML cells, table headings, headers, autofill handle, selection
    /// border, then plain cell selection
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(EmbeddedResizeHandler::new(EmbeddedKind::Image)),
            Box::new(EmbeddedResizeHandler::new(EmbeddedKind::Html)),
            Box::new(TableHeadingHandler::default()),
            Box::new(HeaderHandler::default()),
            Box::new(AutofillHandler::default()),
            Box::new(CellMoveHandler::default()),
            Box::new(DragSelectHandler::default()),
        ])
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Name of the handler holding the capture
    pub fn active(&self) -> Option<&'static str> {
        self.captured.map(|i| self.handlers[i].name())
    }

    pub fn pointer_down(&mut self, model: &mut AppModel, event: &PointerEvent) -> Option<Cmd> {
        // A press while a gesture is live means the release was lost
        self.cancel(model);

        let mut event = *event;
        event.click_count = self.clicks.track(
            event.at,
            event.screen,
            Duration::from_millis(model.config.double_click_ms),
            model.config.drag_threshold,
        );

        for (index, handler) in self.handlers.iter_mut().enumerate() {
            let claim = handler.pointer_down(model, &event);
            if claim.is_claimed() {
                tracing::debug!(handler = handler.name(), clicks = event.click_count, "pointer down claimed");
                if handler.is_active() {
                    self.captured = Some(index);
                }
                return claim.into_cmd();
            }
        }
        None
    }

    pub fn pointer_move(&mut self, model: &mut AppModel, event: &PointerEvent) -> Option<Cmd> {
        let index = self.captured?;
        self.handlers[index].pointer_move(model, event).into_cmd()
    }

    pub fn pointer_up(&mut self, model: &mut AppModel, event: &PointerEvent) -> Option<Cmd> {
        let index = self.captured.take()?;
        self.handlers[index].pointer_up(model, event).into_cmd()
    }

    /// Escape or capture loss
    pub fn cancel(&mut self, model: &mut AppModel) -> bool {
        let Some(index) = self.captured.take() else {
            return false;
        };
        let cancelled = self.handlers[index].cancel(model);
        tracing::debug!(handler = self.handlers[index].name(), cancelled, "gesture cancelled");
        cancelled
    }
}

impl Default for PointerChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for PointerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerChain")
            .field("handlers", &self.handler_names())
            .field("captured", &self.active())
            .finish()
    }
}
