//! Typed publish/subscribe between components
//!
//! Subscribers are called synchronously, in subscription order, on the thread
//! that emits.

use std::fmt;

use crate::geometry::{Axis, Pos};
use crate::model::SheetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    CursorMoved,
    SheetSwitched,
    ViewportChanged,
    GestureStarted,
    GestureEnded,
    OffsetsChanged,
    TablesChanged,
    RemoteCursorsChanged,
    TableMenuRequested,
}

/// Kind of pointer gesture, reported with gesture events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    HeaderResize(Axis),
    HeaderMove(Axis),
    BulkSelect(Axis),
    Autofill,
    CellMove,
    TableMove,
    EmbeddedResize,
    DragSelect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CursorMoved { sheet: SheetId, position: Pos },
    SheetSwitched { sheet: SheetId },
    ViewportChanged,
    GestureStarted(GestureKind),
    /// `committed` is false when the gesture was cancelled or rejected
    GestureEnded { kind: GestureKind, committed: bool },
    OffsetsChanged { sheet: SheetId },
    TablesChanged { sheet: SheetId },
    RemoteCursorsChanged,
    /// Column header dropdown of a table was pressed
    TableMenuRequested { table: String, column: u32 },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::CursorMoved { .. } => Topic::CursorMoved,
            Event::SheetSwitched { .. } => Topic::SheetSwitched,
            Event::ViewportChanged => Topic::ViewportChanged,
            Event::GestureStarted(_) => Topic::GestureStarted,
            Event::GestureEnded { .. } => Topic::GestureEnded,
            Event::OffsetsChanged { .. } => Topic::OffsetsChanged,
            Event::TablesChanged { .. } => Topic::TablesChanged,
            Event::RemoteCursorsChanged => Topic::RemoteCursorsChanged,
            Event::TableMenuRequested { .. } => Topic::TableMenuRequested,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&Event)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Topic, Handler)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, topic: Topic, handler: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, topic, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: &Event) {
        let topic = event.topic();
        for (_, t, handler) in self.subscribers.iter_mut() {
            if *t == topic {
                handler(event);
            }
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers.iter().filter(|(_, t, _)| *t == topic).count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
