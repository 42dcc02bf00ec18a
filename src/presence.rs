//! Multiplayer presence: other users' cursors
//!
//! Inbound updates carry a selection token; malformed tokens are logged and
//! dropped. Outbound updates are produced when the local selection or camera
//! changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::model::{CameraSnapshot, Cursor, Sheet, SheetId};
use crate::render::dirty::{DirtyFlags, Layer};
use crate::selection::Selection;
use crate::viewport::Viewport;

/// Local state broadcast to other users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceOut {
    pub token: String,
    pub camera: CameraSnapshot,
}

#[derive(Debug, Clone)]
pub struct RemoteCursor {
    pub session: String,
    pub name: String,
    pub color: usize,
    pub selection: Selection,
    pub camera: Option<CameraSnapshot>,
}

/// Edge marker for a remote cursor outside the visible window
#[derive(Debug, Clone, PartialEq)]
pub struct OffscreenIndicator {
    pub session: String,
    pub color: usize,
    /// Screen position on the edge of the cell window
    pub screen: Point,
}

#[derive(Debug)]
pub struct Presence {
    remotes: BTreeMap<String, RemoteCursor>,
    last_sent: Option<(u64, SheetId, CameraSnapshot)>,
    dirty: DirtyFlags,
}

impl Presence {
    pub fn new(dirty: DirtyFlags) -> Self {
        Self {
            remotes: BTreeMap::new(),
            last_sent: None,
            dirty,
        }
    }

    /// Applies a remote update. Returns false if the token could not be parsed.
    pub fn update(
        &mut self,
        session: &str,
        name: &str,
        color: usize,
        token: &str,
        camera: Option<CameraSnapshot>,
    ) -> bool {
        let selection = match Selection::load(token) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::warn!(session, "dropping presence update: {:#}", e);
                return false;
            }
        };
        self.remotes.insert(
            session.to_string(),
            RemoteCursor {
                session: session.to_string(),
                name: name.to_string(),
                color,
                selection,
                camera,
            },
        );
        self.dirty.mark(Layer::RemoteCursors);
        true
    }

    pub fn leave(&mut self, session: &str) -> bool {
        let removed = self.remotes.remove(session).is_some();
        if removed {
            self.dirty.mark(Layer::RemoteCursors);
        }
        removed
    }

    /// Drops every remote cursor on `sheet`; returns how many
    pub fn forget_sheet(&mut self, sheet: &SheetId) -> usize {
        let before = self.remotes.len();
        self.remotes.retain(|_, r| r.selection.sheet_id() != sheet);
        let removed = before - self.remotes.len();
        if removed > 0 {
            self.dirty.mark(Layer::RemoteCursors);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }

    pub fn get(&self, session: &str) -> Option<&RemoteCursor> {
        self.remotes.get(session)
    }

    /// Remote cursors on `sheet`
    pub fn on_sheet<'a>(&'a self, sheet: &'a SheetId) -> impl Iterator<Item = &'a RemoteCursor> {
        self.remotes
            .values()
            .filter(move |r| r.selection.sheet_id() == sheet)
    }

    /// Local state to broadcast, if it changed since the last broadcast
    pub fn outbound(&mut self, cursor: &Cursor, camera: CameraSnapshot) -> Option<PresenceOut> {
        let key = (cursor.revision(), cursor.sheet_id().clone(), camera);
        if self.last_sent.as_ref() == Some(&key) {
            return None;
        }
        self.last_sent = Some(key);
        Some(PresenceOut {
            token: cursor.selection().save(),
            camera,
        })
    }

    /// Indicators for remote cursors on `sheet` that are outside the cell window
    pub fn offscreen_indicators(&self, sheet: &Sheet, viewport: &Viewport) -> Vec<OffscreenIndicator> {
        let window = viewport.cell_window();
        self.on_sheet(&sheet.id)
            .filter_map(|remote| {
                let cell = sheet.cell_bounds(remote.selection.cursor());
                if window.intersects(&cell) {
                    return None;
                }
                let center = cell.center();
                let clamped = Point::new(
                    center.x.clamp(window.x, window.right()),
                    center.y.clamp(window.y, window.bottom()),
                );
                Some(OffscreenIndicator {
                    session: remote.session.clone(),
                    color: remote.color,
                    screen: viewport.world_to_screen(clamped),
                })
            })
            .collect()
    }
}
