//! Persistence seam
//!
//! The compositor calls [`Persistence::save`] after every placement, removal,
//! drag end and resize end. The default implementation does nothing; a real
//! store plugs in here without touching controller logic.

use serde::{Deserialize, Serialize};

use crate::applet::Motion;
use crate::error::DesktopResult;
use crate::math::{Rect, Vec2};
use crate::types::{AppletId, AppletKind};

/// Why a save was requested
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveReason {
    Placed,
    Removed,
    DragEnd,
    ResizeEnd,
}

/// One applet as seen by the persistence hook
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppletSnapshot {
    pub id: AppletId,
    pub kind: AppletKind,
    pub rect: Rect,
    pub motion: Motion,
    /// Stacking value at the time of the snapshot
    pub stacking: u32,
}

/// Desktop state handed to the persistence hook, applets in paint order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub applets: Vec<AppletSnapshot>,
    pub camera_position: Vec2,
    pub scale: f32,
}

impl Snapshot {
    pub fn to_json(&self) -> DesktopResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Storage hook
pub trait Persistence {
    fn save(&mut self, reason: SaveReason, snapshot: &Snapshot);
}

/// Discards every save
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPersistence;

impl Persistence for NoopPersistence {
    fn save(&mut self, _reason: SaveReason, _snapshot: &Snapshot) {}
}

impl<F> Persistence for F
where
    F: FnMut(SaveReason, &Snapshot),
{
    fn save(&mut self, reason: SaveReason, snapshot: &Snapshot) {
        self(reason, snapshot)
    }
}
