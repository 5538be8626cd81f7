//! Active-gesture state
//!
//! [`InputRouter`] holds the single "which controller is active" slot for a
//! desktop session. Every gesture-claiming path checks and sets it inside one
//! synchronous call.

use tracing::{debug, warn};

use super::drag::DragGesture;
use super::event::Modifiers;
use super::resize::{ResizeGesture, ResizeVariant};
use crate::error::{DesktopError, DesktopResult};
use crate::math::Vec2;
use crate::types::AppletId;

/// Discriminant of [`Gesture`], for logging and errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Pan,
    Drag,
    HandleResize,
    QuadrantResize,
}

/// Surface pan driven by pointer movement
#[derive(Clone, Debug, PartialEq)]
pub struct PanGesture {
    last: Vec2,
}

impl PanGesture {
    pub fn new(pointer: Vec2) -> Self {
        Self { last: pointer }
    }

    /// Viewport-pixel movement since the previous event
    pub fn update(&mut self, pointer: Vec2) -> Vec2 {
        let delta = pointer - self.last;
        self.last = pointer;
        delta
    }
}

/// The gesture currently holding the controller slot
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    Pan(PanGesture),
    Drag(DragGesture),
    Resize(ResizeGesture),
}

impl Gesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            Gesture::Pan(_) => GestureKind::Pan,
            Gesture::Drag(_) => GestureKind::Drag,
            Gesture::Resize(resize) => match resize.variant() {
                ResizeVariant::Handle => GestureKind::HandleResize,
                ResizeVariant::Quadrant => GestureKind::QuadrantResize,
            },
        }
    }

    /// The applet this gesture owns, if any
    pub fn applet(&self) -> Option<&AppletId> {
        match self {
            Gesture::Pan(_) => None,
            Gesture::Drag(drag) => Some(drag.applet()),
            Gesture::Resize(resize) => Some(resize.applet()),
        }
    }
}

/// Per-session input state: the active gesture and held modifiers
#[derive(Clone, Debug, Default)]
pub struct InputRouter {
    active: Option<Gesture>,
    modifiers: Modifiers,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    pub fn active_kind(&self) -> Option<GestureKind> {
        self.active.as_ref().map(Gesture::kind)
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut Gesture> {
        self.active.as_mut()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut Modifiers {
        &mut self.modifiers
    }

    /// Fail if a gesture already holds the slot
    pub fn ensure_idle(&self, requested: GestureKind) -> DesktopResult<()> {
        match &self.active {
            None => Ok(()),
            Some(active) => Err(DesktopError::GestureAlreadyActive {
                active: active.kind(),
                requested,
            }),
        }
    }

    /// Take the controller slot
    ///
    /// A second claim means some cleanup path was missed. Debug builds stop
    /// here; release builds reject the claim and keep the first gesture.
    pub fn claim(&mut self, gesture: Gesture) -> DesktopResult<()> {
        if let Err(err) = self.ensure_idle(gesture.kind()) {
            warn!(%err, "rejected gesture claim");
            if cfg!(debug_assertions) {
                panic!("double gesture claim: {}", err);
            }
            return Err(err);
        }
        debug!(kind = ?gesture.kind(), "gesture started");
        self.active = Some(gesture);
        Ok(())
    }

    /// Clear the controller slot, returning whatever held it
    pub fn release(&mut self) -> Option<Gesture> {
        let gesture = self.active.take();
        if let Some(g) = &gesture {
            debug!(kind = ?g.kind(), "gesture ended");
        }
        gesture
    }
}
