use serde::{Deserialize, Serialize};

use super::region::{AppletRegion, ResizeHandle};
use crate::math::{Rect, Size, Vec2};
use crate::types::{AppletId, AppletKind};

/// Presentation hint written by the drag and resize controllers
///
/// Applets read it to adjust themselves, e.g. disabling inner interaction
/// while elevated. Only the compositor writes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    #[default]
    Idle,
    /// Being dragged
    Elevated,
    /// Being resized by either resize controller
    Resizing,
}

impl Motion {
    /// Whether the applet's own content should receive pointer input
    pub fn content_interactive(self) -> bool {
        self == Motion::Idle
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Motion::Idle => "idle",
            Motion::Elevated => "elevated",
            Motion::Resizing => "resizing",
        }
    }
}

/// A movable, resizable panel on the surface
///
/// Geometry is in surface pixels. While a drag is in progress in translate
/// mode the applet's `rect` stays at its start position and the running
/// offset lives in `translation`; [`visual_rect`](Self::visual_rect) is
/// where it actually appears.
#[derive(Clone, Debug, PartialEq)]
pub struct Applet {
    id: Option<AppletId>,
    /// Opaque discriminator, never interpreted by the compositor
    pub kind: AppletKind,
    motion: Motion,
    rect: Rect,
    translation: Vec2,
    /// Minimum size for resizing; the desktop fallback applies when `None`
    pub min_size: Option<Size>,
    /// Whether the top strip acts as a drag handle without the modifier
    pub drag_handle: bool,
}

impl Applet {
    /// Create an unplaced applet with the given geometry
    pub fn new(kind: AppletKind, rect: Rect) -> Self {
        Self {
            id: None,
            kind,
            motion: Motion::Idle,
            rect,
            translation: Vec2::ZERO,
            min_size: None,
            drag_handle: false,
        }
    }

    /// Pre-assign an identity (for applets restored by a host)
    pub fn with_id(mut self, id: AppletId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn with_drag_handle(mut self) -> Self {
        self.drag_handle = true;
        self
    }

    /// Identity, once placed
    pub fn id(&self) -> Option<&AppletId> {
        self.id.as_ref()
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Committed geometry (`left`, `top`, `width`, `height`)
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Uncommitted drag offset
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Where the applet is drawn: committed geometry plus drag offset
    pub fn visual_rect(&self) -> Rect {
        self.rect.translated(self.translation)
    }

    /// Effective minimum size
    pub fn min_size_or(&self, fallback: Size) -> Size {
        self.min_size.unwrap_or(fallback)
    }

    /// Hit-test a surface point against this applet
    ///
    /// Resize handles win over the drag handle, which wins over the body.
    pub fn region_at(
        &self,
        point: Vec2,
        handle_size: f32,
        drag_handle_height: f32,
    ) -> Option<AppletRegion> {
        let rect = self.visual_rect();
        if !rect.contains(point) {
            return None;
        }

        if let Some(handle) = ResizeHandle::ALL
            .iter()
            .copied()
            .find(|h| h.hit_rect(rect, handle_size).contains(point))
        {
            return Some(AppletRegion::Resize(handle));
        }

        if self.drag_handle && point.y < rect.y + drag_handle_height {
            return Some(AppletRegion::DragHandle);
        }

        Some(AppletRegion::Body)
    }

    /// Hit rectangles of all eight resize handles
    pub fn handle_rects(&self, handle_size: f32) -> Vec<(ResizeHandle, Rect)> {
        let rect = self.visual_rect();
        ResizeHandle::ALL
            .iter()
            .map(|&h| (h, h.hit_rect(rect, handle_size)))
            .collect()
    }

    pub(crate) fn assign_id(&mut self, id: AppletId) {
        self.id = Some(id);
    }

    pub(crate) fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub(crate) fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    /// Fold the drag offset into `left`/`top` and clear it
    pub(crate) fn commit_translation(&mut self) {
        self.rect = self.visual_rect();
        self.translation = Vec2::ZERO;
    }
}
