//! Resize controller
//!
//! Two variants share one geometry rule. Handle resizes are started from one
//! of the eight edge/corner handles; quadrant resizes are started with the
//! secondary button anywhere on the applet and behave like the corner handle
//! of the quadrant the pointer started in.
//!
//! Both recompute every field from the geometry and pointer position captured
//! at gesture start plus the total delta since then. Nothing is applied
//! incrementally, so rounding cannot accumulate across moves.

use crate::applet::{Applet, Motion, ResizeHandle};
use crate::math::{Rect, Size, Vec2};
use crate::types::AppletId;

/// Which resize controller started the gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeVariant {
    /// Edge or corner handle
    Handle,
    /// Secondary-button drag on the body
    Quadrant,
}

/// Resize `start` by moving the edges of `handle` by `delta`
///
/// Dimensions never drop below `min`. For north and west edges the offset is
/// adjusted by the clamped amount, so the opposite edge stays fixed.
pub fn resize_rect(start: Rect, handle: ResizeHandle, delta: Vec2, min: Size) -> Rect {
    let mut rect = start;
    if handle.east() {
        rect.width = (start.width + delta.x).max(min.width);
    }
    if handle.west() {
        rect.width = (start.width - delta.x).max(min.width);
        rect.x = start.right() - rect.width;
    }
    if handle.south() {
        rect.height = (start.height + delta.y).max(min.height);
    }
    if handle.north() {
        rect.height = (start.height - delta.y).max(min.height);
        rect.y = start.bottom() - rect.height;
    }
    rect
}

/// An applet being resized
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeGesture {
    applet: AppletId,
    handle: ResizeHandle,
    variant: ResizeVariant,
    start_rect: Rect,
    /// Pointer at gesture start (viewport px)
    start_pointer: Vec2,
    min_size: Size,
}

impl ResizeGesture {
    /// Start a resize from one of the edge/corner handles
    pub fn begin_handle(
        id: AppletId,
        applet: &mut Applet,
        handle: ResizeHandle,
        pointer: Vec2,
        min_size: Size,
    ) -> Self {
        Self::begin(id, applet, handle, ResizeVariant::Handle, pointer, min_size)
    }

    /// Start a quadrant resize; `surface_point` picks the quadrant
    pub fn begin_quadrant(
        id: AppletId,
        applet: &mut Applet,
        surface_point: Vec2,
        pointer: Vec2,
        min_size: Size,
    ) -> Self {
        let handle = ResizeHandle::quadrant(applet.visual_rect(), surface_point);
        Self::begin(id, applet, handle, ResizeVariant::Quadrant, pointer, min_size)
    }

    fn begin(
        id: AppletId,
        applet: &mut Applet,
        handle: ResizeHandle,
        variant: ResizeVariant,
        pointer: Vec2,
        min_size: Size,
    ) -> Self {
        applet.commit_translation();
        applet.set_motion(Motion::Resizing);
        Self {
            applet: id,
            handle,
            variant,
            start_rect: applet.rect(),
            start_pointer: pointer,
            min_size,
        }
    }

    pub fn applet(&self) -> &AppletId {
        &self.applet
    }

    pub fn handle(&self) -> ResizeHandle {
        self.handle
    }

    pub fn variant(&self) -> ResizeVariant {
        self.variant
    }

    pub fn start_rect(&self) -> Rect {
        self.start_rect
    }

    /// Recompute geometry for the current pointer position
    pub fn update(&self, applet: &mut Applet, pointer: Vec2, scale: f32) {
        let delta = (pointer - self.start_pointer) / scale;
        applet.set_rect(resize_rect(self.start_rect, self.handle, delta, self.min_size));
    }

    pub fn finish(self, applet: &mut Applet) {
        applet.set_motion(Motion::Idle);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn handle() -> impl Strategy<Value = ResizeHandle> {
        prop::sample::select(ResizeHandle::ALL.to_vec())
    }

    proptest! {
        /// No delta, however large, shrinks an applet below its minimum
        #[test]
        fn minimum_size_enforced(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            w in 100.0f32..2000.0,
            h in 60.0f32..2000.0,
            dx in -1.0e6f32..1.0e6,
            dy in -1.0e6f32..1.0e6,
            handle in handle(),
        ) {
            let min = Size::new(100.0, 60.0);
            let rect = resize_rect(Rect::new(x, y, w, h), handle, Vec2::new(dx, dy), min);
            prop_assert!(rect.width >= min.width, "width {} < {}", rect.width, min.width);
            prop_assert!(rect.height >= min.height, "height {} < {}", rect.height, min.height);
        }

        /// Edges not named by the handle never move
        #[test]
        fn opposite_edges_fixed(
            dx in -1000.0f32..1000.0,
            dy in -1000.0f32..1000.0,
            handle in handle(),
        ) {
            let start = Rect::new(100.0, 100.0, 400.0, 300.0);
            let rect = resize_rect(start, handle, Vec2::new(dx, dy), Size::new(50.0, 50.0));
            if !handle.west() {
                prop_assert_eq!(rect.x, start.x);
            }
            if !handle.north() {
                prop_assert_eq!(rect.y, start.y);
            }
            if !handle.east() {
                prop_assert!((rect.right() - start.right()).abs() < 0.01);
            }
            if !handle.south() {
                prop_assert!((rect.bottom() - start.bottom()).abs() < 0.01);
            }
        }
    }
}
