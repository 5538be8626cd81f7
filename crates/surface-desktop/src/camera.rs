//! Camera for the pannable, zoomable surface
//!
//! The camera uses a scroll-offset model: `pan` is how far the viewport has
//! scrolled into the *scaled* surface, in viewport pixels. The surface point
//! under viewport point `v` is therefore `(pan + v) / scale`, and the scrollable
//! extent on each axis is `content_size * scale - viewport_size`.
//!
//! Pointer-driven pans are not applied directly. They accumulate in a pending
//! buffer that the frame loop drains once per frame; see
//! [`FrameLoop`](crate::frame::FrameLoop).

use crate::config::DesktopConfig;
use crate::math::{Rect, Size, Vec2};

/// Pan offset and scale for the surface
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Scroll offset into the scaled surface (viewport pixels)
    pan: Vec2,
    /// Visual scale of the surface
    scale: f32,
    /// Pan accumulated since the last frame
    pending: Vec2,
    /// Viewport size in screen pixels
    viewport_size: Size,
    /// Surface size in surface pixels
    content_size: Size,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&DesktopConfig::default())
    }
}

impl Camera {
    /// Create a camera at the origin with scale 1.0 (clamped to the zoom range)
    pub fn new(config: &DesktopConfig) -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0_f32.clamp(config.min_zoom, config.max_zoom),
            pending: Vec2::ZERO,
            viewport_size: config.viewport_size,
            content_size: config.content_size,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    /// Current pan offset in viewport pixels
    pub fn position(&self) -> Vec2 {
        self.pan
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Pan not yet applied by the frame loop
    pub fn pending(&self) -> Vec2 {
        self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_zero()
    }

    /// Queue a pan of `(dx, dy)` viewport pixels for the next frame
    ///
    /// Positive values scroll the viewport right/down over the surface.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pending += Vec2::new(dx, dy);
    }

    /// Apply and clear the pending pan. Returns true if anything was pending.
    pub fn apply_pending(&mut self) -> bool {
        if !self.has_pending() {
            return false;
        }
        self.pan += self.pending;
        self.pending = Vec2::ZERO;
        true
    }

    /// Upper pan bound on each axis; zero when the scaled content is smaller
    /// than the viewport
    pub fn max_pan(&self) -> Vec2 {
        let extent = self.content_size.scaled(self.scale);
        Vec2::new(
            (extent.width - self.viewport_size.width).max(0.0),
            (extent.height - self.viewport_size.height).max(0.0),
        )
    }

    /// Clamp pan to `[0, content_extent - viewport_extent]` on both axes
    pub fn clamp(&mut self) {
        self.pan = self.pan.clamp(Vec2::ZERO, self.max_pan());
    }

    /// Jump to an absolute pan offset (clamped)
    pub fn set_position(&mut self, pan: Vec2) {
        self.pan = pan;
        self.clamp();
    }

    /// Set scale so the surface point under `anchor` stays under `anchor`
    ///
    /// `anchor` is in viewport pixels. The new scale is clamped to the
    /// configured zoom range and pan is clamped afterwards.
    pub fn zoom_to(&mut self, new_scale: f32, anchor: Vec2) {
        let anchored = self.viewport_to_surface(anchor);
        self.scale = new_scale.clamp(self.min_zoom, self.max_zoom);
        self.pan = anchored * self.scale - anchor;
        self.clamp();
    }

    /// Multiply the scale by `factor` around `anchor`
    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
        self.zoom_to(self.scale * factor, anchor);
    }

    /// Zoom around the viewport center by a fixed additive step
    pub fn step_zoom(&mut self, step: f32) {
        // Snap to the step grid so repeated steps land on 0.1, 0.2, ...
        let target = ((self.scale + step) / step.abs()).round() * step.abs();
        self.zoom_to(target, self.viewport_center());
    }

    /// Reset the scale to 1.0 around the viewport center
    pub fn reset_zoom(&mut self) {
        self.zoom_to(1.0, self.viewport_center());
    }

    /// Update the viewport size (window resize) and re-clamp
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
        self.clamp();
    }

    /// Convert viewport coordinates to surface coordinates
    pub fn viewport_to_surface(&self, point: Vec2) -> Vec2 {
        (self.pan + point) / self.scale
    }

    /// Convert surface coordinates to viewport coordinates
    pub fn surface_to_viewport(&self, point: Vec2) -> Vec2 {
        point * self.scale - self.pan
    }

    /// Convert a viewport-pixel delta into surface pixels
    pub fn viewport_delta_to_surface(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Surface point currently at the center of the viewport
    pub fn center_of_viewport(&self) -> Vec2 {
        self.viewport_to_surface(self.viewport_center())
    }

    /// Surface-space rectangle currently visible
    pub fn visible_rect(&self) -> Rect {
        Rect::from_pos_size(
            self.viewport_to_surface(Vec2::ZERO),
            self.viewport_size.scaled(1.0 / self.scale),
        )
    }

    fn viewport_center(&self) -> Vec2 {
        self.viewport_size.as_vec2() * 0.5
    }
}
