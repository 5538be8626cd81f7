//! Per-frame reconciliation
//!
//! The frame loop is the only writer of the surface-wide transform. Gesture
//! input reaches the camera through its pending-pan buffer; each tick drains
//! that buffer, clamps, publishes the transform and redraws the wallpaper.
//! Rescheduling belongs to the host (a `requestAnimationFrame` loop in the
//! browser, see the `wasm` feature).

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::camera::Camera;
use crate::error::DesktopResult;
use crate::math::Vec2;

/// Visual transform applied to the whole surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTransform {
    pub scale: f32,
    /// Translation in viewport pixels (the negated pan offset)
    pub offset: Vec2,
}

impl Default for SurfaceTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl SurfaceTransform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            scale: camera.scale(),
            offset: -camera.position(),
        }
    }
}

/// Tiled background painted behind the surface
///
/// Implementations report failure (e.g. no rendering context); the frame loop
/// then carries on without a background.
pub trait Wallpaper {
    fn redraw(&mut self, camera: &Camera) -> DesktopResult<()>;
}

impl<F> Wallpaper for F
where
    F: FnMut(&Camera) -> DesktopResult<()>,
{
    fn redraw(&mut self, camera: &Camera) -> DesktopResult<()> {
        self(camera)
    }
}

/// What one tick did
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Frames ticked so far, including this one
    pub frame: u64,
    /// Milliseconds since the previous tick (0 for the first)
    pub dt_ms: f64,
    /// A pending pan was applied
    pub panned: bool,
    pub transform: SurfaceTransform,
}

/// Frame loop state
pub struct FrameLoop {
    frame: u64,
    last_tick_ms: Option<f64>,
    transform: SurfaceTransform,
    wallpaper: Option<Box<dyn Wallpaper>>,
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("frame", &self.frame)
            .field("last_tick_ms", &self.last_tick_ms)
            .field("transform", &self.transform)
            .field("wallpaper", &self.wallpaper.is_some())
            .finish()
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            frame: 0,
            last_tick_ms: None,
            transform: SurfaceTransform::default(),
            wallpaper: None,
        }
    }

    pub fn set_wallpaper(&mut self, wallpaper: Box<dyn Wallpaper>) {
        self.wallpaper = Some(wallpaper);
    }

    pub fn has_wallpaper(&self) -> bool {
        self.wallpaper.is_some()
    }

    /// Transform published by the most recent tick
    pub fn transform(&self) -> SurfaceTransform {
        self.transform
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame: apply pending pan, clamp, publish transform, redraw
    pub fn tick(&mut self, now_ms: f64, camera: &mut Camera) -> FrameInfo {
        let panned = camera.apply_pending();
        camera.clamp();
        self.transform = SurfaceTransform::from_camera(camera);

        if let Some(wallpaper) = self.wallpaper.as_mut() {
            if let Err(err) = wallpaper.redraw(camera) {
                warn!(%err, "wallpaper unavailable, continuing without background");
                self.wallpaper = None;
            }
        }

        let dt_ms = self.last_tick_ms.map_or(0.0, |last| now_ms - last);
        self.last_tick_ms = Some(now_ms);
        self.frame += 1;
        trace!(frame = self.frame, panned, "frame");

        FrameInfo {
            frame: self.frame,
            dt_ms,
            panned,
            transform: self.transform,
        }
    }
}
