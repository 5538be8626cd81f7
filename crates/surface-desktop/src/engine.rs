//! Desktop engine coordinating all compositor components
//!
//! One [`DesktopEngine`] is one desktop session. It owns the camera, the
//! applet and z-order registries, the input router (the active-gesture slot)
//! and the frame loop, and is the only place they are wired together.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::applet::{Applet, AppletRegion, AppletRegistry, Motion, Placement, ResizeHandle};
use crate::camera::Camera;
use crate::config::DesktopConfig;
use crate::error::{DesktopError, DesktopResult};
use crate::frame::{FrameInfo, FrameLoop, SurfaceTransform, Wallpaper};
use crate::input::{
    DragGesture, Gesture, GestureKind, InputResult, InputRouter, Key, PanGesture,
    PointerButton, ResizeGesture,
};
use crate::math::{Rect, Size, Vec2};
use crate::persistence::{AppletSnapshot, NoopPersistence, Persistence, SaveReason, Snapshot};
use crate::types::{AppletId, AppletKind};
use crate::zorder::ZOrderRegistry;

/// Applet with viewport-space coordinates for rendering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppletScreenRect {
    pub id: AppletId,
    pub kind: AppletKind,
    pub motion: Motion,
    pub stacking: u32,
    pub screen_rect: Rect,
}

/// Desktop engine coordinating all compositor components
pub struct DesktopEngine {
    config: DesktopConfig,
    camera: Camera,
    applets: AppletRegistry,
    zorder: ZOrderRegistry,
    input: InputRouter,
    frames: FrameLoop,
    persistence: Box<dyn Persistence>,
}

impl std::fmt::Debug for DesktopEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopEngine")
            .field("camera", &self.camera)
            .field("applets", &self.applets)
            .field("zorder", &self.zorder)
            .field("input", &self.input)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Default for DesktopEngine {
    fn default() -> Self {
        Self::build(DesktopConfig::default())
    }
}

impl DesktopEngine {
    /// Create a desktop session with a validated configuration
    pub fn new(config: DesktopConfig) -> DesktopResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: DesktopConfig) -> Self {
        Self {
            camera: Camera::new(&config),
            config,
            applets: AppletRegistry::new(),
            zorder: ZOrderRegistry::new(),
            input: InputRouter::new(),
            frames: FrameLoop::new(),
            persistence: Box::new(NoopPersistence),
        }
    }

    /// Replace the persistence hook
    pub fn set_persistence(&mut self, persistence: impl Persistence + 'static) {
        self.persistence = Box::new(persistence);
    }

    /// Set the wallpaper redrawn every frame
    pub fn set_wallpaper(&mut self, wallpaper: impl Wallpaper + 'static) {
        self.frames.set_wallpaper(Box::new(wallpaper));
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn on_place(&mut self, callback: impl FnMut(&Applet) + 'static) {
        self.applets.on_place(callback);
    }

    pub fn on_remove(&mut self, callback: impl FnMut(&Applet) + 'static) {
        self.applets.on_remove(callback);
    }

    pub fn on_order_change(&mut self, callback: impl FnMut(&AppletId, u32) + 'static) {
        self.zorder.on_order_change(callback);
    }

    // =========================================================================
    // Applet lifecycle
    // =========================================================================

    /// Put an applet on the surface, on top of the stack
    ///
    /// An elevated applet whose identity is already live is re-attached in
    /// place: no subscriber runs and no mirror is created.
    pub fn add_applet(&mut self, applet: Applet) -> DesktopResult<AppletId> {
        if applet.motion() == Motion::Elevated {
            let held = match (applet.id(), self.input.active()) {
                (Some(id), Some(Gesture::Drag(drag))) => drag.applet() == id,
                _ => false,
            };
            if !held {
                return Err(DesktopError::InvalidOperation {
                    op: "add_applet",
                    reason: "elevated applet is not held by a drag",
                });
            }
        }
        match self.applets.place(applet)? {
            Placement::Placed(id) => {
                self.zorder.register(&id)?;
                self.save(SaveReason::Placed);
                Ok(id)
            }
            Placement::Reparented(id) => Ok(id),
        }
    }

    /// Create an applet centred on what the user is looking at
    pub fn place_at_center(
        &mut self,
        kind: AppletKind,
        size: Option<Size>,
    ) -> DesktopResult<AppletId> {
        let size = size.unwrap_or(self.config.default_applet_size);
        let rect = Rect::centered_on(self.center_of_viewport(), size);
        self.add_applet(Applet::new(kind, rect))
    }

    /// Take an applet off the surface
    ///
    /// A gesture holding the applet is cancelled first so the controller slot
    /// cannot be left claimed.
    pub fn remove_applet(&mut self, id: &AppletId) -> DesktopResult<Applet> {
        if !self.applets.contains(id) {
            return Err(DesktopError::AppletNotFound(id.clone()));
        }
        if self.input.active().and_then(Gesture::applet) == Some(id) {
            self.cancel_gesture();
        }
        let applet = self.applets.remove(id)?;
        self.zorder.unregister(id)?;
        self.save(SaveReason::Removed);
        Ok(applet)
    }

    /// Bring an applet to the top of the stacking order
    pub fn lift(&mut self, id: &AppletId) -> DesktopResult<()> {
        self.zorder.lift(id)
    }

    pub fn applet(&self, id: &AppletId) -> Option<&Applet> {
        self.applets.get(id)
    }

    pub fn applet_count(&self) -> usize {
        self.applets.len()
    }

    /// Stacking value derived from the z-order mirror (1 = bottom)
    pub fn stacking_value(&self, id: &AppletId) -> Option<u32> {
        self.zorder.stacking_value(id)
    }

    /// Live applets bottom to top
    pub fn applets_by_z(&self) -> Vec<&Applet> {
        self.zorder
            .ids()
            .filter_map(|id| self.applets.get(id))
            .collect()
    }

    /// Overwrite an applet's geometry from outside a gesture
    pub fn set_applet_rect(&mut self, id: &AppletId, rect: Rect) -> DesktopResult<()> {
        if self.input.active().and_then(Gesture::applet) == Some(id) {
            return Err(DesktopError::InvalidOperation {
                op: "set_applet_rect",
                reason: "applet is held by an active gesture",
            });
        }
        self.applets.get_mut(id)?.set_rect(rect);
        Ok(())
    }

    /// Topmost applet under a surface point and the region hit
    pub fn applet_at(&self, point: Vec2) -> Option<(AppletId, AppletRegion)> {
        self.zorder.ids().rev().find_map(|id| {
            let applet = self.applets.get(id)?;
            applet
                .region_at(
                    point,
                    self.config.resize_handle_size,
                    self.config.drag_handle_height,
                )
                .map(|region| (id.clone(), region))
        })
    }

    // =========================================================================
    // Camera
    // =========================================================================

    /// Surface point at the centre of the viewport
    pub fn center_of_viewport(&self) -> Vec2 {
        self.camera.center_of_viewport()
    }

    /// Current pan offset (viewport px)
    pub fn camera_position(&self) -> Vec2 {
        self.camera.position()
    }

    /// Queue a pan for the next frame
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.camera.pan_by(dx, dy);
    }

    /// Zoom around a viewport point. Refused while a gesture is active.
    pub fn zoom_to(&mut self, scale: f32, anchor: Vec2) -> DesktopResult<()> {
        if self.input.is_active() {
            return Err(DesktopError::InvalidOperation {
                op: "zoom_to",
                reason: "a gesture is active",
            });
        }
        self.camera.zoom_to(scale, anchor);
        Ok(())
    }

    /// Viewport (window) resized
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.camera.set_viewport_size(Size::new(width, height));
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    pub fn active_gesture(&self) -> Option<GestureKind> {
        self.input.active_kind()
    }

    /// Start dragging an applet
    pub fn start_drag(&mut self, id: &AppletId, pointer: Vec2) -> DesktopResult<()> {
        self.input.ensure_idle(GestureKind::Drag)?;
        self.zorder.lift(id)?;
        let applet = self.applets.get_mut(id)?;
        let gesture = DragGesture::begin(id.clone(), applet, pointer);
        self.input.claim(Gesture::Drag(gesture))
    }

    /// Start resizing an applet from one of its handles
    pub fn start_handle_resize(
        &mut self,
        id: &AppletId,
        handle: ResizeHandle,
        pointer: Vec2,
    ) -> DesktopResult<()> {
        self.input.ensure_idle(GestureKind::HandleResize)?;
        self.zorder.lift(id)?;
        let fallback = self.config.min_applet_size;
        let applet = self.applets.get_mut(id)?;
        let min = applet.min_size_or(fallback);
        let gesture = ResizeGesture::begin_handle(id.clone(), applet, handle, pointer, min);
        self.input.claim(Gesture::Resize(gesture))
    }

    /// Start a quadrant resize at a viewport pointer position
    pub fn start_quadrant_resize(&mut self, id: &AppletId, pointer: Vec2) -> DesktopResult<()> {
        self.input.ensure_idle(GestureKind::QuadrantResize)?;
        self.zorder.lift(id)?;
        let surface_point = self.camera.viewport_to_surface(pointer);
        let fallback = self.config.min_applet_size;
        let applet = self.applets.get_mut(id)?;
        let min = applet.min_size_or(fallback);
        let gesture =
            ResizeGesture::begin_quadrant(id.clone(), applet, surface_point, pointer, min);
        self.input.claim(Gesture::Resize(gesture))
    }

    /// Start panning the surface
    pub fn start_pan(&mut self, pointer: Vec2) -> DesktopResult<()> {
        self.input.ensure_idle(GestureKind::Pan)?;
        self.input.claim(Gesture::Pan(PanGesture::new(pointer)))
    }

    /// Route a pointer-down at a viewport position
    pub fn handle_pointer_down(&mut self, pointer: Vec2, button: PointerButton) -> InputResult {
        if let Some(active) = self.input.active_kind() {
            debug!(?active, ?button, "pointer down while gesture active, ignored");
            return InputResult::Unhandled;
        }

        let surface_point = self.camera.viewport_to_surface(pointer);
        let hit = self.applet_at(surface_point);
        let drag_modifier = self.input.modifiers().drag;

        let started = match (button, hit) {
            (PointerButton::Middle, _) | (PointerButton::Primary, None) => {
                self.start_pan(pointer)
            }
            (PointerButton::Primary, Some((id, AppletRegion::Resize(handle)))) => {
                self.start_handle_resize(&id, handle, pointer)
            }
            (PointerButton::Primary, Some((id, AppletRegion::DragHandle))) => {
                self.start_drag(&id, pointer)
            }
            (PointerButton::Primary, Some((id, AppletRegion::Body))) if drag_modifier => {
                self.start_drag(&id, pointer)
            }
            (PointerButton::Primary, Some((id, AppletRegion::Body))) => {
                let origin = self
                    .applets
                    .get(&id)
                    .map(|a| a.visual_rect().position())
                    .unwrap_or_default();
                return InputResult::Forward {
                    applet_id: id,
                    local: surface_point - origin,
                };
            }
            (PointerButton::Secondary, Some((id, _))) => self.start_quadrant_resize(&id, pointer),
            (PointerButton::Secondary, None) => return InputResult::Unhandled,
        };

        match started {
            Ok(()) => InputResult::Handled,
            Err(err) => {
                warn!(%err, "could not start gesture");
                InputResult::Unhandled
            }
        }
    }

    /// Feed a pointer move to the active gesture
    pub fn handle_pointer_move(&mut self, pointer: Vec2) -> InputResult {
        let scale = self.camera.scale();
        let precise = self.input.modifiers().precise;

        let target = match self.input.active_mut() {
            None => return InputResult::Unhandled,
            Some(Gesture::Pan(pan)) => {
                let delta = pan.update(pointer);
                self.camera.pan_by(-delta.x, -delta.y);
                trace!(dx = delta.x, dy = delta.y, "pan move");
                return InputResult::Handled;
            }
            Some(gesture) => gesture,
        };

        let updated = match target {
            Gesture::Drag(drag) => self
                .applets
                .get_mut(drag.applet())
                .map(|applet| drag.update(applet, pointer, scale, precise)),
            Gesture::Resize(resize) => self
                .applets
                .get_mut(resize.applet())
                .map(|applet| resize.update(applet, pointer, scale)),
            Gesture::Pan(_) => Ok(()),
        };

        match updated {
            Ok(()) => InputResult::Handled,
            Err(err) => {
                warn!(%err, "gesture lost its applet");
                self.cancel_gesture();
                InputResult::Unhandled
            }
        }
    }

    /// Finish the active gesture
    pub fn handle_pointer_up(&mut self) -> InputResult {
        self.end_gesture()
    }

    /// Abandon the active gesture after blur, visibility loss or the pointer
    /// leaving the surface. Same cleanup as a pointer-up.
    pub fn cancel_gesture(&mut self) -> InputResult {
        self.end_gesture()
    }

    fn end_gesture(&mut self) -> InputResult {
        let Some(gesture) = self.input.release() else {
            return InputResult::Unhandled;
        };

        let reason = match gesture {
            Gesture::Pan(_) => None,
            Gesture::Drag(drag) => {
                if let Ok(applet) = self.applets.get_mut(drag.applet()) {
                    drag.finish(applet);
                }
                Some(SaveReason::DragEnd)
            }
            Gesture::Resize(resize) => {
                if let Ok(applet) = self.applets.get_mut(resize.applet()) {
                    resize.finish(applet);
                }
                Some(SaveReason::ResizeEnd)
            }
        };

        if let Some(reason) = reason {
            self.save(reason);
        }
        InputResult::Handled
    }

    /// Wheel zoom around the pointer. Ignored during a gesture.
    pub fn handle_wheel(&mut self, delta_y: f32, pointer: Vec2) -> InputResult {
        if self.input.is_active() || delta_y == 0.0 {
            return InputResult::Unhandled;
        }
        let factor = if delta_y < 0.0 {
            self.config.wheel_zoom_factor
        } else {
            1.0 / self.config.wheel_zoom_factor
        };
        self.camera.zoom_by(factor, pointer);
        InputResult::Handled
    }

    pub fn key_down(&mut self, key: Key) -> InputResult {
        match key {
            Key::DragModifier => self.input.modifiers_mut().drag = true,
            Key::PreciseModifier => self.input.modifiers_mut().precise = true,
            _ if self.input.is_active() => return InputResult::Unhandled,
            Key::ZoomIn => self.camera.step_zoom(self.config.zoom_step),
            Key::ZoomOut => self.camera.step_zoom(-self.config.zoom_step),
            Key::ZoomReset => self.camera.reset_zoom(),
        }
        InputResult::Handled
    }

    pub fn key_up(&mut self, key: Key) -> InputResult {
        match key {
            Key::DragModifier => self.input.modifiers_mut().drag = false,
            Key::PreciseModifier => self.input.modifiers_mut().precise = false,
            _ => return InputResult::Unhandled,
        }
        InputResult::Handled
    }

    // =========================================================================
    // Frame loop and rendering
    // =========================================================================

    /// Run one frame
    pub fn tick(&mut self, now_ms: f64) -> FrameInfo {
        self.frames.tick(now_ms, &mut self.camera)
    }

    /// Transform published by the last frame
    pub fn surface_transform(&self) -> SurfaceTransform {
        self.frames.transform()
    }

    /// Applets in paint order with viewport-space rectangles
    pub fn applet_screen_rects(&self) -> Vec<AppletScreenRect> {
        let scale = self.camera.scale();
        self.zorder
            .ids()
            .enumerate()
            .filter_map(|(index, id)| {
                let applet = self.applets.get(id)?;
                let rect = applet.visual_rect();
                let origin = self.camera.surface_to_viewport(rect.position());
                Some(AppletScreenRect {
                    id: id.clone(),
                    kind: applet.kind.clone(),
                    motion: applet.motion(),
                    stacking: index as u32 + 1,
                    screen_rect: Rect::from_pos_size(origin, rect.size().scaled(scale)),
                })
            })
            .collect()
    }

    /// Current state in paint order
    pub fn snapshot(&self) -> Snapshot {
        let applets = self
            .zorder
            .ids()
            .enumerate()
            .filter_map(|(index, id)| {
                let applet = self.applets.get(id)?;
                Some(AppletSnapshot {
                    id: id.clone(),
                    kind: applet.kind.clone(),
                    rect: applet.visual_rect(),
                    motion: applet.motion(),
                    stacking: index as u32 + 1,
                })
            })
            .collect();
        Snapshot {
            applets,
            camera_position: self.camera.position(),
            scale: self.camera.scale(),
        }
    }

    fn save(&mut self, reason: SaveReason) {
        let snapshot = self.snapshot();
        self.persistence.save(reason, &snapshot);
    }
}
