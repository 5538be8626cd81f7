//! JavaScript bindings
//!
//! [`WasmDesktop`] wraps a [`DesktopEngine`] for the browser host. Structured
//! values cross the boundary as JSON strings; subscriptions are plain JS
//! functions. Callbacks run synchronously inside the call that triggered them
//! and must not call back into the same `WasmDesktop`.

mod raf;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::applet::Applet;
use crate::camera::Camera;
use crate::config::DesktopConfig;
use crate::engine::DesktopEngine;
use crate::error::DesktopError;
use crate::input::{InputResult, Key, PointerButton};
use crate::math::{Rect, Size, Vec2};
use crate::persistence::{SaveReason, Snapshot};
use crate::types::{AppletId, AppletKind};

pub use raf::RafLoop;

fn to_js_error(err: DesktopError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn log_callback_error(context: &str, err: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(context), err);
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    if let Err(err) = Reflect::set(obj, &JsValue::from_str(key), &value) {
        log_callback_error("could not set result field", &err);
    }
}

fn input_result_to_js(result: InputResult) -> JsValue {
    let obj = Object::new();
    match result {
        InputResult::Handled => set_js(&obj, "type", JsValue::from_str("handled")),
        InputResult::Unhandled => set_js(&obj, "type", JsValue::from_str("unhandled")),
        InputResult::Forward { applet_id, local } => {
            set_js(&obj, "type", JsValue::from_str("forward"));
            set_js(&obj, "appletId", JsValue::from_str(applet_id.as_str()));
            set_js(&obj, "x", JsValue::from_f64(f64::from(local.x)));
            set_js(&obj, "y", JsValue::from_f64(f64::from(local.y)));
        }
    }
    obj.into()
}

fn save_reason_str(reason: SaveReason) -> &'static str {
    match reason {
        SaveReason::Placed => "placed",
        SaveReason::Removed => "removed",
        SaveReason::DragEnd => "drag-end",
        SaveReason::ResizeEnd => "resize-end",
    }
}

/// Desktop session exported to JavaScript
#[wasm_bindgen]
pub struct WasmDesktop {
    engine: Rc<RefCell<DesktopEngine>>,
    frames: Option<RafLoop>,
}

#[wasm_bindgen]
impl WasmDesktop {
    /// Create a session. `config_json` may be omitted for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmDesktop, JsValue> {
        let config = match config_json {
            Some(json) => DesktopConfig::from_json(&json).map_err(to_js_error)?,
            None => DesktopConfig::default(),
        };
        let engine = DesktopEngine::new(config).map_err(to_js_error)?;
        Ok(Self {
            engine: Rc::new(RefCell::new(engine)),
            frames: None,
        })
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// `callback(appletId, kind)` after an applet is placed
    #[wasm_bindgen]
    pub fn on_place(&mut self, callback: Function) {
        self.engine.borrow_mut().on_place(move |applet: &Applet| {
            let id = applet.id().map(AppletId::as_str).unwrap_or_default();
            if let Err(err) = callback.call2(
                &JsValue::NULL,
                &JsValue::from_str(id),
                &JsValue::from_str(applet.kind.id()),
            ) {
                log_callback_error("on_place callback failed", &err);
            }
        });
    }

    /// `callback(appletId)` after an applet is removed
    #[wasm_bindgen]
    pub fn on_remove(&mut self, callback: Function) {
        self.engine.borrow_mut().on_remove(move |applet: &Applet| {
            let id = applet.id().map(AppletId::as_str).unwrap_or_default();
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(id)) {
                log_callback_error("on_remove callback failed", &err);
            }
        });
    }

    /// `callback(appletId, stackingValue)` whenever a stacking value changes
    #[wasm_bindgen]
    pub fn on_order_change(&mut self, callback: Function) {
        self.engine
            .borrow_mut()
            .on_order_change(move |id: &AppletId, value: u32| {
                if let Err(err) = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from_str(id.as_str()),
                    &JsValue::from(value),
                ) {
                    log_callback_error("on_order_change callback failed", &err);
                }
            });
    }

    /// `callback(reason, snapshotJson)` after place, remove, drag end and
    /// resize end
    #[wasm_bindgen]
    pub fn set_persistence(&mut self, callback: Function) {
        self.engine
            .borrow_mut()
            .set_persistence(move |reason: SaveReason, snapshot: &Snapshot| {
                let json = match snapshot.to_json() {
                    Ok(json) => json,
                    Err(err) => {
                        log_callback_error("snapshot serialization failed", &to_js_error(err));
                        return;
                    }
                };
                if let Err(err) = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from_str(save_reason_str(reason)),
                    &JsValue::from_str(&json),
                ) {
                    log_callback_error("persistence callback failed", &err);
                }
            });
    }

    /// `callback(panX, panY, scale)` every frame. A throw drops the wallpaper.
    #[wasm_bindgen]
    pub fn set_wallpaper(&mut self, callback: Function) {
        self.engine
            .borrow_mut()
            .set_wallpaper(move |camera: &Camera| {
                let pan = camera.position();
                callback
                    .call3(
                        &JsValue::NULL,
                        &JsValue::from_f64(f64::from(pan.x)),
                        &JsValue::from_f64(f64::from(pan.y)),
                        &JsValue::from_f64(f64::from(camera.scale())),
                    )
                    .map(|_| ())
                    .map_err(|err| DesktopError::RenderError(format!("{:?}", err)))
            });
    }

    // =========================================================================
    // Applets
    // =========================================================================

    /// Place an applet and return its identity
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn add_applet(
        &mut self,
        kind: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        id: Option<String>,
        drag_handle: Option<bool>,
    ) -> Result<String, JsValue> {
        let mut applet = Applet::new(AppletKind::from_id(kind), Rect::new(x, y, width, height));
        if let Some(id) = id {
            applet = applet.with_id(AppletId::from(id));
        }
        if drag_handle.unwrap_or(false) {
            applet = applet.with_drag_handle();
        }
        self.engine
            .borrow_mut()
            .add_applet(applet)
            .map(|id| id.to_string())
            .map_err(to_js_error)
    }

    /// Place an applet centred in the viewport
    #[wasm_bindgen]
    pub fn place_at_center(
        &mut self,
        kind: &str,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<String, JsValue> {
        let size = width.zip(height).map(|(w, h)| Size::new(w, h));
        self.engine
            .borrow_mut()
            .place_at_center(AppletKind::from_id(kind), size)
            .map(|id| id.to_string())
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn remove_applet(&mut self, id: &str) -> Result<(), JsValue> {
        self.engine
            .borrow_mut()
            .remove_applet(&AppletId::from(id))
            .map(|_| ())
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn lift(&mut self, id: &str) -> Result<(), JsValue> {
        self.engine
            .borrow_mut()
            .lift(&AppletId::from(id))
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn stacking_value(&self, id: &str) -> Option<u32> {
        self.engine.borrow().stacking_value(&AppletId::from(id))
    }

    #[wasm_bindgen]
    pub fn set_applet_rect(
        &mut self,
        id: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), JsValue> {
        self.engine
            .borrow_mut()
            .set_applet_rect(&AppletId::from(id), Rect::new(x, y, width, height))
            .map_err(to_js_error)
    }

    /// Applets in paint order with viewport rectangles, as JSON
    #[wasm_bindgen]
    pub fn applet_screen_rects(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.borrow().applet_screen_rects())
            .map_err(|e| to_js_error(e.into()))
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.engine.borrow().snapshot().to_json().map_err(to_js_error)
    }

    // =========================================================================
    // Camera
    // =========================================================================

    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.borrow_mut().resize_viewport(width, height);
    }

    #[wasm_bindgen]
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.engine.borrow_mut().pan_by(dx, dy);
    }

    /// Fails while a gesture is active
    #[wasm_bindgen]
    pub fn zoom_to(&mut self, scale: f32, anchor_x: f32, anchor_y: f32) -> Result<(), JsValue> {
        self.engine
            .borrow_mut()
            .zoom_to(scale, Vec2::new(anchor_x, anchor_y))
            .map_err(to_js_error)
    }

    /// `[x, y]` of the surface point at the viewport centre
    #[wasm_bindgen]
    pub fn center_of_viewport(&self) -> Vec<f32> {
        let center = self.engine.borrow().center_of_viewport();
        vec![center.x, center.y]
    }

    /// `[panX, panY]`
    #[wasm_bindgen]
    pub fn camera_position(&self) -> Vec<f32> {
        let pan = self.engine.borrow().camera_position();
        vec![pan.x, pan.y]
    }

    #[wasm_bindgen]
    pub fn scale(&self) -> f32 {
        self.engine.borrow().camera().scale()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// `button` is `PointerEvent.button`
    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f32, y: f32, button: u8) -> JsValue {
        let Some(button) = PointerButton::from_index(button) else {
            return input_result_to_js(InputResult::Unhandled);
        };
        input_result_to_js(self.engine.borrow_mut().handle_pointer_down(Vec2::new(x, y), button))
    }

    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> JsValue {
        input_result_to_js(self.engine.borrow_mut().handle_pointer_move(Vec2::new(x, y)))
    }

    #[wasm_bindgen]
    pub fn pointer_up(&mut self) -> JsValue {
        input_result_to_js(self.engine.borrow_mut().handle_pointer_up())
    }

    /// Call on blur, visibility loss and pointer leave
    #[wasm_bindgen]
    pub fn cancel_gesture(&mut self) -> JsValue {
        input_result_to_js(self.engine.borrow_mut().cancel_gesture())
    }

    #[wasm_bindgen]
    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) -> bool {
        self.engine
            .borrow_mut()
            .handle_wheel(delta_y, Vec2::new(x, y))
            .is_handled()
    }

    /// `key` is `KeyboardEvent.key`. Returns true if consumed.
    #[wasm_bindgen]
    pub fn key_down(&mut self, key: &str) -> bool {
        Key::from_dom(key)
            .map(|key| self.engine.borrow_mut().key_down(key).is_handled())
            .unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn key_up(&mut self, key: &str) -> bool {
        Key::from_dom(key)
            .map(|key| self.engine.borrow_mut().key_up(key).is_handled())
            .unwrap_or(false)
    }

    /// Active gesture name, if any
    #[wasm_bindgen]
    pub fn active_gesture(&self) -> Option<String> {
        self.engine
            .borrow()
            .active_gesture()
            .map(|kind| format!("{:?}", kind))
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Run one frame manually. Returns true if a pan was applied.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.engine.borrow_mut().tick(now_ms).panned
    }

    /// Surface transform of the last frame as JSON (`{scale, offset}`)
    #[wasm_bindgen]
    pub fn surface_transform(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.borrow().surface_transform())
            .map_err(|e| to_js_error(e.into()))
    }

    /// Drive the frame loop from `requestAnimationFrame`
    ///
    /// `on_frame(transformJson)` runs after each tick.
    #[wasm_bindgen]
    pub fn start_frames(&mut self, on_frame: Option<Function>) {
        if self.frames.as_ref().is_some_and(RafLoop::is_running) {
            return;
        }
        let engine = Rc::clone(&self.engine);
        let frames = RafLoop::new(move |now_ms| {
            let info = engine.borrow_mut().tick(now_ms);
            let Some(on_frame) = on_frame.as_ref() else {
                return;
            };
            match serde_json::to_string(&info.transform) {
                Ok(json) => {
                    if let Err(err) = on_frame.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        log_callback_error("on_frame callback failed", &err);
                    }
                }
                Err(err) => {
                    log_callback_error("transform serialization failed", &to_js_error(err.into()))
                }
            }
        });
        frames.start();
        self.frames = Some(frames);
    }

    #[wasm_bindgen]
    pub fn stop_frames(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.stop();
        }
    }
}
