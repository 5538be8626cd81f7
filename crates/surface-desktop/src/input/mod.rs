//! Input routing and gesture controllers
//!
//! A pointer-down claims at most one gesture (pan, drag or one of the two
//! resize variants). Moves feed the active gesture; pointer-up, blur or
//! pointer-leave all finish it through the same cleanup path.

mod drag;
mod event;
mod gesture;
mod resize;

pub use drag::{DragGesture, DragMode};
pub use event::{InputResult, Key, Modifiers, PointerButton};
pub use gesture::{Gesture, GestureKind, InputRouter, PanGesture};
pub use resize::{resize_rect, ResizeGesture, ResizeVariant};
