//! Geometry value types shared by the camera, applets and controllers
//!
//! All values are `f32`. Surface-space quantities are untransformed by the
//! camera scale; viewport-space quantities are screen pixels.

mod rect;
mod size;
mod vec2;

pub use rect::Rect;
pub use size::Size;
pub use vec2::Vec2;
