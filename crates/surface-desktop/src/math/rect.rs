//! Axis-aligned rectangle in `left/top/width/height` form

use serde::{Deserialize, Serialize};

use super::{Size, Vec2};

/// Axis-aligned rectangle
///
/// `x`/`y` are the left and top edges; the rectangle extends right and down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from position and size
    pub fn from_pos_size(pos: Vec2, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    /// Rectangle of `size` centered on `center`
    pub fn centered_on(center: Vec2, size: Size) -> Self {
        Self::new(
            center.x - size.width * 0.5,
            center.y - size.height * 0.5,
            size.width,
            size.height,
        )
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same size, shifted by `offset`
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Check if a point is inside the rectangle (right/bottom edges exclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(Vec2::new(50.0, 40.0)));
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(!rect.contains(Vec2::new(110.0, 40.0)));
        assert!(!rect.contains(Vec2::new(50.0, 70.0)));
    }

    #[test]
    fn test_rect_centered_on() {
        let rect = Rect::centered_on(Vec2::new(500.0, 400.0), Size::new(200.0, 100.0));
        assert_eq!(rect, Rect::new(400.0, 350.0, 200.0, 100.0));
        assert_eq!(rect.center(), Vec2::new(500.0, 400.0));
    }

    #[test]
    fn test_rect_translated_keeps_size() {
        let rect = Rect::new(0.0, 0.0, 30.0, 40.0).translated(Vec2::new(5.0, -5.0));
        assert_eq!(rect.position(), Vec2::new(5.0, -5.0));
        assert_eq!(rect.size(), Size::new(30.0, 40.0));
    }
}
