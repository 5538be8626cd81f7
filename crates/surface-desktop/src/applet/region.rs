//! Hit-test regions of an applet

use serde::{Deserialize, Serialize};

use crate::math::{Rect, Vec2};

/// One of the eight invisible resize handles around an applet
///
/// Each handle carries the set of edges it moves and the cursor shown while
/// hovering it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    /// All handles, corners first so they win hit tests at the corners
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::NE,
        ResizeHandle::SW,
        ResizeHandle::SE,
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
    ];

    /// Moves the top edge
    pub fn north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    /// Moves the bottom edge
    pub fn south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    /// Moves the right edge
    pub fn east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    /// Moves the left edge
    pub fn west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    /// CSS cursor shown over this handle
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::N => "n-resize",
            ResizeHandle::S => "s-resize",
            ResizeHandle::E => "e-resize",
            ResizeHandle::W => "w-resize",
            ResizeHandle::NE | ResizeHandle::SW => "nesw-resize",
            ResizeHandle::NW | ResizeHandle::SE => "nwse-resize",
        }
    }

    /// Parse a direction string ("n", "se", ...)
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "n" => Some(ResizeHandle::N),
            "s" => Some(ResizeHandle::S),
            "e" => Some(ResizeHandle::E),
            "w" => Some(ResizeHandle::W),
            "ne" => Some(ResizeHandle::NE),
            "nw" => Some(ResizeHandle::NW),
            "se" => Some(ResizeHandle::SE),
            "sw" => Some(ResizeHandle::SW),
            _ => None,
        }
    }

    /// Corner handle for the quadrant of `rect` that contains `point`
    ///
    /// Points exactly on a midpoint fall to the south/east side.
    pub fn quadrant(rect: Rect, point: Vec2) -> Self {
        let center = rect.center();
        match (point.y < center.y, point.x < center.x) {
            (true, true) => ResizeHandle::NW,
            (true, false) => ResizeHandle::NE,
            (false, true) => ResizeHandle::SW,
            (false, false) => ResizeHandle::SE,
        }
    }

    /// Hit rectangle of this handle, `size` thick, inside `rect`
    pub fn hit_rect(self, rect: Rect, size: f32) -> Rect {
        let inner_w = (rect.width - size * 2.0).max(0.0);
        let inner_h = (rect.height - size * 2.0).max(0.0);
        let right = rect.right() - size;
        let bottom = rect.bottom() - size;
        match self {
            ResizeHandle::N => Rect::new(rect.x + size, rect.y, inner_w, size),
            ResizeHandle::S => Rect::new(rect.x + size, bottom, inner_w, size),
            ResizeHandle::W => Rect::new(rect.x, rect.y + size, size, inner_h),
            ResizeHandle::E => Rect::new(right, rect.y + size, size, inner_h),
            ResizeHandle::NW => Rect::new(rect.x, rect.y, size, size),
            ResizeHandle::NE => Rect::new(right, rect.y, size, size),
            ResizeHandle::SW => Rect::new(rect.x, bottom, size, size),
            ResizeHandle::SE => Rect::new(right, bottom, size, size),
        }
    }
}

/// What part of an applet a pointer landed on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppletRegion {
    /// One of the resize handles
    Resize(ResizeHandle),
    /// The drag handle strip
    DragHandle,
    /// Anywhere else inside the applet
    Body,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_sets() {
        assert!(ResizeHandle::NW.north() && ResizeHandle::NW.west());
        assert!(!ResizeHandle::NW.south() && !ResizeHandle::NW.east());
        assert!(ResizeHandle::E.east());
        assert!(!ResizeHandle::E.north() && !ResizeHandle::E.south());
        for handle in ResizeHandle::ALL {
            assert!(!(handle.north() && handle.south()));
            assert!(!(handle.east() && handle.west()));
        }
    }

    #[test]
    fn test_from_id() {
        assert_eq!(ResizeHandle::from_id("se"), Some(ResizeHandle::SE));
        assert_eq!(ResizeHandle::from_id("w"), Some(ResizeHandle::W));
        assert_eq!(ResizeHandle::from_id("middle"), None);
    }

    #[test]
    fn test_cursor_affordances() {
        assert_eq!(ResizeHandle::SE.cursor(), "nwse-resize");
        assert_eq!(ResizeHandle::NE.cursor(), "nesw-resize");
        assert_eq!(ResizeHandle::N.cursor(), "n-resize");
    }

    #[test]
    fn test_quadrant() {
        let rect = Rect::new(100.0, 100.0, 200.0, 150.0);
        assert_eq!(ResizeHandle::quadrant(rect, Vec2::new(120.0, 120.0)), ResizeHandle::NW);
        assert_eq!(ResizeHandle::quadrant(rect, Vec2::new(280.0, 120.0)), ResizeHandle::NE);
        assert_eq!(ResizeHandle::quadrant(rect, Vec2::new(120.0, 240.0)), ResizeHandle::SW);
        assert_eq!(ResizeHandle::quadrant(rect, Vec2::new(280.0, 240.0)), ResizeHandle::SE);
    }
}
