//! Drag controller
//!
//! Pointer deltas arrive in viewport pixels and are divided by the camera
//! scale before they touch applet geometry, since the surface itself is
//! drawn scaled.

use crate::applet::{Applet, Motion};
use crate::math::{Rect, Vec2};
use crate::types::AppletId;

/// How drag movement is written to the applet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragMode {
    /// Accumulate into the applet's translation; `left`/`top` stay put
    #[default]
    Translate,
    /// Write `left`/`top` on every move (precision modifier held)
    Direct,
}

/// An applet being dragged
#[derive(Clone, Debug, PartialEq)]
pub struct DragGesture {
    applet: AppletId,
    /// Committed geometry when the drag began
    start_rect: Rect,
    /// Pointer position of the previous event (viewport px)
    last_pointer: Vec2,
    mode: DragMode,
}

impl DragGesture {
    /// Start dragging `applet`: mark it elevated with a zero translation
    pub fn begin(id: AppletId, applet: &mut Applet, pointer: Vec2) -> Self {
        applet.commit_translation();
        applet.set_motion(Motion::Elevated);
        Self {
            applet: id,
            start_rect: applet.rect(),
            last_pointer: pointer,
            mode: DragMode::Translate,
        }
    }

    pub fn applet(&self) -> &AppletId {
        &self.applet
    }

    pub fn start_rect(&self) -> Rect {
        self.start_rect
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Apply one pointer move
    pub fn update(&mut self, applet: &mut Applet, pointer: Vec2, scale: f32, precise: bool) {
        let delta = (pointer - self.last_pointer) / scale;
        self.last_pointer = pointer;

        self.mode = if precise {
            DragMode::Direct
        } else {
            DragMode::Translate
        };

        match self.mode {
            DragMode::Translate => {
                applet.set_translation(applet.translation() + delta);
            }
            DragMode::Direct => {
                applet.commit_translation();
                applet.set_rect(applet.rect().translated(delta));
            }
        }
    }

    /// Commit the translation into `left`/`top` and return the applet to idle
    pub fn finish(self, applet: &mut Applet) {
        applet.commit_translation();
        applet.set_motion(Motion::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppletKind;

    fn applet() -> Applet {
        Applet::new(AppletKind::Test, Rect::new(100.0, 100.0, 200.0, 150.0))
    }

    #[test]
    fn test_begin_elevates() {
        let mut applet = applet();
        let drag = DragGesture::begin(AppletId::from("a"), &mut applet, Vec2::ZERO);
        assert_eq!(applet.motion(), Motion::Elevated);
        assert!(!applet.motion().content_interactive());
        assert_eq!(drag.start_rect(), Rect::new(100.0, 100.0, 200.0, 150.0));
        assert_eq!(drag.mode(), DragMode::Translate);
    }

    #[test]
    fn test_translate_mode_leaves_rect_until_finish() {
        let mut applet = applet();
        let mut drag = DragGesture::begin(AppletId::from("a"), &mut applet, Vec2::new(10.0, 10.0));

        drag.update(&mut applet, Vec2::new(30.0, 10.0), 1.0, false);
        drag.update(&mut applet, Vec2::new(60.0, 10.0), 1.0, false);

        assert_eq!(applet.rect().x, 100.0);
        assert_eq!(applet.translation(), Vec2::new(50.0, 0.0));
        assert_eq!(applet.visual_rect().x, 150.0);

        drag.finish(&mut applet);
        assert_eq!(applet.rect(), Rect::new(150.0, 100.0, 200.0, 150.0));
        assert_eq!(applet.translation(), Vec2::ZERO);
        assert_eq!(applet.motion(), Motion::Idle);
    }

    #[test]
    fn test_delta_divided_by_scale() {
        let mut applet = applet();
        let mut drag = DragGesture::begin(AppletId::from("a"), &mut applet, Vec2::ZERO);
        drag.update(&mut applet, Vec2::new(50.0, 0.0), 0.5, false);
        drag.finish(&mut applet);
        assert_eq!(applet.rect().x, 200.0);
    }

    #[test]
    fn test_direct_mode_writes_left_top() {
        let mut applet = applet();
        let mut drag = DragGesture::begin(AppletId::from("a"), &mut applet, Vec2::ZERO);

        drag.update(&mut applet, Vec2::new(20.0, 0.0), 1.0, false);
        drag.update(&mut applet, Vec2::new(20.0, 30.0), 1.0, true);

        assert_eq!(drag.mode(), DragMode::Direct);
        // Earlier translation is folded in before the direct write
        assert_eq!(applet.rect().position(), Vec2::new(120.0, 130.0));
        assert_eq!(applet.translation(), Vec2::ZERO);

        drag.update(&mut applet, Vec2::new(25.0, 30.0), 1.0, false);
        assert_eq!(drag.mode(), DragMode::Translate);
        drag.finish(&mut applet);
        assert_eq!(applet.rect().position(), Vec2::new(125.0, 130.0));
    }
}
