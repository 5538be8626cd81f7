//! Applet registry
//!
//! Owns every live applet, assigns identities on first placement, and
//! invokes placement/removal subscribers synchronously.
//!
//! An applet that arrives already `Elevated` under an identity that is live is
//! treated as a re-parent of an applet mid-drag, not as a fresh placement: the
//! stored node takes the new attributes but keeps its geometry, translation and
//! motion, and no subscriber runs.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{Applet, Motion};
use crate::error::{DesktopError, DesktopResult};
use crate::types::AppletId;

/// Placement/removal subscriber
pub type AppletCallback = Box<dyn FnMut(&Applet)>;

/// Outcome of [`AppletRegistry::place`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// A new applet went live; subscribers were notified
    Placed(AppletId),
    /// A live applet was re-attached mid-drag; nobody was notified
    Reparented(AppletId),
}

impl Placement {
    pub fn id(&self) -> &AppletId {
        match self {
            Placement::Placed(id) | Placement::Reparented(id) => id,
        }
    }
}

/// Registry of live applets
#[derive(Default)]
pub struct AppletRegistry {
    applets: HashMap<AppletId, Applet>,
    /// Identities that were live earlier in this session
    retired: HashSet<AppletId>,
    on_place: Vec<AppletCallback>,
    on_remove: Vec<AppletCallback>,
}

impl std::fmt::Debug for AppletRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppletRegistry")
            .field("applets", &self.applets.len())
            .field("retired", &self.retired.len())
            .field("on_place", &self.on_place.len())
            .field("on_remove", &self.on_remove.len())
            .finish()
    }
}

impl AppletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to placements
    pub fn on_place(&mut self, callback: impl FnMut(&Applet) + 'static) {
        self.on_place.push(Box::new(callback));
    }

    /// Subscribe to removals
    pub fn on_remove(&mut self, callback: impl FnMut(&Applet) + 'static) {
        self.on_remove.push(Box::new(callback));
    }

    /// Make an applet live
    ///
    /// Assigns a fresh identity if the applet has none. The identity is set
    /// before any subscriber sees the applet.
    pub fn place(&mut self, mut applet: Applet) -> DesktopResult<Placement> {
        if applet.motion() == Motion::Elevated {
            let live = applet
                .id()
                .cloned()
                .and_then(|id| self.applets.get_mut(&id).map(|live| (id, live)));
            return match live {
                Some((id, live)) if live.motion() == Motion::Elevated => {
                    // Geometry and motion stay owned by the running gesture
                    applet.set_rect(live.rect());
                    applet.set_translation(live.translation());
                    applet.set_motion(live.motion());
                    *live = applet;
                    debug!(applet = %id, "re-parented elevated applet");
                    Ok(Placement::Reparented(id))
                }
                _ => Err(DesktopError::InvalidOperation {
                    op: "place",
                    reason: "no elevated live applet with this identity",
                }),
            };
        }

        let id = match applet.id() {
            Some(id) => id.clone(),
            None => AppletId::generate(),
        };
        if self.applets.contains_key(&id) || self.retired.contains(&id) {
            return Err(DesktopError::DuplicateIdentity(id));
        }

        applet.assign_id(id.clone());
        debug!(applet = %id, kind = applet.kind.id(), "placed applet");
        for callback in &mut self.on_place {
            callback(&applet);
        }
        self.applets.insert(id.clone(), applet);
        Ok(Placement::Placed(id))
    }

    /// Take an applet off the surface and notify removal subscribers
    pub fn remove(&mut self, id: &AppletId) -> DesktopResult<Applet> {
        let applet = self
            .applets
            .remove(id)
            .ok_or_else(|| DesktopError::AppletNotFound(id.clone()))?;
        self.retired.insert(id.clone());
        debug!(applet = %id, "removed applet");
        for callback in &mut self.on_remove {
            callback(&applet);
        }
        Ok(applet)
    }

    pub fn get(&self, id: &AppletId) -> Option<&Applet> {
        self.applets.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &AppletId) -> DesktopResult<&mut Applet> {
        self.applets
            .get_mut(id)
            .ok_or_else(|| DesktopError::AppletNotFound(id.clone()))
    }

    pub fn contains(&self, id: &AppletId) -> bool {
        self.applets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.applets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applets.is_empty()
    }

    /// Live applets in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Applet> {
        self.applets.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Rect, Size, Vec2};
    use crate::types::AppletKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn applet() -> Applet {
        Applet::new(AppletKind::Sticky, Rect::new(0.0, 0.0, 200.0, 150.0))
    }

    #[test]
    fn test_place_assigns_identity_before_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = AppletRegistry::new();
        let sink = Rc::clone(&seen);
        registry.on_place(move |applet| sink.borrow_mut().push(applet.id().cloned()));

        let placement = registry.place(applet()).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_ref(), Some(placement.id()));
        assert!(registry.contains(placement.id()));
    }

    #[test]
    fn test_all_subscribers_invoked() {
        let count = Rc::new(RefCell::new(0));
        let mut registry = AppletRegistry::new();
        for _ in 0..3 {
            let count = Rc::clone(&count);
            registry.on_place(move |_| *count.borrow_mut() += 1);
        }
        registry.place(applet()).unwrap();
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn test_preassigned_identity_kept() {
        let mut registry = AppletRegistry::new();
        let placement = registry
            .place(applet().with_id(AppletId::from("note-1")))
            .unwrap();
        assert_eq!(placement, Placement::Placed(AppletId::from("note-1")));
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut registry = AppletRegistry::new();
        let id = AppletId::from("dup");
        registry.place(applet().with_id(id.clone())).unwrap();

        let err = registry.place(applet().with_id(id.clone())).unwrap_err();
        assert_eq!(err, DesktopError::DuplicateIdentity(id.clone()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_identity_not_reusable_after_removal() {
        let mut registry = AppletRegistry::new();
        let id = AppletId::from("gone");
        registry.place(applet().with_id(id.clone())).unwrap();
        registry.remove(&id).unwrap();

        let err = registry.place(applet().with_id(id.clone())).unwrap_err();
        assert_eq!(err, DesktopError::DuplicateIdentity(id));
    }

    #[test]
    fn test_remove_notifies_and_returns_applet() {
        let removed = Rc::new(RefCell::new(Vec::new()));
        let mut registry = AppletRegistry::new();
        let sink = Rc::clone(&removed);
        registry.on_remove(move |applet| sink.borrow_mut().push(applet.id().cloned()));

        let id = registry.place(applet()).unwrap().id().clone();
        let applet = registry.remove(&id).unwrap();

        assert_eq!(applet.id(), Some(&id));
        assert_eq!(*removed.borrow(), vec![Some(id.clone())]);
        assert!(registry.is_empty());
        assert_eq!(
            registry.remove(&id).unwrap_err(),
            DesktopError::AppletNotFound(id)
        );
    }

    #[test]
    fn test_elevated_live_applet_is_reparented_silently() {
        let placed = Rc::new(RefCell::new(0));
        let mut registry = AppletRegistry::new();
        let count = Rc::clone(&placed);
        registry.on_place(move |_| *count.borrow_mut() += 1);

        let id = registry.place(applet()).unwrap().id().clone();
        let live = registry.get_mut(&id).unwrap();
        live.set_motion(Motion::Elevated);
        live.set_translation(Vec2::new(25.0, 0.0));

        let mut moved = registry
            .get(&id)
            .unwrap()
            .clone()
            .with_min_size(Size::new(150.0, 90.0));
        moved.set_rect(Rect::new(40.0, 40.0, 200.0, 150.0));
        moved.set_translation(Vec2::ZERO);

        let placement = registry.place(moved).unwrap();

        assert_eq!(placement, Placement::Reparented(id.clone()));
        assert_eq!(*placed.borrow(), 1);
        assert_eq!(registry.len(), 1);
        let stored = registry.get(&id).unwrap();
        assert_eq!(stored.rect().x, 0.0);
        assert_eq!(stored.translation(), Vec2::new(25.0, 0.0));
        assert_eq!(stored.motion(), Motion::Elevated);
        assert_eq!(stored.min_size, Some(Size::new(150.0, 90.0)));
    }

    #[test]
    fn test_elevated_copy_of_idle_applet_rejected() {
        let mut registry = AppletRegistry::new();
        let id = registry.place(applet()).unwrap().id().clone();
        let mut stale = registry.get(&id).unwrap().clone();
        stale.set_motion(Motion::Elevated);
        stale.set_rect(Rect::new(500.0, 500.0, 200.0, 150.0));

        assert!(matches!(
            registry.place(stale),
            Err(DesktopError::InvalidOperation { op: "place", .. })
        ));
        let stored = registry.get(&id).unwrap();
        assert_eq!(stored.motion(), Motion::Idle);
        assert_eq!(stored.rect().x, 0.0);
    }

    #[test]
    fn test_elevated_unknown_applet_rejected() {
        let mut registry = AppletRegistry::new();
        let mut stray = applet();
        stray.set_motion(Motion::Elevated);
        assert!(matches!(
            registry.place(stray),
            Err(DesktopError::InvalidOperation { op: "place", .. })
        ));
    }
}
