//! Z-order registry
//!
//! Paint order is held in a mirror list kept apart from the applets
//! themselves: one marker per live identity, bottom to top. An applet's
//! stacking value is always derived from its marker's position and is never
//! stored anywhere else, so it cannot drift.
//!
//! Values are contiguous and start at 1. `lift` and `unregister` re-broadcast
//! every live applet's value, because moving or removing one marker shifts
//! the index of every marker after it. The broadcast completes before the
//! call returns.

use tracing::{trace, warn};

use crate::error::{DesktopError, DesktopResult};
use crate::types::AppletId;

/// Order-change subscriber, called with an identity and its stacking value
pub type OrderCallback = Box<dyn FnMut(&AppletId, u32)>;

/// Opaque stacking marker for one applet
#[derive(Clone, Debug, PartialEq, Eq)]
struct Mirror {
    applet: AppletId,
}

/// Stacking order of live applets
#[derive(Default)]
pub struct ZOrderRegistry {
    /// Bottom first
    mirrors: Vec<Mirror>,
    listeners: Vec<OrderCallback>,
}

impl std::fmt::Debug for ZOrderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZOrderRegistry")
            .field("mirrors", &self.mirrors)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ZOrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to stacking value changes
    pub fn on_order_change(&mut self, callback: impl FnMut(&AppletId, u32) + 'static) {
        self.listeners.push(Box::new(callback));
    }

    /// Add a mirror on top of the stack and notify for that applet
    pub fn register(&mut self, id: &AppletId) -> DesktopResult<()> {
        if self.index_of(id).is_some() {
            return Err(DesktopError::DuplicateIdentity(id.clone()));
        }
        self.mirrors.push(Mirror { applet: id.clone() });
        let value = self.mirrors.len() as u32;
        trace!(applet = %id, value, "registered mirror");
        for listener in &mut self.listeners {
            listener(id, value);
        }
        Ok(())
    }

    /// Move an applet's mirror to the top and re-broadcast every value
    pub fn lift(&mut self, id: &AppletId) -> DesktopResult<()> {
        let index = self.require_index(id)?;
        let mirror = self.mirrors.remove(index);
        self.mirrors.push(mirror);
        trace!(applet = %id, from = index, "lifted mirror");
        self.broadcast();
        Ok(())
    }

    /// Drop an applet's mirror and re-broadcast the remaining values
    pub fn unregister(&mut self, id: &AppletId) -> DesktopResult<()> {
        let index = self.require_index(id)?;
        self.mirrors.remove(index);
        trace!(applet = %id, "unregistered mirror");
        self.broadcast();
        Ok(())
    }

    /// Stacking value (1 = bottom) derived from the mirror position
    pub fn stacking_value(&self, id: &AppletId) -> Option<u32> {
        self.index_of(id).map(|i| i as u32 + 1)
    }

    /// Identities bottom to top
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &AppletId> {
        self.mirrors.iter().map(|m| &m.applet)
    }

    /// Topmost identity
    pub fn top(&self) -> Option<&AppletId> {
        self.mirrors.last().map(|m| &m.applet)
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    fn index_of(&self, id: &AppletId) -> Option<usize> {
        self.mirrors.iter().position(|m| &m.applet == id)
    }

    fn require_index(&self, id: &AppletId) -> DesktopResult<usize> {
        self.index_of(id).ok_or_else(|| {
            warn!(applet = %id, "no z-order mirror");
            DesktopError::NotMirrored(id.clone())
        })
    }

    fn broadcast(&mut self) {
        let Self { mirrors, listeners } = self;
        for (index, mirror) in mirrors.iter().enumerate() {
            for listener in listeners.iter_mut() {
                listener(&mirror.applet, index as u32 + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(AppletId, u32)>>>;

    fn registry_with_log() -> (ZOrderRegistry, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ZOrderRegistry::new();
        let sink = Rc::clone(&log);
        registry.on_order_change(move |id, value| sink.borrow_mut().push((id.clone(), value)));
        (registry, log)
    }

    fn ids() -> (AppletId, AppletId, AppletId) {
        (AppletId::from("a"), AppletId::from("b"), AppletId::from("c"))
    }

    #[test]
    fn test_register_appends_on_top() {
        let (mut registry, log) = registry_with_log();
        let (a, b, c) = ids();
        for id in [&a, &b, &c] {
            registry.register(id).unwrap();
        }

        assert_eq!(registry.stacking_value(&a), Some(1));
        assert_eq!(registry.stacking_value(&b), Some(2));
        assert_eq!(registry.stacking_value(&c), Some(3));
        assert_eq!(registry.top(), Some(&c));
        // Registration notifies only the new applet
        assert_eq!(
            *log.borrow(),
            vec![(a.clone(), 1), (b.clone(), 2), (c.clone(), 3)]
        );
    }

    #[test]
    fn test_lift_moves_to_top_and_rebroadcasts() {
        let (mut registry, log) = registry_with_log();
        let (a, b, c) = ids();
        for id in [&a, &b, &c] {
            registry.register(id).unwrap();
        }
        log.borrow_mut().clear();

        registry.lift(&a).unwrap();

        assert_eq!(registry.stacking_value(&b), Some(1));
        assert_eq!(registry.stacking_value(&c), Some(2));
        assert_eq!(registry.stacking_value(&a), Some(3));
        assert_eq!(*log.borrow(), vec![(b, 1), (c, 2), (a, 3)]);
    }

    #[test]
    fn test_lift_topmost_keeps_order_but_broadcasts() {
        let (mut registry, log) = registry_with_log();
        let (a, b, c) = ids();
        for id in [&a, &b, &c] {
            registry.register(id).unwrap();
        }
        log.borrow_mut().clear();

        registry.lift(&c).unwrap();

        let order: Vec<_> = registry.ids().cloned().collect();
        assert_eq!(order, vec![a, b, c.clone()]);
        assert_eq!(registry.top(), Some(&c));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_unregister_rebroadcasts_remaining() {
        let (mut registry, log) = registry_with_log();
        let (a, b, c) = ids();
        for id in [&a, &b, &c] {
            registry.register(id).unwrap();
        }
        log.borrow_mut().clear();

        registry.unregister(&c).unwrap();

        assert_eq!(*log.borrow(), vec![(a, 1), (b, 2)]);
        assert_eq!(registry.stacking_value(&c), None);
    }

    #[test]
    fn test_unknown_identity_errors() {
        let mut registry = ZOrderRegistry::new();
        let ghost = AppletId::from("ghost");
        assert_eq!(
            registry.lift(&ghost).unwrap_err(),
            DesktopError::NotMirrored(ghost.clone())
        );
        assert_eq!(
            registry.unregister(&ghost).unwrap_err(),
            DesktopError::NotMirrored(ghost)
        );
    }

    #[test]
    fn test_register_twice_rejected() {
        let mut registry = ZOrderRegistry::new();
        let a = AppletId::from("a");
        registry.register(&a).unwrap();
        assert_eq!(
            registry.register(&a).unwrap_err(),
            DesktopError::DuplicateIdentity(a)
        );
        assert_eq!(registry.len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Register,
        Lift(usize),
        Unregister(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Register),
            any::<usize>().prop_map(Op::Lift),
            any::<usize>().prop_map(Op::Unregister),
        ]
    }

    proptest! {
        /// Stacking values are always exactly 1..=N with no gaps or duplicates
        #[test]
        fn stacking_values_contiguous(ops in prop::collection::vec(op(), 0..64)) {
            let mut registry = ZOrderRegistry::new();
            let mut live: Vec<AppletId> = Vec::new();
            let mut next = 0u32;

            for op in ops {
                match op {
                    Op::Register => {
                        let id = AppletId::from(format!("applet-{}", next));
                        next += 1;
                        registry.register(&id).unwrap();
                        live.push(id);
                    }
                    Op::Lift(i) if !live.is_empty() => {
                        let id = live[i % live.len()].clone();
                        registry.lift(&id).unwrap();
                        prop_assert_eq!(registry.top(), Some(&id));
                    }
                    Op::Unregister(i) if !live.is_empty() => {
                        let id = live.remove(i % live.len());
                        registry.unregister(&id).unwrap();
                    }
                    _ => {}
                }

                let mut values: Vec<u32> = live
                    .iter()
                    .map(|id| registry.stacking_value(id).unwrap())
                    .collect();
                values.sort_unstable();
                let expected: Vec<u32> = (1..=live.len() as u32).collect();
                prop_assert_eq!(values, expected);
            }
        }
    }
}
