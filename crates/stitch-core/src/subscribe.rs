#![forbid(unsafe_code)]

//! Weakly-held subscriber callbacks and the RAII guard that owns them.
//!
//! # Design
//!
//! A [`SubscriberSet`] stores callbacks as `Weak` references. The strong
//! reference lives inside the [`Subscription`] guard handed back to the
//! subscriber, so a callback's natural lifetime controls its removal: drop
//! the guard and the callback becomes unreachable. Dead entries are pruned
//! lazily when the live set is snapshotted for a notification pass.
//!
//! # Failure Modes
//!
//! - **Guard leak**: storing `Subscription` guards indefinitely keeps their
//!   callbacks alive; the set itself never grows unboundedly because dead
//!   weak references are dropped on the next snapshot.
//! - **Re-entrant notification**: [`SubscriberSet::live`] releases its
//!   interior borrow before returning, so callbacks may subscribe or notify
//!   again without panicking.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A subscriber callback held strongly by its [`Subscription`] guard.
pub type CallbackRc = Rc<dyn Fn()>;
type CallbackWeak = Weak<dyn Fn()>;

/// A set of weakly-held subscriber callbacks for one (property, owner) pair.
///
/// Cloning a `SubscriberSet` creates a new handle to the **same** set.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    inner: Rc<RefCell<Vec<CallbackWeak>>>,
}

impl SubscriberSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback, weakly held.
    ///
    /// The returned [`Subscription`] guard owns the callback: dropping it
    /// unsubscribes (the callback will not run after drop, though its dead
    /// entry may linger until the next notification prunes it).
    pub fn add(&self, callback: impl Fn() + 'static) -> Subscription {
        let strong: CallbackRc = Rc::new(callback);
        self.inner.borrow_mut().push(Rc::downgrade(&strong));
        Subscription { _callback: strong }
    }

    /// Snapshot the live callbacks, pruning dead entries.
    ///
    /// The interior borrow is released before returning, so callers may
    /// invoke the returned callbacks without holding any borrow, which
    /// re-entrant notification requires.
    #[must_use]
    pub fn live(&self) -> Vec<CallbackRc> {
        let mut subscribers = self.inner.borrow_mut();
        subscribers.retain(|weak| weak.strong_count() > 0);
        subscribers.iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of entries, counting dead ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the set holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl fmt::Debug for SubscriberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberSet")
            .field("len", &self.len())
            .finish()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the only strong reference to the callback, so
/// the `Weak` entry in the owning [`SubscriberSet`] loses its referent and
/// is pruned on the next notification cycle.
#[must_use = "dropping the guard unsubscribes the callback"]
pub struct Subscription {
    _callback: CallbackRc,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn live_snapshot_invokes_added_callbacks() {
        let set = SubscriberSet::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = set.add(move || count_clone.set(count_clone.get() + 1));

        for cb in set.live() {
            cb();
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dropped_guard_is_pruned() {
        let set = SubscriberSet::new();
        let sub = set.add(|| {});
        let _kept = set.add(|| {});
        assert_eq!(set.len(), 2);

        drop(sub);
        // Dead entry still present until the next snapshot.
        assert_eq!(set.len(), 2);
        assert_eq!(set.live().len(), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clone_shares_the_set() {
        let set = SubscriberSet::new();
        let alias = set.clone();
        let _sub = alias.add(|| {});
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn callback_may_resubscribe_during_invocation() {
        let set = SubscriberSet::new();
        let set_clone = set.clone();
        let parked: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let parked_clone = Rc::clone(&parked);
        let _sub = set.add(move || {
            parked_clone.borrow_mut().push(set_clone.add(|| {}));
        });

        for cb in set.live() {
            cb();
        }
        assert_eq!(set.len(), 2);
    }
}
