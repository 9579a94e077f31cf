//! Listener registry for location changes.
//!
//! Listeners are kept in registration order. Fan-out works on a snapshot of
//! the registry, so registrations and removals made by a listener while a
//! notification pass is running only affect later passes.

use super::location::Location;
use super::state::NavState;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A subscriber to the stream of locations.
pub type Listener<S> = Rc<dyn Fn(&Location<S>)>;

/// Identifies one registration in a [`Listeners`] registry.
///
/// Ids are never reused, so removing an id twice cannot remove a later
/// registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Insertion-ordered set of listener registrations.
///
/// Every call to [`add`](Self::add) is a distinct registration, even when the
/// same closure (or a clone of the same `Rc`) is added more than once.
pub struct Listeners<S: NavState> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<S>)>,
}

impl<S: NavState> Default for Listeners<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NavState> Listeners<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a listener at the end of the notification order.
    pub fn add(&mut self, listener: Listener<S>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a registration. Returns `false` if it was already removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Check whether a registration is still live.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Copy of the current listeners, in registration order.
    pub fn snapshot(&self) -> Vec<Listener<S>> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: NavState> fmt::Debug for Listeners<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle does not unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe) to stop delivery.
pub struct Subscription<S: NavState> {
    registry: Weak<RefCell<Listeners<S>>>,
    id: ListenerId,
}

impl<S: NavState> Subscription<S> {
    pub(crate) fn new(registry: &Rc<RefCell<Listeners<S>>>, id: ListenerId) -> Self {
        Self {
            registry: Rc::downgrade(registry),
            id,
        }
    }

    /// Remove this registration.
    ///
    /// Takes effect for every transition that starts after the call. Calling
    /// it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }

    /// Whether the registration is still receiving locations.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(self.id))
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<S: NavState> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
