//! History controller that broadcasts location changes.

use crate::core::{Listeners, Location, NavState, Subscription};
use crate::history::error::HistoryError;
use crate::host::{MemoryHost, NavigationHost};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

struct Inner<S: NavState, H: NavigationHost> {
    host: H,
    title: String,
    location: RefCell<Rc<Location<S>>>,
    listeners: Rc<RefCell<Listeners<S>>>,
}

impl<S: NavState, H: NavigationHost> Inner<S, H> {
    /// Re-read the host, replace the stored location and notify a snapshot
    /// of the registered listeners in registration order.
    ///
    /// Each listener receives the location stored at the moment it is
    /// called, so a navigation made by an earlier listener is not followed
    /// by a stale delivery to later ones.
    fn transition(&self) {
        let location = Rc::new(read_location::<S, H>(&self.host));
        *self.location.borrow_mut() = Rc::clone(&location);

        let listeners = self.listeners.borrow().snapshot();
        debug!(
            pathname = %location.pathname,
            listeners = listeners.len(),
            "location transition"
        );
        for listener in listeners {
            let current = Rc::clone(&self.location.borrow());
            listener(&current);
        }
    }
}

/// Derive a location from the host's current entry.
///
/// A missing state becomes `None`. A `null` state is kept when `S` decodes
/// it (as `()` or `serde_json::Value` do) and becomes `None` otherwise. Any
/// other state that does not decode into `S` (for example an entry written
/// by another consumer) also becomes `None`.
fn read_location<S: NavState, H: NavigationHost>(host: &H) -> Location<S> {
    let entry = host.current_entry();
    let state = entry.state.and_then(|value| {
        let is_null = value.is_null();
        match serde_json::from_value(value) {
            Ok(state) => Some(state),
            Err(_) if is_null => None,
            Err(error) => {
                warn!(pathname = %entry.pathname, %error, "discarding undecodable history state");
                None
            }
        }
    });

    Location::from_parts(
        &entry.pathname,
        Some(&entry.search),
        Some(&entry.hash),
        state,
    )
}

fn encode_state<S: NavState>(state: Option<&S>) -> Result<Option<Value>, serde_json::Error> {
    state.map(serde_json::to_value).transpose()
}

/// A navigation stack with subscribable location changes.
///
/// `History` wraps a [`NavigationHost`] and keeps a normalized snapshot of
/// its current entry. Every change to that entry is broadcast to
/// subscribers, whether it came from [`push`](Self::push) and
/// [`replace`](Self::replace) or from the host's own traversal (the user's
/// back button, or [`go`](Self::go)).
///
/// Cloning a `History` yields another handle to the same controller.
///
/// # Notification order
///
/// Listeners run synchronously, in registration order, against a snapshot
/// of the registry taken when the transition starts. A listener added during
/// a notification pass is first called on the next transition; a listener
/// removed during a pass is still called in that pass.
///
/// A listener may navigate while a pass is running. Each listener is handed
/// the location current at the moment it is called, so listeners later in
/// the outer pass receive the newest location (possibly twice) and their
/// last delivery always matches [`location`](Self::location).
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use serde_json::json;
/// use waypoint::host::MemoryHost;
/// use waypoint::History;
///
/// let host = MemoryHost::new();
/// let history: History = History::new(host.clone());
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let subscription = history.subscribe(move |location| {
///     sink.borrow_mut().push(location.pathname.clone());
/// });
///
/// history.push("/home?the=query#the-hash", Some(json!({ "state": true })));
/// assert_eq!(history.location().search, "?the=query");
///
/// history.back();
/// host.dispatch_pending();
/// assert_eq!(history.location().pathname, "/");
///
/// subscription.unsubscribe();
/// history.forward();
/// host.dispatch_pending();
///
/// assert_eq!(*seen.borrow(), vec!["/home".to_string(), "/".to_string()]);
/// ```
pub struct History<S: NavState = Value, H: NavigationHost + 'static = MemoryHost> {
    inner: Rc<Inner<S, H>>,
}

impl<S: NavState, H: NavigationHost + 'static> History<S, H> {
    /// Create a history over `host` with default options.
    pub fn new(host: H) -> Self {
        Self::with_title(host, String::new())
    }

    /// Create a history that passes `title` as the title placeholder of
    /// every mutation.
    pub(crate) fn with_title(host: H, title: String) -> Self {
        let location = read_location::<S, H>(&host);
        let inner = Rc::new(Inner {
            host,
            title,
            location: RefCell::new(Rc::new(location)),
            listeners: Rc::new(RefCell::new(Listeners::new())),
        });

        // Bound for the lifetime of the host.
        let weak = Rc::downgrade(&inner);
        inner.host.on_pop_state(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.transition();
            }
        }));

        Self { inner }
    }

    /// The current location.
    pub fn location(&self) -> Location<S> {
        Location::clone(&self.inner.location.borrow())
    }

    /// The host this history drives.
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// Number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Push a new entry onto the stack, discarding any entries after the
    /// current one.
    ///
    /// If the host rejects the push (some platforms cap the number of
    /// calls) or the state cannot be stored, this falls back to a full
    /// document navigation to `url`. The state is lost in that case. No
    /// error is returned either way.
    ///
    /// A state that serializes to `null` (such as `()`) reads back as
    /// `Some` from [`MemoryHost`]. Browsers report a `null` state as absent,
    /// so over `BrowserHost` it reads back as `None`.
    pub fn push(&self, url: &str, state: Option<S>) {
        if let Err(error) = self.try_push(url, state.as_ref()) {
            warn!(url, %error, "push rejected, falling back to document navigation");
            self.inner.host.assign(url);
        }

        self.inner.transition();
    }

    fn try_push(&self, url: &str, state: Option<&S>) -> Result<(), HistoryError> {
        let state = encode_state(state)?;
        self.inner.host.push_state(state, &self.inner.title, url)?;
        Ok(())
    }

    /// Replace the current entry. The stack length is unchanged.
    ///
    /// Failures are returned as-is; on failure the location is unchanged
    /// and no listener is notified.
    pub fn replace(&self, url: &str, state: Option<S>) -> Result<(), HistoryError> {
        let state = encode_state(state.as_ref())?;
        self.inner.host.replace_state(state, &self.inner.title, url)?;

        self.inner.transition();
        Ok(())
    }

    /// Move `delta` entries backward (negative) or forward (positive).
    ///
    /// The resulting location arrives later through the host's pop-state
    /// notification, not before this call returns.
    pub fn go(&self, delta: i32) {
        self.inner.host.go(delta);
    }

    /// Navigate to the previous entry. Identical to `go(-1)`.
    ///
    /// On the first entry of the stack a browser leaves the current
    /// document instead.
    pub fn back(&self) {
        self.go(-1);
    }

    /// Navigate to the next entry. Identical to `go(1)`.
    pub fn forward(&self) {
        self.go(1);
    }

    /// Subscribe a listener to location changes.
    ///
    /// Each call creates an independent registration. Use the returned
    /// handle to unsubscribe.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<S>
    where
        F: Fn(&Location<S>) + 'static,
    {
        let id = self.inner.listeners.borrow_mut().add(Rc::new(listener));
        Subscription::new(&self.inner.listeners, id)
    }
}

impl<S: NavState, H: NavigationHost + 'static> Clone for History<S, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: NavState, H: NavigationHost + 'static> fmt::Debug for History<S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("location", &self.inner.location.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
