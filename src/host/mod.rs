//! Navigation hosts.
//!
//! A host owns the real navigation stack (a browser's `window.history`, or
//! the in-memory [`MemoryHost`]). The history controller never owns that
//! state; it consumes it through the [`NavigationHost`] trait so that tests
//! can substitute a host with an explicit entry list and controllable
//! failure modes.
//!
//! # Example
//!
//! ```rust
//! use waypoint::host::{MemoryHost, NavigationHost};
//!
//! let host = MemoryHost::new();
//! host.push_state(None, "", "/settings?tab=profile").unwrap();
//!
//! let entry = host.current_entry();
//! assert_eq!(entry.pathname, "/settings");
//! assert_eq!(entry.search, "?tab=profile");
//! assert_eq!(host.len(), 2);
//! ```

mod error;
mod memory;
#[cfg(feature = "web")]
mod web;

pub use error::HostError;
pub use memory::{MemoryEntry, MemoryHost, MemoryHostConfig};
#[cfg(feature = "web")]
pub use web::BrowserHost;

use serde_json::Value;

/// Handler for the host's payload-free "navigation changed" notification.
///
/// The handler receives nothing; it must re-read the current entry.
pub type PopStateHandler = Box<dyn Fn()>;

/// What a host reports about its current entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostEntry {
    pub pathname: String,
    pub search: String,
    pub hash: String,
    /// Structured state stored with the entry, if any
    pub state: Option<Value>,
}

/// The navigation primitives a history controller consumes.
///
/// All methods take `&self`: hosts are shared between the controller and
/// the pop-state handlers it registers, and run on a single thread.
pub trait NavigationHost {
    /// Read the current entry.
    fn current_entry(&self) -> HostEntry;

    /// Append a new entry after the current one, discarding any entries
    /// ahead of it, and make it current.
    fn push_state(&self, state: Option<Value>, title: &str, url: &str) -> Result<(), HostError>;

    /// Overwrite the current entry in place.
    fn replace_state(&self, state: Option<Value>, title: &str, url: &str)
        -> Result<(), HostError>;

    /// Request a move of the stack cursor by `delta` entries.
    ///
    /// The move is observed later through the pop-state notification.
    fn go(&self, delta: i32);

    /// Full document navigation to `url`.
    fn assign(&self, url: &str);

    /// Register a handler for the pop-state notification for the lifetime
    /// of the host.
    fn on_pop_state(&self, handler: PopStateHandler);
}
