//! Waypoint: a subscribable session history
//!
//! Waypoint wraps a session navigation stack (a browser's `window.history`,
//! or the in-memory stack used in tests) and lets application code react to
//! every location change the same way, whether the change came from this
//! library or from the user's back and forward buttons.
//!
//! # Core Concepts
//!
//! - **Location**: Normalized snapshot of the current URL plus its state
//! - **Host**: The navigation stack, consumed through the `NavigationHost` trait
//! - **History**: Controller that mutates the host and notifies subscribers
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use waypoint::host::MemoryHost;
//! use waypoint::History;
//!
//! let host = MemoryHost::new();
//! let history: History = History::new(host.clone());
//!
//! history.push("/1", None);
//! history.push("/2", Some(json!({ "from": "/1" })));
//!
//! history.go(-2);
//! host.dispatch_pending();
//! assert_eq!(history.location().pathname, "/");
//!
//! history.go(2);
//! host.dispatch_pending();
//! assert_eq!(history.location().pathname, "/2");
//! assert_eq!(history.location().state, Some(json!({ "from": "/1" })));
//! ```

pub mod core;
pub mod history;
pub mod host;

// Re-export commonly used types
pub use crate::core::{Location, NavState, Subscription};
pub use history::{BuildError, History, HistoryBuilder, HistoryError};
pub use host::{HostError, MemoryHost, NavigationHost};
