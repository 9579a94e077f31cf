//! The history controller.
//!
//! [`History`] is the imperative shell around the pure [`crate::core`] types:
//! it drives a [`NavigationHost`](crate::host::NavigationHost), re-derives
//! the current [`Location`](crate::core::Location) after every change and
//! broadcasts it to subscribers.
//!
//! # Transitions
//!
//! - `push` and `replace` notify subscribers before they return
//! - `go`, `back` and `forward` only request a traversal; the notification
//!   arrives when the host fires its pop-state event
//! - a rejected `push` falls back to a full document navigation

mod builder;
mod controller;
mod error;

pub use builder::HistoryBuilder;
pub use controller::History;
pub use error::{BuildError, HistoryError};
