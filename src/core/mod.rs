//! Core location types.
//!
//! This module contains the pure value types shared by every host:
//! - `Location` snapshots and their normalization rules
//! - The `NavState` bound on state payloads
//! - The listener registry and subscription handles
//!
//! Nothing here talks to a navigation host; see [`crate::host`] for that.

mod listeners;
mod location;
mod state;

pub use listeners::{Listener, ListenerId, Listeners, Subscription};
pub use location::Location;
pub use state::NavState;
