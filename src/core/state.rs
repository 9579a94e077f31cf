//! State payloads attached to history entries.
//!
//! A navigation host stores the state of each entry as a structured value
//! (the analogue of a browser's structured clone). Any type that can make the
//! round trip through `serde` can be used as the payload of a [`Location`].
//!
//! [`Location`]: super::Location

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait for state payloads carried by history entries.
///
/// # Required Traits
///
/// - `Clone`: every listener receives the same snapshot
/// - `PartialEq`: locations must be comparable
/// - `Debug`: locations must be debuggable for diagnostics
/// - `Serialize` + `DeserializeOwned`: the host stores payloads as structured values
///
/// Implemented for every type satisfying these bounds, so there is nothing to
/// implement by hand.
///
/// # Example
///
/// ```rust
/// use waypoint::core::NavState;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct ScrollState {
///     offset: u32,
/// }
///
/// fn accepts_state<S: NavState>(_state: S) {}
///
/// accepts_state(ScrollState { offset: 120 });
/// accepts_state(serde_json::json!({ "modal": true }));
/// ```
pub trait NavState: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}

impl<T> NavState for T where T: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Panel {
        Closed,
        Open { tab: String },
    }

    fn is_nav_state<S: NavState>() -> bool {
        true
    }

    #[test]
    fn json_values_are_nav_state() {
        assert!(is_nav_state::<serde_json::Value>());
    }

    #[test]
    fn custom_types_are_nav_state() {
        assert!(is_nav_state::<Panel>());
    }

    #[test]
    fn state_survives_structured_value_round_trip() {
        let state = Panel::Open {
            tab: "settings".to_string(),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value, json!({ "Open": { "tab": "settings" } }));

        let restored: Panel = serde_json::from_value(value).unwrap();
        assert_eq!(restored, state);
        assert_ne!(restored, Panel::Closed);
    }
}
