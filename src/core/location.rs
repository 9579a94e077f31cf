//! Normalized snapshot of the current history entry.

use super::state::NavState;
use serde::{Deserialize, Serialize};
use url::Url;

/// An entry in a history stack.
///
/// Locations are immutable values: every transition produces a new one
/// rather than mutating the previous snapshot.
///
/// Invariants:
/// - `pathname` always begins with `/`
/// - `search` is empty or begins with `?`
/// - `hash` is empty or begins with `#`
///
/// # Example
///
/// ```rust
/// use waypoint::core::Location;
/// use serde_json::json;
/// use url::Url;
///
/// let url = Url::parse("http://localhost/home?the=query#the-hash").unwrap();
/// let location = Location::from_url(&url, Some(json!({ "state": true })));
///
/// assert_eq!(location.pathname, "/home");
/// assert_eq!(location.search, "?the=query");
/// assert_eq!(location.hash, "#the-hash");
/// assert_eq!(location.state, Some(json!({ "state": true })));
/// assert_eq!(location.path(), "/home?the=query#the-hash");
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Location<S: NavState = serde_json::Value> {
    /// A URL pathname, beginning with a `/`
    pub pathname: String,
    /// A URL search string, empty or beginning with a `?`
    pub search: String,
    /// A URL fragment identifier, empty or beginning with a `#`
    pub hash: String,
    /// State attached to the entry, `None` when the host reports none
    pub state: Option<S>,
}

impl<S: NavState> Location<S> {
    /// Decompose an absolute URL into a location carrying `state`.
    ///
    /// An empty query (`/a?`) or fragment (`/a#`) normalizes to an empty
    /// string, as browsers report it. Otherwise the query and fragment are
    /// kept verbatim, so `/a??q=1##top` yields a search of `??q=1` and a
    /// hash of `##top`.
    pub fn from_url(url: &Url, state: Option<S>) -> Self {
        Self {
            pathname: normalize_pathname(url.path()),
            search: prefixed('?', url.query()),
            hash: prefixed('#', url.fragment()),
            state,
        }
    }

    /// Build a location from raw URL components.
    ///
    /// `search` and `hash` may be given with or without their leading
    /// delimiter; a missing leading `/` is added to `pathname`.
    pub fn from_parts(
        pathname: &str,
        search: Option<&str>,
        hash: Option<&str>,
        state: Option<S>,
    ) -> Self {
        Self {
            pathname: normalize_pathname(pathname),
            search: with_prefix('?', search),
            hash: with_prefix('#', hash),
            state,
        }
    }

    /// The relative URL that reproduces this location.
    ///
    /// ```rust
    /// use waypoint::core::Location;
    ///
    /// let location: Location = Location::from_parts("/docs", Some("page=2"), None, None);
    /// assert_eq!(location.path(), "/docs?page=2");
    /// ```
    pub fn path(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

fn normalize_pathname(pathname: &str) -> String {
    if pathname.starts_with('/') {
        pathname.to_string()
    } else {
        format!("/{pathname}")
    }
}

/// Prepend `prefix` to a component that never carries its delimiter.
fn prefixed(prefix: char, component: Option<&str>) -> String {
    match component {
        Some(raw) if !raw.is_empty() => format!("{prefix}{raw}"),
        _ => String::new(),
    }
}

/// Like [`prefixed`], but accepts a component that may already start with
/// its delimiter.
fn with_prefix(prefix: char, component: Option<&str>) -> String {
    let raw = component.unwrap_or_default();
    prefixed(prefix, Some(raw.strip_prefix(prefix).unwrap_or(raw)))
}
