//! In-memory navigation host.
//!
//! Models a single browser tab: an ordered entry list with a cursor,
//! same-origin URL resolution, asynchronous traversal delivery, and the
//! platform limits that make `pushState` fail in the wild.

use super::error::HostError;
use super::{HostEntry, NavigationHost, PopStateHandler};
use crate::core::Location;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::trace;
use url::Url;

/// Configuration for a [`MemoryHost`].
///
/// # Example
///
/// ```rust
/// use waypoint::host::{MemoryHost, MemoryHostConfig};
///
/// let config: MemoryHostConfig = serde_json::from_str(
///     r#"{ "initial_path": "/inbox", "push_state_limit": 100 }"#,
/// ).unwrap();
///
/// let host = MemoryHost::with_config(config).unwrap();
/// assert_eq!(host.entries()[0].url.as_str(), "http://localhost/inbox");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryHostConfig {
    /// Origin of the simulated document
    pub origin: String,
    /// Path of the first entry, resolved against `origin`
    pub initial_path: String,
    /// Number of `push_state` calls accepted before `QuotaExceeded`
    pub push_state_limit: Option<usize>,
    /// Largest serialized state accepted, in bytes
    pub max_state_bytes: Option<usize>,
}

impl Default for MemoryHostConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost".to_string(),
            initial_path: "/".to_string(),
            push_state_limit: None,
            max_state_bytes: None,
        }
    }
}

/// One entry of the in-memory stack.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryEntry {
    pub url: Url,
    pub state: Option<Value>,
}

struct Session {
    entries: Vec<MemoryEntry>,
    index: usize,
    pending: VecDeque<i32>,
    push_calls: usize,
    push_state_limit: Option<usize>,
    max_state_bytes: Option<usize>,
    assignments: Vec<String>,
}

impl Session {
    fn current(&self) -> &MemoryEntry {
        &self.entries[self.index]
    }

    fn resolve(&self, url: &str) -> Result<Url, HostError> {
        let current = &self.current().url;
        let resolved = current.join(url).map_err(|e| HostError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if resolved.origin() != current.origin() {
            return Err(HostError::Security {
                url: url.to_string(),
            });
        }
        Ok(resolved)
    }

    fn check_state(&self, state: Option<&Value>) -> Result<(), HostError> {
        let (Some(limit), Some(state)) = (self.max_state_bytes, state) else {
            return Ok(());
        };

        let size = serde_json::to_vec(state)
            .map_err(|e| HostError::Platform(e.to_string()))?
            .len();
        if size > limit {
            return Err(HostError::DataClone { size, limit });
        }
        Ok(())
    }

    fn append(&mut self, entry: MemoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    /// Apply the next queued traversal. Returns `None` when the queue is
    /// empty and `Some(false)` when the traversal was out of range.
    fn traverse_next(&mut self) -> Option<bool> {
        let delta = self.pending.pop_front()?;
        let target = self.index as i64 + i64::from(delta);

        if target < 0 || target >= self.entries.len() as i64 {
            trace!(delta, index = self.index, "ignoring out-of-range traversal");
            return Some(false);
        }

        self.index = target as usize;
        trace!(delta, index = self.index, url = %self.current().url, "traversed");
        Some(true)
    }
}

/// A navigation stack held in memory.
///
/// Cloning yields another handle to the same stack, so a test can keep a
/// handle while a `History` owns another.
///
/// Traversals requested through [`go`](NavigationHost::go) are queued, like a
/// browser delivers them after the current task. Call
/// [`dispatch_pending`](Self::dispatch_pending) to deliver them.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use waypoint::host::{MemoryHost, NavigationHost};
///
/// let host = MemoryHost::new();
/// let fired = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&fired);
/// host.on_pop_state(Box::new(move || counter.set(counter.get() + 1)));
///
/// host.push_state(None, "", "/1").unwrap();
/// host.go(-1);
/// assert_eq!(host.current_entry().pathname, "/1");
///
/// assert_eq!(host.dispatch_pending(), 1);
/// assert_eq!(host.current_entry().pathname, "/");
/// assert_eq!(fired.get(), 1);
/// ```
#[derive(Clone)]
pub struct MemoryHost {
    session: Rc<RefCell<Session>>,
    handlers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create a host at `http://localhost/` with no limits.
    pub fn new() -> Self {
        Self::with_config(MemoryHostConfig::default())
            .expect("Default memory host config should always be valid")
    }

    /// Create a host from configuration.
    pub fn with_config(config: MemoryHostConfig) -> Result<Self, HostError> {
        let invalid = |url: &str, e: url::ParseError| HostError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let origin = Url::parse(&config.origin).map_err(|e| invalid(&config.origin, e))?;
        let url = origin
            .join(&config.initial_path)
            .map_err(|e| invalid(&config.initial_path, e))?;

        let session = Session {
            entries: vec![MemoryEntry { url, state: None }],
            index: 0,
            pending: VecDeque::new(),
            push_calls: 0,
            push_state_limit: config.push_state_limit,
            max_state_bytes: config.max_state_bytes,
            assignments: Vec::new(),
        };

        Ok(Self {
            session: Rc::new(RefCell::new(session)),
            handlers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    /// Deliver queued traversals in request order.
    ///
    /// Pop-state handlers fire once per traversal that moved the cursor.
    /// Traversals requested by a handler are delivered in the same call.
    /// Returns the number of notifications fired.
    pub fn dispatch_pending(&self) -> usize {
        let mut fired = 0;
        loop {
            let moved = self.session.borrow_mut().traverse_next();
            match moved {
                None => return fired,
                Some(false) => {}
                Some(true) => {
                    self.fire_pop_state();
                    fired += 1;
                }
            }
        }
    }

    fn fire_pop_state(&self) {
        let handlers: Vec<Rc<dyn Fn()>> = self.handlers.borrow().clone();
        for handler in handlers {
            handler();
        }
    }

    /// Number of entries in the stack. Never zero: a session always holds
    /// the entry it was opened on.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.session.borrow().entries.len()
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.session.borrow().index
    }

    /// Copy of every entry, oldest first.
    pub fn entries(&self) -> Vec<MemoryEntry> {
        self.session.borrow().entries.clone()
    }

    /// Traversals requested but not yet delivered.
    pub fn pending_traversals(&self) -> usize {
        self.session.borrow().pending.len()
    }

    /// Number of `push_state` calls the host accepted.
    pub fn push_calls(&self) -> usize {
        self.session.borrow().push_calls
    }

    /// URLs passed to [`assign`](NavigationHost::assign), unmodified.
    pub fn assignments(&self) -> Vec<String> {
        self.session.borrow().assignments.clone()
    }

    /// Change the `push_state` call ceiling. Calls already made still count.
    pub fn set_push_state_limit(&self, limit: Option<usize>) {
        self.session.borrow_mut().push_state_limit = limit;
    }
}

impl NavigationHost for MemoryHost {
    fn current_entry(&self) -> HostEntry {
        let session = self.session.borrow();
        let entry = session.current();
        let location: Location<Value> = Location::from_url(&entry.url, None);

        HostEntry {
            pathname: location.pathname,
            search: location.search,
            hash: location.hash,
            state: entry.state.clone(),
        }
    }

    fn push_state(&self, state: Option<Value>, _title: &str, url: &str) -> Result<(), HostError> {
        let mut session = self.session.borrow_mut();

        if let Some(limit) = session.push_state_limit {
            if session.push_calls >= limit {
                return Err(HostError::QuotaExceeded { limit });
            }
        }

        let url = session.resolve(url)?;
        session.check_state(state.as_ref())?;
        session.push_calls += 1;

        trace!(url = %url, "push_state");
        session.append(MemoryEntry { url, state });
        Ok(())
    }

    fn replace_state(
        &self,
        state: Option<Value>,
        _title: &str,
        url: &str,
    ) -> Result<(), HostError> {
        let mut session = self.session.borrow_mut();

        let url = session.resolve(url)?;
        session.check_state(state.as_ref())?;

        trace!(url = %url, "replace_state");
        let index = session.index;
        session.entries[index] = MemoryEntry { url, state };
        Ok(())
    }

    fn go(&self, delta: i32) {
        if delta == 0 {
            return;
        }
        self.session.borrow_mut().pending.push_back(delta);
    }

    fn assign(&self, url: &str) {
        let mut session = self.session.borrow_mut();
        session.assignments.push(url.to_string());
        session.pending.clear();

        // A cross-origin or unparsable target leaves this stack behind.
        if let Ok(resolved) = session.resolve(url) {
            trace!(url = %resolved, "document navigation");
            session.append(MemoryEntry {
                url: resolved,
                state: None,
            });
        }
    }

    fn on_pop_state(&self, handler: PopStateHandler) {
        self.handlers.borrow_mut().push(Rc::from(handler));
    }
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session.borrow();
        f.debug_struct("MemoryHost")
            .field("entries", &session.entries)
            .field("index", &session.index)
            .field("pending", &session.pending)
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn pathname(host: &MemoryHost) -> String {
        host.current_entry().pathname
    }

    #[test]
    fn new_host_starts_at_root() {
        let host = MemoryHost::new();

        assert_eq!(host.len(), 1);
        assert_eq!(host.index(), 0);
        assert_eq!(
            host.current_entry(),
            HostEntry {
                pathname: "/".to_string(),
                search: String::new(),
                hash: String::new(),
                state: None,
            }
        );
    }

    #[test]
    fn push_appends_and_truncates_forward_entries() {
        let host = MemoryHost::new();
        host.push_state(None, "", "/1").unwrap();
        host.push_state(None, "", "/2").unwrap();
        host.go(-1);
        host.dispatch_pending();

        host.push_state(None, "", "/3").unwrap();

        let paths: Vec<String> = host
            .entries()
            .iter()
            .map(|e| e.url.path().to_string())
            .collect();
        assert_eq!(paths, vec!["/", "/1", "/3"]);
        assert_eq!(host.index(), 2);
    }

    #[test]
    fn replace_overwrites_in_place() {
        let host = MemoryHost::new();
        host.push_state(None, "", "/1").unwrap();
        host.replace_state(Some(json!({ "k": 1 })), "", "/one")
            .unwrap();

        assert_eq!(host.len(), 2);
        assert_eq!(pathname(&host), "/one");
        assert_eq!(host.current_entry().state, Some(json!({ "k": 1 })));
    }

    #[test]
    fn relative_urls_resolve_against_current_entry() {
        let host = MemoryHost::new();
        host.push_state(None, "", "/docs/guide/").unwrap();
        host.push_state(None, "", "intro?lang=en#top").unwrap();

        let entry = host.current_entry();
        assert_eq!(entry.pathname, "/docs/guide/intro");
        assert_eq!(entry.search, "?lang=en");
        assert_eq!(entry.hash, "#top");
    }

    #[test]
    fn cross_origin_push_is_rejected() {
        let host = MemoryHost::new();
        let result = host.push_state(None, "", "https://example.com/");

        assert!(matches!(result, Err(HostError::Security { .. })));
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn push_limit_raises_quota_exceeded() {
        let host = MemoryHost::with_config(MemoryHostConfig {
            push_state_limit: Some(2),
            ..MemoryHostConfig::default()
        })
        .unwrap();

        host.push_state(None, "", "/1").unwrap();
        host.push_state(None, "", "/2").unwrap();
        let result = host.push_state(None, "", "/3");

        assert_eq!(result, Err(HostError::QuotaExceeded { limit: 2 }));
        assert_eq!(host.push_calls(), 2);
        assert_eq!(pathname(&host), "/2");
    }

    #[test]
    fn oversized_state_raises_data_clone() {
        let host = MemoryHost::with_config(MemoryHostConfig {
            max_state_bytes: Some(8),
            ..MemoryHostConfig::default()
        })
        .unwrap();

        let result = host.push_state(Some(json!({ "too": "large" })), "", "/1");

        assert!(matches!(
            result,
            Err(HostError::DataClone { limit: 8, .. })
        ));
        assert!(host.push_state(Some(json!(1)), "", "/1").is_ok());
    }

    #[test]
    fn oversized_state_is_rejected_on_replace_too() {
        let host = MemoryHost::with_config(MemoryHostConfig {
            max_state_bytes: Some(8),
            ..MemoryHostConfig::default()
        })
        .unwrap();

        let result = host.replace_state(Some(json!({ "too": "large" })), "", "/1");

        assert!(matches!(
            result,
            Err(HostError::DataClone { limit: 8, .. })
        ));
        assert_eq!(host.current_entry().pathname, "/");
        assert!(host.replace_state(None, "", "/1").is_ok());
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn go_is_delivered_asynchronously() {
        let host = MemoryHost::new();
        host.push_state(None, "", "/1").unwrap();

        host.go(-1);
        assert_eq!(pathname(&host), "/1");
        assert_eq!(host.pending_traversals(), 1);

        assert_eq!(host.dispatch_pending(), 1);
        assert_eq!(pathname(&host), "/");
        assert_eq!(host.pending_traversals(), 0);
    }

    #[test]
    fn go_zero_is_ignored() {
        let host = MemoryHost::new();
        host.go(0);

        assert_eq!(host.pending_traversals(), 0);
        assert_eq!(host.dispatch_pending(), 0);
    }

    #[test]
    fn out_of_range_traversal_fires_nothing() {
        let host = MemoryHost::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        host.on_pop_state(Box::new(move || counter.set(counter.get() + 1)));

        host.go(-1);
        host.go(3);

        assert_eq!(host.dispatch_pending(), 0);
        assert_eq!(fired.get(), 0);
        assert_eq!(host.index(), 0);
    }

    #[test]
    fn handler_can_request_further_traversals() {
        let host = MemoryHost::new();
        host.push_state(None, "", "/1").unwrap();
        host.push_state(None, "", "/2").unwrap();

        let inner = host.clone();
        let bounced = Rc::new(Cell::new(false));
        let flag = Rc::clone(&bounced);
        host.on_pop_state(Box::new(move || {
            if !flag.replace(true) {
                inner.go(-1);
            }
        }));

        host.go(-1);

        assert_eq!(host.dispatch_pending(), 2);
        assert_eq!(pathname(&host), "/");
    }

    #[test]
    fn assign_records_url_and_drops_state() {
        let host = MemoryHost::new();
        host.push_state(Some(json!({ "a": 1 })), "", "/1").unwrap();
        host.go(-1);

        host.assign("/reloaded?x=1");

        assert_eq!(host.assignments(), vec!["/reloaded?x=1".to_string()]);
        assert_eq!(host.pending_traversals(), 0);
        let entry = host.current_entry();
        assert_eq!(entry.pathname, "/reloaded");
        assert_eq!(entry.state, None);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: MemoryHostConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MemoryHostConfig::default());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let result = MemoryHost::with_config(MemoryHostConfig {
            origin: "not a url".to_string(),
            ..MemoryHostConfig::default()
        });

        assert!(matches!(result, Err(HostError::InvalidUrl { .. })));
    }
}
