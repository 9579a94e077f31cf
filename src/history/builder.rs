//! Builder for constructing histories.

use crate::core::NavState;
use crate::history::controller::History;
use crate::history::error::BuildError;
use crate::host::NavigationHost;
use std::marker::PhantomData;

/// Builder for constructing a [`History`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use waypoint::host::MemoryHost;
/// use waypoint::{History, HistoryBuilder};
///
/// let history: History = HistoryBuilder::new()
///     .host(MemoryHost::new())
///     .title("Inbox")
///     .build()
///     .unwrap();
///
/// assert_eq!(history.location().pathname, "/");
/// ```
pub struct HistoryBuilder<S: NavState, H: NavigationHost + 'static> {
    host: Option<H>,
    title: String,
    _phantom: PhantomData<S>,
}

impl<S: NavState, H: NavigationHost + 'static> HistoryBuilder<S, H> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            host: None,
            title: String::new(),
            _phantom: PhantomData,
        }
    }

    /// Set the navigation host (required).
    pub fn host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the title placeholder handed to the host on every mutation.
    /// Defaults to the empty string; browsers ignore it.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Build the history and bind it to the host's pop-state notification.
    pub fn build(self) -> Result<History<S, H>, BuildError> {
        let host = self.host.ok_or(BuildError::MissingHost)?;
        Ok(History::with_title(host, self.title))
    }
}

impl<S: NavState, H: NavigationHost + 'static> Default for HistoryBuilder<S, H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostEntry, HostError, MemoryHost, PopStateHandler};
    use serde_json::Value;
    use std::cell::RefCell;

    /// Records the title passed with each mutation.
    #[derive(Default)]
    struct TitleRecorder {
        inner: MemoryHost,
        titles: RefCell<Vec<String>>,
    }

    impl NavigationHost for TitleRecorder {
        fn current_entry(&self) -> HostEntry {
            self.inner.current_entry()
        }

        fn push_state(&self, state: Option<Value>, title: &str, url: &str) -> Result<(), HostError> {
            self.titles.borrow_mut().push(title.to_string());
            self.inner.push_state(state, title, url)
        }

        fn replace_state(
            &self,
            state: Option<Value>,
            title: &str,
            url: &str,
        ) -> Result<(), HostError> {
            self.titles.borrow_mut().push(title.to_string());
            self.inner.replace_state(state, title, url)
        }

        fn go(&self, delta: i32) {
            self.inner.go(delta);
        }

        fn assign(&self, url: &str) {
            self.inner.assign(url);
        }

        fn on_pop_state(&self, handler: PopStateHandler) {
            self.inner.on_pop_state(handler);
        }
    }

    #[test]
    fn builder_requires_host() {
        let result = HistoryBuilder::<Value, MemoryHost>::new().build();

        assert!(matches!(result, Err(BuildError::MissingHost)));
    }

    #[test]
    fn builder_passes_title_to_host() {
        let history: History<Value, TitleRecorder> = HistoryBuilder::new()
            .host(TitleRecorder::default())
            .title("Settings")
            .build()
            .unwrap();

        history.push("/a", None);
        history.replace("/b", None).unwrap();

        assert_eq!(
            *history.host().titles.borrow(),
            vec!["Settings".to_string(), "Settings".to_string()]
        );
    }

    #[test]
    fn default_title_is_empty() {
        let history: History<Value, TitleRecorder> = HistoryBuilder::new()
            .host(TitleRecorder::default())
            .build()
            .unwrap();

        history.push("/a", None);

        assert_eq!(*history.host().titles.borrow(), vec![String::new()]);
    }
}
