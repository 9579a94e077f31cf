//! Browser host backed by `window.history`.

use super::error::HostError;
use super::{HostEntry, NavigationHost, PopStateHandler};
use serde_json::Value;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

const POP_STATE_EVENT: &str = "popstate";

/// [`NavigationHost`] over the page's `window`.
///
/// State payloads cross the JS boundary as JSON, so they are subject to the
/// browser's structured clone and size limits.
#[derive(Clone, Debug)]
pub struct BrowserHost {
    window: Window,
}

impl BrowserHost {
    /// Bind to the global `window`.
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window()
            .ok_or_else(|| HostError::Platform("no global window".to_string()))?;
        Ok(Self { window })
    }

    fn history(&self) -> Result<web_sys::History, HostError> {
        self.window.history().map_err(platform)
    }

    fn read_state(&self) -> Option<Value> {
        let raw = self.history().and_then(|h| h.state().map_err(platform));
        let raw = match raw {
            Ok(raw) if !raw.is_null() && !raw.is_undefined() => raw,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read history state");
                return None;
            }
        };

        let decoded = js_sys::JSON::stringify(&raw)
            .map(String::from)
            .map_err(platform)
            .and_then(|json| {
                serde_json::from_str(&json).map_err(|e| HostError::Platform(e.to_string()))
            });
        match decoded {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "history state is not JSON-representable");
                None
            }
        }
    }
}

fn platform(err: JsValue) -> HostError {
    HostError::Platform(format!("{err:?}"))
}

fn to_js(state: Option<&Value>) -> Result<JsValue, HostError> {
    match state {
        None => Ok(JsValue::NULL),
        Some(value) => {
            let json = serde_json::to_string(value).map_err(|e| HostError::Platform(e.to_string()))?;
            js_sys::JSON::parse(&json).map_err(platform)
        }
    }
}

impl NavigationHost for BrowserHost {
    fn current_entry(&self) -> HostEntry {
        let location = self.window.location();
        HostEntry {
            pathname: location.pathname().unwrap_or_else(|_| "/".to_string()),
            search: location.search().unwrap_or_default(),
            hash: location.hash().unwrap_or_default(),
            state: self.read_state(),
        }
    }

    fn push_state(&self, state: Option<Value>, title: &str, url: &str) -> Result<(), HostError> {
        let data = to_js(state.as_ref())?;
        self.history()?
            .push_state_with_url(&data, title, Some(url))
            .map_err(platform)
    }

    fn replace_state(
        &self,
        state: Option<Value>,
        title: &str,
        url: &str,
    ) -> Result<(), HostError> {
        let data = to_js(state.as_ref())?;
        self.history()?
            .replace_state_with_url(&data, title, Some(url))
            .map_err(platform)
    }

    fn go(&self, delta: i32) {
        let result = self
            .history()
            .and_then(|h| h.go_with_delta(delta).map_err(platform));
        if let Err(e) = result {
            warn!(delta, error = %e, "history traversal request failed");
        }
    }

    fn assign(&self, url: &str) {
        if let Err(e) = self.window.location().assign(url) {
            warn!(url, error = ?e, "document navigation failed");
        }
    }

    fn on_pop_state(&self, handler: PopStateHandler) {
        let closure = Closure::wrap(handler);
        let result = self
            .window
            .add_event_listener_with_callback(POP_STATE_EVENT, closure.as_ref().unchecked_ref());
        if let Err(e) = result {
            warn!(error = ?e, "failed to bind popstate listener");
        }
        // The binding lives as long as the page.
        closure.forget();
    }
}
