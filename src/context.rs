//! Per-thread request context.
//!
//! The dispatcher installs the current [`Request`] before consulting
//! strategies and removes it afterwards. Storage is thread-local, so a value
//! installed on one thread is never observed on another unless the caller
//! hands it over explicitly via [`RequestInterceptor::current`].

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// The inbound request as strategies see it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub session: HashMap<String, String>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut key: String = key.into();
        key.make_ascii_lowercase();
        self.headers.insert(key, value.into());
        self
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

thread_local! {
    static CURRENT_REQUEST: RefCell<Option<Arc<Request>>> = const { RefCell::new(None) };
}

/// Dispatcher-side handle on the request slot.
pub struct RequestInterceptor;

impl RequestInterceptor {
    /// Install `request` until the returned guard drops.
    ///
    /// Dropping the guard restores whatever was installed before, so scopes
    /// nest and a panic inside the scope still clears the slot.
    #[must_use = "the request is removed as soon as the guard is dropped"]
    pub fn enter(request: impl Into<Arc<Request>>) -> RequestGuard {
        let previous = Self::set(Some(request.into()));
        RequestGuard { previous }
    }

    /// Run `f` with `request` installed.
    pub fn scope<F, R>(request: impl Into<Arc<Request>>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = Self::enter(request);
        f()
    }

    /// Replace the slot, returning the previous value.
    pub fn set(request: Option<Arc<Request>>) -> Option<Arc<Request>> {
        CURRENT_REQUEST.with(|cell| cell.replace(request))
    }

    pub fn clear() {
        Self::set(None);
    }

    /// The request installed on this thread, if any.
    pub fn current() -> Option<Arc<Request>> {
        CURRENT_REQUEST.with(|cell| cell.borrow().clone())
    }

    pub fn is_active() -> bool {
        CURRENT_REQUEST.with(|cell| cell.borrow().is_some())
    }
}

/// Restores the previous slot value on drop.
pub struct RequestGuard {
    previous: Option<Arc<Request>>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        RequestInterceptor::set(self.previous.take());
    }
}
