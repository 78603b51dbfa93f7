use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::context::{Request, RequestInterceptor};
use crate::errors::{Result, StrategyError};
use crate::strategy::Strategy;

/// Ordered set of strategies consulted for a feature, first opinion wins.
#[derive(Clone, Default)]
pub struct StrategyChain {
    inner: Vec<Arc<dyn Strategy>>,
}

impl StrategyChain {
    /// Fails if two strategies share a key.
    pub fn new(strategies: Vec<Arc<dyn Strategy>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for s in &strategies {
            if !seen.insert(s.key().to_string()) {
                return Err(StrategyError::DuplicateKey {
                    name: s.name().to_string(),
                    key: s.key().to_string(),
                });
            }
        }
        Ok(Self { inner: strategies })
    }

    pub fn push<S: Strategy + 'static>(&mut self, s: S) -> Result<()> {
        if self.get(s.key()).is_some() {
            return Err(StrategyError::DuplicateKey {
                name: s.name().to_string(),
                key: s.key().to_string(),
            });
        }
        self.inner.push(Arc::new(s));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Strategy>> {
        self.inner.iter().find(|s| s.key() == key).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Strategy>> {
        self.inner.iter()
    }

    /// Strategies not marked hidden, for listings.
    pub fn visible(&self) -> impl Iterator<Item = &Arc<dyn Strategy>> {
        self.inner.iter().filter(|s| !s.hidden())
    }

    pub fn len(&self) -> usize { self.inner.len() }
    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    /// Evaluate `feature` with `request` installed for the duration of the call.
    pub fn enabled(&self, feature: &str, request: impl Into<Arc<Request>>) -> Result<Option<bool>> {
        RequestInterceptor::scope(request, || self.evaluate(feature))
    }

    /// Evaluate against whatever request the caller already installed.
    pub fn evaluate(&self, feature: &str) -> Result<Option<bool>> {
        for s in &self.inner {
            if let Some(state) = s.enabled(feature)? {
                debug!(feature, strategy = %s.name(), state, "feature decided");
                return Ok(Some(state));
            }
        }
        debug!(feature, "no strategy decided");
        Ok(None)
    }
}
