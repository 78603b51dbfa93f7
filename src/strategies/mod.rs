use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::{Result, StrategyError};
use crate::options::Options;
use crate::strategy::Strategy;

pub use builtins::{AbstractStrategy, QueryStringStrategy};

/// One entry of a strategy configuration document:
/// `{"type": "query_string", "options": {"name": "qs"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Value,
}

/// Construct a built-in strategy from its configuration.
pub fn build(config: StrategyConfig) -> Result<Arc<dyn Strategy>> {
    let options = || Options::from_value(&config.kind, config.options.clone());
    let strategy: Arc<dyn Strategy> = match config.kind.as_str() {
        "abstract" => Arc::new(AbstractStrategy::new(options()?)?),
        "query_string" => Arc::new(QueryStringStrategy::new(options()?)?),
        _ => return Err(StrategyError::UnknownStrategy { name: config.kind.clone() }),
    };
    Ok(strategy)
}

pub mod builtins {
    use super::*;
    use crate::strategy::{StrategyBase, StrategyKind};

    /// The base variant. Holds no opinion about any feature.
    #[derive(Debug, Clone)]
    pub struct AbstractStrategy {
        base: StrategyBase,
    }

    impl StrategyKind for AbstractStrategy {}

    impl AbstractStrategy {
        pub fn new(options: Options) -> Result<Self> {
            Ok(Self { base: StrategyBase::new::<Self>(options)? })
        }
    }

    impl Strategy for AbstractStrategy {
        fn base(&self) -> &StrategyBase { &self.base }
        fn enabled(&self, _feature: &str) -> Result<Option<bool>> { Ok(None) }
    }

    /// Reads the feature's state from the request's query parameters.
    ///
    /// `?beta=1` enables `beta`; `0`, `false` and `off` disable it. Any other
    /// value enables it, and an absent parameter leaves the decision to the
    /// next strategy.
    #[derive(Debug, Clone)]
    pub struct QueryStringStrategy {
        base: StrategyBase,
    }

    impl StrategyKind for QueryStringStrategy {}

    impl QueryStringStrategy {
        pub fn new(options: Options) -> Result<Self> {
            Ok(Self { base: StrategyBase::new::<Self>(options)? })
        }
    }

    impl Strategy for QueryStringStrategy {
        fn base(&self) -> &StrategyBase { &self.base }

        fn enabled(&self, feature: &str) -> Result<Option<bool>> {
            let request = self.request()?;
            Ok(request
                .params
                .get(feature)
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Request, RequestInterceptor};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config(v: serde_json::Value) -> StrategyConfig {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn builds_by_type() {
        let s = build(config(json!({"type": "query_string"}))).unwrap();
        assert_eq!(s.name(), "query_string");
        let s = build(config(json!({"type": "abstract", "options": {"name": "base"}}))).unwrap();
        assert_eq!(s.name(), "base");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = build(config(json!({"type": "cookie"}))).err().unwrap();
        assert_eq!(err.to_string(), "Strategy 'cookie' is not a known strategy type.");
    }

    #[test]
    fn build_propagates_option_errors() {
        let err = build(config(json!({"type": "query_string", "options": {"prefix": "ff_"}})))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Strategy 'query_string' did not understand option :prefix."
        );
    }

    #[test]
    fn non_object_options_are_malformed() {
        let err = build(config(json!({"type": "abstract", "options": "hidden"})))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Strategy 'abstract' expected options to be an object, got a string."
        );
    }

    #[test]
    fn null_options_are_empty() {
        let s = build(config(json!({"type": "abstract", "options": null}))).unwrap();
        assert_eq!(s.name(), "abstract");
    }

    #[test]
    fn query_string_reads_params() {
        let s = QueryStringStrategy::new(Options::new()).unwrap();
        let req = Request::new("GET", "/")
            .with_param("beta", "1")
            .with_param("gamma", "OFF");
        RequestInterceptor::scope(req, || {
            assert_eq!(s.enabled("beta").unwrap(), Some(true));
            assert_eq!(s.enabled("gamma").unwrap(), Some(false));
            assert_eq!(s.enabled("delta").unwrap(), None);
        });
    }

    #[test]
    fn query_string_requires_request() {
        let s = QueryStringStrategy::new(Options::new()).unwrap();
        let err = s.enabled("beta").unwrap_err();
        assert_eq!(
            err,
            StrategyError::RequestMissing { name: "query_string".into() }
        );
    }

    #[test]
    fn abstract_cannot_switch_or_clear() {
        let s = AbstractStrategy::new(Options::new()).unwrap();
        assert_eq!(s.enabled("beta").unwrap(), None);
        assert_eq!(
            s.switch("beta", true).unwrap_err().to_string(),
            "Strategy 'abstract' cannot switch feature :beta."
        );
        assert_eq!(
            s.clear("beta").unwrap_err().to_string(),
            "Strategy 'abstract' cannot clear feature :beta."
        );
    }
}
