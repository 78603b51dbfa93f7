use flipflop_strategy as ff;
use ff::{AbstractStrategy, Options, Request, RequestInterceptor, Strategy, StrategyError};
use serde_json::json;
use std::sync::Arc;

fn with_defaults() -> AbstractStrategy {
    AbstractStrategy::new(Options::new()).unwrap()
}

fn with_options() -> AbstractStrategy {
    let opts = Options::from_value(
        "abstract",
        json!({"name": "strategy", "description": "my strategy", "hidden": true}),
    )
    .unwrap();
    AbstractStrategy::new(opts).unwrap()
}

fn request_three() -> Request {
    Request::new("GET", "/").with_header("x-request-id", "3")
}

#[test]
fn test_default_name() {
    assert_eq!(with_defaults().name(), "abstract");
}

#[test]
fn test_no_default_description() {
    assert_eq!(with_defaults().description(), None);
}

#[test]
fn test_not_switchable_or_hidden_by_default() {
    let s = with_defaults();
    assert!(!s.switchable());
    assert!(!s.hidden());
}

#[test]
fn test_key_is_word_characters() {
    let key = with_defaults().key().to_string();
    assert!(!key.is_empty());
    assert!(key.chars().all(|c| c == '_' || c.is_ascii_alphanumeric()), "bad key {key}");
}

#[test]
fn test_request_returns_installed_request() {
    let s = with_defaults();
    let _guard = RequestInterceptor::enter(request_three());
    let req = s.request().unwrap();
    assert_eq!(req.header("x-request-id"), Some("3"));
}

#[test]
fn test_request_returns_same_instance() {
    let s = with_defaults();
    let req = Arc::new(request_three());
    RequestInterceptor::scope(req.clone(), || {
        assert!(Arc::ptr_eq(&s.request().unwrap(), &req));
    });
}

#[test]
fn test_request_missing_raises() {
    let s = with_defaults();
    RequestInterceptor::clear();
    let err = s.request().unwrap_err();
    assert_eq!(err, StrategyError::RequestMissing { name: "abstract".into() });
    assert_eq!(
        err.to_string(),
        "Strategy 'abstract' required request, but was used outside request context."
    );
}

#[test]
fn test_request_missing_in_spawned_thread() {
    let s = Arc::new(with_defaults());
    let _guard = RequestInterceptor::enter(request_three());
    let remote = Arc::clone(&s);
    let result = std::thread::spawn(move || remote.request()).join().unwrap();
    assert!(matches!(result, Err(StrategyError::RequestMissing { .. })));
    // The spawning thread still sees its own request.
    assert!(s.request().is_ok());
}

#[test]
fn test_request_predicate() {
    let s = with_defaults();
    assert!(!s.has_request());
    RequestInterceptor::scope(request_three(), || assert!(s.has_request()));
    assert!(!s.has_request());
}

#[test]
fn test_specified_options() {
    let s = with_options();
    assert_eq!(s.name(), "strategy");
    assert_eq!(s.description(), Some("my strategy"));
    assert!(s.hidden());
    assert!(!s.switchable());
    assert_eq!(s.key(), "strategy");
}

#[test]
fn test_unknown_options_raise() {
    let opts = Options::from_value("abstract", json!({"unknown": "one", "other": "two"})).unwrap();
    let err = AbstractStrategy::new(opts).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Strategy 'abstract' did not understand option :unknown, :other."
    );
}

#[test]
fn test_unknown_options_mixed_with_known() {
    let opts = Options::new()
        .with("switchable", true)
        .with("color", "red")
        .with("name", "beta");
    let err = AbstractStrategy::new(opts).unwrap_err();
    assert_eq!(
        err,
        StrategyError::UnknownOptions {
            name: "beta".into(),
            options: vec!["color".into()],
        }
    );
}
