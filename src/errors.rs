use itertools::Itertools;
use thiserror::Error;

/// The single error type raised by strategies and their dispatcher.
///
/// Every variant names the strategy involved so the rendered message points
/// straight at the misconfigured or misused instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    /// Construction saw option keys outside the recognized set.
    #[error("Strategy '{name}' did not understand option {}.", option_list(.options))]
    UnknownOptions { name: String, options: Vec<String> },

    /// A recognized option carried a value of the wrong JSON type.
    #[error("Strategy '{name}' expected option :{option} to be {expected}.")]
    InvalidOption {
        name: String,
        option: String,
        expected: &'static str,
    },

    /// The options document was not a JSON object.
    #[error("Strategy '{name}' expected options to be an object, got {found}.")]
    MalformedOptions { name: String, found: String },

    /// `request()` was called with no request installed on this thread.
    #[error("Strategy '{name}' required request, but was used outside request context.")]
    RequestMissing { name: String },

    /// `switch()` on a strategy that cannot hold explicit overrides.
    #[error("Strategy '{name}' cannot switch feature :{feature}.")]
    SwitchUnsupported { name: String, feature: String },

    /// `clear()` on a strategy that cannot hold explicit overrides.
    #[error("Strategy '{name}' cannot clear feature :{feature}.")]
    ClearUnsupported { name: String, feature: String },

    /// A configuration named a strategy type that does not exist.
    #[error("Strategy '{name}' is not a known strategy type.")]
    UnknownStrategy { name: String },

    /// A strategy configuration document could not be read.
    #[error("Strategy configuration is invalid: {reason}")]
    InvalidConfig { reason: String },

    /// Two strategies in one chain resolved to the same key.
    #[error("Strategy '{name}' has key :{key} which is already in use.")]
    DuplicateKey { name: String, key: String },
}

fn option_list(options: &[String]) -> String {
    options.iter().map(|o| format!(":{o}")).join(", ")
}

// Type alias for results that use `StrategyError` as the error type
pub type Result<T> = std::result::Result<T, StrategyError>;
