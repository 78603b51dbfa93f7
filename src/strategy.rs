use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::{Request, RequestInterceptor};
use crate::errors::{Result, StrategyError};
use crate::options::{Options, RECOGNIZED};

/// Identity hook every concrete strategy type provides.
///
/// The default name is derived from the Rust type name, so
/// `QueryStringStrategy` answers `"query_string"`. Override it when the
/// type name is not what users should see.
pub trait StrategyKind {
    fn default_name() -> String
    where
        Self: Sized,
    {
        canonical_name(std::any::type_name::<Self>())
    }
}

/// A pluggable rule that may hold an opinion about a feature's state.
///
/// Implementors only supply [`Strategy::base`] and [`Strategy::enabled`];
/// identity, metadata and request access come from the shared base.
pub trait Strategy: Send + Sync {
    fn base(&self) -> &StrategyBase;

    /// `Ok(None)` means the strategy has no opinion and the next one decides.
    fn enabled(&self, feature: &str) -> Result<Option<bool>>;

    fn switch(&self, feature: &str, _enabled: bool) -> Result<()> {
        Err(StrategyError::SwitchUnsupported {
            name: self.name().to_string(),
            feature: feature.to_string(),
        })
    }

    fn clear(&self, feature: &str) -> Result<()> {
        Err(StrategyError::ClearUnsupported {
            name: self.name().to_string(),
            feature: feature.to_string(),
        })
    }

    fn name(&self) -> &str { self.base().name() }
    fn key(&self) -> &str { self.base().key() }
    fn description(&self) -> Option<&str> { self.base().description() }
    fn switchable(&self) -> bool { self.base().switchable() }
    fn hidden(&self) -> bool { self.base().hidden() }

    /// The request installed on the calling thread.
    fn request(&self) -> Result<Arc<Request>> { self.base().request() }

    fn has_request(&self) -> bool { self.base().has_request() }
}

/// Identity and metadata shared by all strategies, validated once at
/// construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyBase {
    name: String,
    key: String,
    description: Option<String>,
    switchable: bool,
    hidden: bool,
}

impl StrategyBase {
    /// Build the base for strategy type `S`.
    pub fn new<S: StrategyKind>(options: Options) -> Result<Self> {
        Self::with_default_name(S::default_name(), options)
    }

    pub fn with_default_name(default_name: impl Into<String>, options: Options) -> Result<Self> {
        let default_name = default_name.into();

        // Resolve the name up front so every error below can report it.
        let name = match options.get("name") {
            Some(Value::String(s)) => s.clone(),
            _ => default_name.clone(),
        };

        let unknown: Vec<String> = options
            .unrecognized(&RECOGNIZED)
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(StrategyError::UnknownOptions { name, options: unknown });
        }

        if let Some(v) = options.get("name") {
            if !v.is_null() && !v.is_string() {
                return Err(invalid(&name, "name", "a string"));
            }
        }
        let description = match options.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(invalid(&name, "description", "a string")),
        };
        let switchable = flag(&options, &name, "switchable")?;
        let hidden = flag(&options, &name, "hidden")?;
        let key = key_for(&name, &default_name);

        debug!(strategy = %name, key = %key, switchable, hidden, "strategy constructed");
        Ok(Self { name, key, description, switchable, hidden })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn key(&self) -> &str { &self.key }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn switchable(&self) -> bool { self.switchable }
    pub fn hidden(&self) -> bool { self.hidden }

    pub fn request(&self) -> Result<Arc<Request>> {
        RequestInterceptor::current().ok_or_else(|| {
            warn!(strategy = %self.name, "request accessed outside request context");
            StrategyError::RequestMissing { name: self.name.clone() }
        })
    }

    pub fn has_request(&self) -> bool {
        RequestInterceptor::is_active()
    }
}

fn invalid(name: &str, option: &str, expected: &'static str) -> StrategyError {
    StrategyError::InvalidOption {
        name: name.to_string(),
        option: option.to_string(),
        expected,
    }
}

fn flag(options: &Options, name: &str, option: &str) -> Result<bool> {
    match options.get(option) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(invalid(name, option, "a boolean")),
    }
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Word-character slug of `name`, falling back to `default_name` when the
/// name has nothing to slug.
pub fn key_for(name: &str, default_name: &str) -> String {
    let slug = |s: &str| -> String {
        s.chars().map(|c| if is_word_char(c) { c } else { '_' }).collect()
    };
    if !name.is_empty() {
        return slug(name);
    }
    if !default_name.is_empty() {
        return slug(default_name);
    }
    "strategy".to_string()
}

/// Lower snake-case short name of a Rust type path, minus any `Strategy`
/// suffix: `my_crate::strategies::QueryStringStrategy` becomes `query_string`.
pub fn canonical_name(type_name: &str) -> String {
    let path = type_name.split('<').next().unwrap_or(type_name);
    let short = path.rsplit("::").next().unwrap_or(path);
    let short = match short.strip_suffix("Strategy") {
        Some(stem) if !stem.is_empty() => stem,
        _ => short,
    };

    let chars: Vec<char> = short.chars().collect();
    let mut out = String::with_capacity(short.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary {
                out.push('_');
            }
        }
        out.push(if is_word_char(c) { c.to_ascii_lowercase() } else { '_' });
    }
    out
}
