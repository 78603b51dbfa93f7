pub mod errors;
pub mod context;
pub mod options;
pub mod strategy;
pub mod strategies; // built-in strategy types
pub mod chain;

use serde_json::Value;
use std::sync::Arc;

pub use chain::StrategyChain;
pub use context::{Request, RequestGuard, RequestInterceptor};
pub use errors::{Result, StrategyError};
pub use options::Options;
pub use strategies::{AbstractStrategy, QueryStringStrategy, StrategyConfig};
pub use strategy::{Strategy, StrategyBase, StrategyKind};

/// Build a chain from a JSON array of strategy configurations, e.g.
/// `[{"type": "query_string"}, {"type": "abstract", "options": {"hidden": true}}]`.
pub fn chain_from_json(doc: &Value) -> Result<StrategyChain> {
    let configs: Vec<StrategyConfig> = match doc {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|e| StrategyError::InvalidConfig {
                    reason: e.to_string(),
                })
            })
            .collect::<Result<_>>()?,
        other => {
            return Err(StrategyError::InvalidConfig {
                reason: format!("expected an array of strategies, got {other}"),
            })
        }
    };
    let strategies = configs
        .into_iter()
        .map(strategies::build)
        .collect::<Result<Vec<Arc<dyn Strategy>>>>()?;
    StrategyChain::new(strategies)
}
