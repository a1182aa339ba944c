//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::routing::SearchParameters;
use crate::strategy::{ExhaustiveConfig, IntegerProgrammingConfig, LocalSearchConfig};

/// Per-strategy settings handed to every strategy factory.
///
/// Missing sections and fields fall back to their defaults, so a partial
/// JSON document is enough.
///
/// # Examples
///
/// ```
/// use u_tsp::engine::EngineConfig;
///
/// let config = EngineConfig::from_json_str(
///     r#"{ "local_search": { "max_rounds": 3 }, "routing": { "exact_node_limit": 8 } }"#,
/// )
/// .unwrap();
/// assert_eq!(config.local_search.max_rounds, Some(3));
/// assert_eq!(config.local_search.default_budget_secs, 10.0);
/// assert_eq!(config.routing.exact_node_limit, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Assignment seed plus 2-opt.
    pub local_search: LocalSearchConfig,
    /// Permutation enumeration.
    pub exhaustive: ExhaustiveConfig,
    /// MTZ model and branch-and-bound.
    pub integer_programming: IntegerProgrammingConfig,
    /// Routing search parameters (the time limit always comes from the solve call).
    pub routing: SearchParameters,
}

impl EngineConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Sets the local search section.
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    /// Sets the exhaustive section.
    pub fn with_exhaustive(mut self, config: ExhaustiveConfig) -> Self {
        self.exhaustive = config;
        self
    }

    /// Sets the integer programming section.
    pub fn with_integer_programming(mut self, config: IntegerProgrammingConfig) -> Self {
        self.integer_programming = config;
        self
    }

    /// Sets the routing section.
    pub fn with_routing(mut self, params: SearchParameters) -> Self {
        self.routing = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::FirstSolutionStrategy;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_json_str("{}").expect("parses");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default()
            .with_exhaustive(ExhaustiveConfig::default().with_default_budget_secs(5.0))
            .with_integer_programming(IntegerProgrammingConfig::default().with_max_nodes(Some(100)))
            .with_routing(
                SearchParameters::default()
                    .with_first_solution_strategy(FirstSolutionStrategy::CheapestInsertion),
            );
        let json = config.to_json_string().expect("serializes");
        assert_eq!(EngineConfig::from_json_str(&json).expect("parses"), config);
    }

    #[test]
    fn test_malformed_json() {
        assert!(EngineConfig::from_json_str("{ \"exhaustive\": 3 }").is_err());
    }
}
