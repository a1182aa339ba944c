//! Name-to-constructor map for strategies.

use std::collections::BTreeMap;
use std::fmt;

use super::{
    ConstraintRoutingStrategy, ExhaustiveStrategy, IntegerProgrammingStrategy, LocalSearchStrategy,
    SolvingStrategy,
};
use crate::engine::EngineConfig;
use crate::error::{Error, Result};

/// Builds a strategy from the engine configuration.
pub type StrategyFactory = Box<dyn Fn(&EngineConfig) -> Box<dyn SolvingStrategy> + Send + Sync>;

/// Alternative names accepted by [`StrategyRegistry::with_defaults`].
const DEFAULT_ALIASES: [(&str, &str); 4] = [
    ("TwoOpt", LocalSearchStrategy::NAME),
    ("Permutations", ExhaustiveStrategy::NAME),
    ("FlowBased", IntegerProgrammingStrategy::NAME),
    ("ConstraintProgramming", ConstraintRoutingStrategy::NAME),
];

/// Registry of solving strategies by name.
///
/// Adding a strategy means registering a factory; the engine never changes.
///
/// # Examples
///
/// ```
/// use u_tsp::engine::EngineConfig;
/// use u_tsp::strategy::{ExhaustiveStrategy, SolvingStrategy, StrategyRegistry};
///
/// let mut registry = StrategyRegistry::with_defaults();
/// registry.register("BruteForce", |config: &EngineConfig| {
///     Box::new(ExhaustiveStrategy::new(config.exhaustive.clone()))
/// });
/// let strategy = registry.create("BruteForce", &EngineConfig::default()).unwrap();
/// assert_eq!(strategy.name(), "Exhaustive");
/// assert!(registry.create("DoesNotExist", &EngineConfig::default()).is_err());
/// ```
#[derive(Default)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, StrategyFactory>,
    aliases: BTreeMap<String, String>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the four built-in strategies and their aliases.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LocalSearchStrategy::NAME, |config: &EngineConfig| {
            Box::new(LocalSearchStrategy::new(config.local_search.clone()))
        });
        registry.register(ExhaustiveStrategy::NAME, |config: &EngineConfig| {
            Box::new(ExhaustiveStrategy::new(config.exhaustive.clone()))
        });
        registry.register(IntegerProgrammingStrategy::NAME, |config: &EngineConfig| {
            Box::new(IntegerProgrammingStrategy::new(&config.integer_programming))
        });
        registry.register(ConstraintRoutingStrategy::NAME, |config: &EngineConfig| {
            Box::new(ConstraintRoutingStrategy::new(config.routing.clone()))
        });
        for (alias, target) in DEFAULT_ALIASES {
            registry.alias(alias, target);
        }
        registry
    }

    /// Registers (or replaces) a factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&EngineConfig) -> Box<dyn SolvingStrategy> + Send + Sync + 'static,
    {
        let name = name.into();
        self.aliases.remove(&name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Makes `alias` resolve to the strategy registered as `target`.
    pub fn alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Resolves `name` (or an alias) to its registered name.
    pub fn resolve<'s>(&'s self, name: &'s str) -> Option<&'s str> {
        if self.factories.contains_key(name) {
            return Some(name);
        }
        self.aliases
            .get(name)
            .filter(|target| self.factories.contains_key(target.as_str()))
            .map(String::as_str)
    }

    /// Builds the strategy registered under `name`.
    pub fn create(&self, name: &str, config: &EngineConfig) -> Result<Box<dyn SolvingStrategy>> {
        let resolved = self.resolve(name).ok_or_else(|| Error::unknown_strategy(name))?;
        let factory = self
            .factories
            .get(resolved)
            .ok_or_else(|| Error::unknown_strategy(name))?;
        Ok(factory(config))
    }

    /// Registered names in sorted order, aliases excluded.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Returns `true` if `name` or an alias of it is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .field("aliases", &self.aliases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["ConstraintRouting", "Exhaustive", "IntegerProgramming", "LocalSearch"]
        );
    }

    #[test]
    fn test_aliases_resolve() {
        let registry = StrategyRegistry::with_defaults();
        let config = EngineConfig::default();
        for (alias, target) in DEFAULT_ALIASES {
            let strategy = registry.create(alias, &config).expect("alias resolves");
            assert_eq!(strategy.name(), target);
        }
    }

    #[test]
    fn test_unknown_name() {
        let registry = StrategyRegistry::with_defaults();
        let err = registry
            .create("DoesNotExist", &EngineConfig::default())
            .err()
            .expect("unknown");
        assert_eq!(err, Error::unknown_strategy("DoesNotExist"));
        assert!(!registry.contains("localsearch"));
    }

    #[test]
    fn test_register_overrides_alias() {
        let mut registry = StrategyRegistry::with_defaults();
        registry.register("TwoOpt", |config: &EngineConfig| {
            Box::new(ExhaustiveStrategy::new(config.exhaustive.clone()))
        });
        let strategy = registry.create("TwoOpt", &EngineConfig::default()).expect("registered");
        assert_eq!(strategy.name(), ExhaustiveStrategy::NAME);
    }
}
