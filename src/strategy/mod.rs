//! Solving strategies and the name-based registry.
//!
//! | Name | Strategy | Optimality |
//! |------|----------|------------|
//! | `LocalSearch` | [`LocalSearchStrategy`] | heuristic |
//! | `Exhaustive` | [`ExhaustiveStrategy`] | proven when enumeration completes |
//! | `IntegerProgramming` | [`IntegerProgrammingStrategy`] | proven on solver `Optimal` |
//! | `ConstraintRouting` | [`ConstraintRoutingStrategy`] | proven on routing `Optimal` |
//!
//! Every strategy takes the validated matrix and an optional time limit and
//! returns a [`StrategyOutcome`]. Strategies never mutate the caller's matrix.

mod constraint_routing;
mod exhaustive;
mod integer_programming;
mod local_search;
mod registry;

pub use constraint_routing::ConstraintRoutingStrategy;
pub use exhaustive::{next_permutation, ExhaustiveConfig, ExhaustiveStrategy};
pub use integer_programming::{IntegerProgrammingConfig, IntegerProgrammingStrategy};
pub use local_search::{LocalSearchConfig, LocalSearchStrategy};
pub use registry::{StrategyFactory, StrategyRegistry};

use std::time::Duration;

use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::models::Tour;

/// What a strategy hands back to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    /// Best tour found; `None` when the solver found no feasible tour.
    pub tour: Option<Tour>,
    /// `true` only if the strategy proved the tour minimal.
    pub optimal: bool,
    /// Cost the strategy computed itself, cross-checked by the engine.
    pub reported_cost: Option<f64>,
}

impl StrategyOutcome {
    /// An outcome carrying `tour`.
    pub fn found(tour: Tour, optimal: bool) -> Self {
        Self {
            tour: Some(tour),
            optimal,
            reported_cost: None,
        }
    }

    /// An outcome without a tour.
    pub fn infeasible() -> Self {
        Self {
            tour: None,
            optimal: false,
            reported_cost: None,
        }
    }

    /// Attaches the strategy's own cost for the engine to cross-check.
    pub fn with_reported_cost(mut self, cost: f64) -> Self {
        self.reported_cost = Some(cost);
        self
    }
}

/// A TSP solving strategy.
///
/// Implementations are stateless between calls, so one instance can serve
/// concurrent solves.
pub trait SolvingStrategy: Send + Sync {
    /// Canonical registry name.
    fn name(&self) -> &str;

    /// Budget applied when the caller gives none, for strategies that must
    /// not run unbounded. `None` means an absent budget is unbounded.
    fn default_budget(&self) -> Option<Duration> {
        None
    }

    /// Solves `distances` within `time_limit` (`None` = no limit).
    fn solve(
        &self,
        distances: &DistanceMatrix,
        time_limit: Option<Duration>,
    ) -> Result<StrategyOutcome>;
}

/// Converts a configured number of seconds into a budget.
///
/// Non-positive and non-finite values mean "no default".
pub(crate) fn budget_from_secs(secs: f64) -> Option<Duration> {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_builders() {
        let outcome = StrategyOutcome::found(Tour::from_order(&[0, 1]), true).with_reported_cost(4.0);
        assert!(outcome.optimal);
        assert_eq!(outcome.reported_cost, Some(4.0));
        assert!(StrategyOutcome::infeasible().tour.is_none());
    }

    #[test]
    fn test_budget_from_secs() {
        assert_eq!(budget_from_secs(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(budget_from_secs(0.0), None);
        assert_eq!(budget_from_secs(-3.0), None);
        assert_eq!(budget_from_secs(f64::NAN), None);
        assert_eq!(budget_from_secs(f64::INFINITY), None);
    }
}
