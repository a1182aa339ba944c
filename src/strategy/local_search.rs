//! Assignment seed followed by 2-opt descent.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{budget_from_secs, SolvingStrategy, StrategyOutcome};
use crate::budget::Deadline;
use crate::constructive::assignment_seed;
use crate::distance::{ArcCost, DistanceMatrix};
use crate::error::Result;
use crate::evaluation::TourEvaluator;
use crate::local_search::two_opt_improve;
use crate::models::Tour;

const SYMMETRY_TOL: f64 = 1e-9;

/// Configuration for [`LocalSearchStrategy`].
///
/// # Examples
///
/// ```
/// use u_tsp::strategy::LocalSearchConfig;
///
/// let config = LocalSearchConfig::default().with_max_rounds(Some(1));
/// assert_eq!(config.max_rounds, Some(1));
/// assert_eq!(config.default_budget_secs, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Budget used when the caller supplies none.
    pub default_budget_secs: f64,
    /// Cap on 2-opt rounds (`None` = until no round improves).
    pub max_rounds: Option<usize>,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            default_budget_secs: 10.0,
            max_rounds: None,
        }
    }
}

impl LocalSearchConfig {
    /// Sets the default budget in seconds.
    pub fn with_default_budget_secs(mut self, secs: f64) -> Self {
        self.default_budget_secs = secs;
        self
    }

    /// Sets the round cap.
    pub fn with_max_rounds(mut self, max_rounds: Option<usize>) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

/// Heuristic strategy: Hungarian assignment relaxation, Karp patching of
/// its sub-cycles, then 2-opt until a local optimum or the deadline.
///
/// Only a 2-node instance is reported optimal; a 2-opt local optimum is
/// not a proof.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::strategy::{LocalSearchStrategy, SolvingStrategy};
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
/// let outcome = LocalSearchStrategy::default().solve(&dm, None).unwrap();
/// assert!(!outcome.optimal);
/// assert_eq!(outcome.reported_cost, Some(80.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalSearchStrategy {
    config: LocalSearchConfig,
}

impl LocalSearchStrategy {
    pub const NAME: &'static str = "LocalSearch";

    /// Creates the strategy with `config`.
    pub fn new(config: LocalSearchConfig) -> Self {
        Self { config }
    }
}

impl SolvingStrategy for LocalSearchStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn default_budget(&self) -> Option<Duration> {
        budget_from_secs(self.config.default_budget_secs)
    }

    fn solve(
        &self,
        distances: &DistanceMatrix,
        time_limit: Option<Duration>,
    ) -> Result<StrategyOutcome> {
        let deadline = Deadline::start(time_limit);
        let n = distances.size();
        let mut tour = assignment_seed(distances);
        let seed_cost = TourEvaluator::new(distances).order_cost(&tour);
        log::debug!("local_search.seed: n={n} cost={seed_cost:.4}");

        tour.push(tour[0]);
        if n == 2 {
            return Ok(StrategyOutcome::found(Tour::new(tour), true).with_reported_cost(seed_cost));
        }

        let symmetric = distances.is_symmetric(SYMMETRY_TOL);
        let report = two_opt_improve(
            &mut tour,
            distances,
            symmetric,
            &deadline,
            self.config.max_rounds,
        );
        let cost = distances.path_cost(&tour);
        if report.timed_out {
            log::warn!(
                "local_search.improve: budget exhausted after rounds={} cost={cost:.4}",
                report.rounds
            );
        } else {
            log::debug!(
                "local_search.improve: rounds={} improving={} symmetric={symmetric} cost={cost:.4}",
                report.rounds,
                report.improving_rounds
            );
        }
        Ok(StrategyOutcome::found(Tour::new(tour), false).with_reported_cost(cost))
    }
}
