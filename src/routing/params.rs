//! Routing search parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest node count the exact search accepts, whatever
/// [`SearchParameters::exact_node_limit`] says. Held–Karp needs 2^(n-1) · n
/// table cells.
pub const MAX_EXACT_NODES: usize = 16;

/// Heuristic used to build the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirstSolutionStrategy {
    /// Extend the route from the depot with the cheapest arc to an unvisited node.
    #[default]
    PathCheapestArc,
    /// Insert the node with the cheapest insertion cost into the current cycle.
    CheapestInsertion,
}

/// Parameters for [`LocalRoutingSearch`](super::LocalRoutingSearch).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tsp::routing::{FirstSolutionStrategy, SearchParameters};
///
/// let params = SearchParameters::default()
///     .with_time_limit(Some(Duration::from_secs(2)))
///     .with_first_solution_strategy(FirstSolutionStrategy::CheapestInsertion)
///     .with_exact_node_limit(8);
/// assert_eq!(params.exact_node_limit, 8);
/// assert_eq!(params.time_limit, Some(Duration::from_secs(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// First-solution heuristic.
    pub first_solution_strategy: FirstSolutionStrategy,
    /// Wall-clock limit for the whole search (`None` = no limit).
    #[serde(skip)]
    pub time_limit: Option<Duration>,
    /// Instances with at most this many nodes are solved to proven
    /// optimality with dynamic programming (memory grows as 2^n · n).
    /// Values above [`MAX_EXACT_NODES`] act as [`MAX_EXACT_NODES`].
    pub exact_node_limit: usize,
    /// Maximum VNS outer iterations.
    pub max_iterations: usize,
    /// VNS stops after this many neighborhood trials without improvement.
    pub max_no_improve: usize,
    /// Seed for the VNS perturbations.
    pub seed: u64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution_strategy: FirstSolutionStrategy::PathCheapestArc,
            time_limit: None,
            exact_node_limit: 12,
            max_iterations: 200,
            max_no_improve: 60,
            seed: 42,
        }
    }
}

impl SearchParameters {
    /// Sets the first-solution heuristic.
    pub fn with_first_solution_strategy(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution_strategy = strategy;
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the node count up to which optimality is proven, capped at
    /// [`MAX_EXACT_NODES`].
    pub fn with_exact_node_limit(mut self, n: usize) -> Self {
        self.exact_node_limit = n.min(MAX_EXACT_NODES);
        self
    }

    /// The exact-search node limit actually applied.
    pub fn effective_exact_node_limit(&self) -> usize {
        self.exact_node_limit.min(MAX_EXACT_NODES)
    }

    /// Sets the VNS iteration limit.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the VNS stagnation limit.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
