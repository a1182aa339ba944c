//! Single-vehicle constraint-routing collaborator.
//!
//! - [`RoutingModel`] — node count, depot and an arc-cost callback
//! - [`SearchParameters`] — first-solution heuristic, time limit and
//!   search limits
//! - [`RoutingSolver`] — narrow solver interface: model and parameters in,
//!   [`RoutingAssignment`] out
//! - [`LocalRoutingSearch`] — default solver (exact DP on small models,
//!   variable neighborhood search otherwise)

mod held_karp;
mod model;
mod neighborhoods;
mod params;
mod search;

pub use model::{ArcCostCallback, RoutingModel};
pub use params::{FirstSolutionStrategy, SearchParameters, MAX_EXACT_NODES};
pub use search::LocalRoutingSearch;

use serde::{Deserialize, Serialize};

use crate::distance::ArcCost;

/// Termination status of a routing search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingStatus {
    /// The search has not run.
    NotSolved,
    /// A solution was found; optimality is not proven.
    Success,
    /// A solution was found and proven optimal.
    Optimal,
    /// No solution was found.
    Fail,
    /// The time limit expired before any solution was found.
    FailTimeout,
    /// The model was rejected.
    Invalid,
}

impl RoutingStatus {
    /// Returns `true` for the statuses that carry a route.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Success | Self::Optimal)
    }
}

/// Outcome of a routing search: status plus a successor for every node.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingAssignment {
    /// Termination status.
    pub status: RoutingStatus,
    /// Cost of the route, when one exists.
    pub objective: Option<f64>,
    next: Vec<usize>,
}

impl RoutingAssignment {
    /// A route-less assignment with the given status.
    pub fn without_solution(status: RoutingStatus) -> Self {
        Self {
            status,
            objective: None,
            next: Vec::new(),
        }
    }

    /// Builds the assignment for a closed tour `[depot, ..., depot]`.
    pub fn from_tour<C: ArcCost + ?Sized>(
        status: RoutingStatus,
        tour: &[usize],
        costs: &C,
    ) -> Self {
        let mut next = vec![usize::MAX; costs.node_count()];
        for pair in tour.windows(2) {
            next[pair[0]] = pair[1];
        }
        Self {
            status,
            objective: Some(costs.path_cost(tour)),
            next,
        }
    }

    /// Successor of `node` on the route.
    pub fn next(&self, node: usize) -> Option<usize> {
        self.next.get(node).copied().filter(|&v| v != usize::MAX)
    }
}

/// A single-vehicle routing solver.
pub trait RoutingSolver: Send + Sync {
    /// Searches for a route through every node of `model`.
    fn solve(&self, model: &RoutingModel<'_>, params: &SearchParameters) -> RoutingAssignment;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_successors() {
        let model = RoutingModel::new(3, 0, |_, _| 2.0);
        let assignment = RoutingAssignment::from_tour(RoutingStatus::Success, &[0, 2, 1, 0], &model);
        assert_eq!(assignment.next(0), Some(2));
        assert_eq!(assignment.next(2), Some(1));
        assert_eq!(assignment.next(1), Some(0));
        assert_eq!(assignment.next(9), None);
        assert_eq!(assignment.objective, Some(6.0));
    }

    #[test]
    fn test_status_has_solution() {
        assert!(RoutingStatus::Optimal.has_solution());
        assert!(RoutingStatus::Success.has_solution());
        assert!(!RoutingStatus::FailTimeout.has_solution());
        assert!(!RoutingStatus::NotSolved.has_solution());
    }
}
