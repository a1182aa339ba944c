//! Default routing solver: greedy start, exact DP for small models, VNS otherwise.

use u_metaheur::vns::{VnsConfig, VnsRunner};

use super::held_karp::held_karp;
use super::neighborhoods::TourNeighborhoods;
use super::{
    FirstSolutionStrategy, RoutingAssignment, RoutingModel, RoutingSolver, RoutingStatus,
    SearchParameters,
};
use crate::budget::Deadline;
use crate::constructive::{cheapest_insertion, path_cheapest_arc};
use crate::distance::ArcCost;

/// Local-search routing solver.
///
/// 1. Builds a first solution with
///    [`SearchParameters::first_solution_strategy`].
/// 2. If the model has at most [`SearchParameters::exact_node_limit`] nodes
///    (never more than [`MAX_EXACT_NODES`](super::MAX_EXACT_NODES)), runs
///    Held–Karp and reports [`RoutingStatus::Optimal`] when it finishes.
/// 3. Otherwise improves the first solution with variable neighborhood
///    search and reports [`RoutingStatus::Success`].
///
/// A time-out always leaves the best tour found so far in the assignment.
///
/// # Examples
///
/// ```
/// use u_tsp::routing::{
///     LocalRoutingSearch, RoutingModel, RoutingSolver, RoutingStatus, SearchParameters,
/// };
///
/// let model = RoutingModel::new(4, 0, |i, j| (i as f64 - j as f64).abs());
/// let assignment = LocalRoutingSearch::new().solve(&model, &SearchParameters::default());
/// assert_eq!(assignment.status, RoutingStatus::Optimal);
/// assert_eq!(assignment.objective, Some(6.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRoutingSearch;

impl LocalRoutingSearch {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl RoutingSolver for LocalRoutingSearch {
    fn solve(&self, model: &RoutingModel<'_>, params: &SearchParameters) -> RoutingAssignment {
        if let Err(reason) = model.validate() {
            log::warn!("routing.solve: invalid model: {reason}");
            return RoutingAssignment::without_solution(RoutingStatus::Invalid);
        }
        let deadline = Deadline::start(params.time_limit);
        let n = model.node_count();
        let depot = model.depot();

        let first = match params.first_solution_strategy {
            FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(model, depot),
            FirstSolutionStrategy::CheapestInsertion => cheapest_insertion(model, depot),
        };
        if first.len() != n {
            log::warn!("routing.solve: first solution visited {} of {n} nodes", first.len());
            return RoutingAssignment::without_solution(RoutingStatus::Fail);
        }
        let mut tour = first;
        tour.push(depot);
        log::debug!(
            "routing.solve: first solution strategy={:?} cost={:.4}",
            params.first_solution_strategy,
            model.path_cost(&tour)
        );

        if n <= params.effective_exact_node_limit() {
            match held_karp(model, &deadline) {
                Some(mut order) => {
                    order.push(depot);
                    log::debug!(
                        "routing.solve: exact search finished elapsed_ms={}",
                        deadline.elapsed().as_millis()
                    );
                    return RoutingAssignment::from_tour(RoutingStatus::Optimal, &order, model);
                }
                None => {
                    log::debug!("routing.solve: exact search timed out, keeping first solution");
                    return RoutingAssignment::from_tour(RoutingStatus::Success, &tour, model);
                }
            }
        }
        if deadline.expired() {
            return RoutingAssignment::from_tour(RoutingStatus::Success, &tour, model);
        }

        let problem = TourNeighborhoods::new(model, deadline, tour.clone());
        let config = VnsConfig::default()
            .with_max_iterations(params.max_iterations)
            .with_max_no_improve(params.max_no_improve)
            .with_seed(params.seed);
        let result = VnsRunner::run(&problem, &config);
        log::debug!(
            "routing.solve: vns iterations={} best_cost={:.4} timed_out={}",
            result.iterations,
            result.best_cost,
            deadline.expired()
        );

        let best = if result.best_cost < model.path_cost(&tour) {
            result.best
        } else {
            tour
        };
        RoutingAssignment::from_tour(RoutingStatus::Success, &best, model)
    }
}
