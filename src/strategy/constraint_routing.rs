//! Single-vehicle routing search over the matrix.

use std::time::Duration;

use super::{SolvingStrategy, StrategyOutcome};
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::models::Tour;
use crate::routing::{
    FirstSolutionStrategy, LocalRoutingSearch, RoutingAssignment, RoutingModel, RoutingSolver,
    RoutingStatus, SearchParameters,
};

const NAME: &str = "ConstraintRouting";
const DEPOT: usize = 0;

/// Strategy that hands the matrix to a [`RoutingSolver`] as a one-vehicle
/// routing model with depot 0.
///
/// The first solution is always built with
/// [`FirstSolutionStrategy::PathCheapestArc`]; the other parameters come
/// from the configured [`SearchParameters`].
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::routing::SearchParameters;
/// use u_tsp::strategy::{ConstraintRoutingStrategy, SolvingStrategy};
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 2.0, 9.0],
///     vec![9.0, 0.0, 2.0],
///     vec![2.0, 9.0, 0.0],
/// ])
/// .unwrap();
/// let strategy = ConstraintRoutingStrategy::new(SearchParameters::default());
/// let outcome = strategy.solve(&dm, None).unwrap();
/// assert!(outcome.optimal);
/// assert_eq!(outcome.reported_cost, Some(6.0));
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintRoutingStrategy<S: RoutingSolver = LocalRoutingSearch> {
    solver: S,
    params: SearchParameters,
}

impl ConstraintRoutingStrategy<LocalRoutingSearch> {
    pub const NAME: &'static str = NAME;

    /// Creates the strategy with the default routing solver.
    pub fn new(params: SearchParameters) -> Self {
        Self::with_solver(LocalRoutingSearch::new(), params)
    }
}

impl<S: RoutingSolver> ConstraintRoutingStrategy<S> {
    /// Creates the strategy around another routing solver.
    pub fn with_solver(solver: S, params: SearchParameters) -> Self {
        Self {
            solver,
            params: params.with_first_solution_strategy(FirstSolutionStrategy::PathCheapestArc),
        }
    }
}

/// Reads the route from the depot's successor chain.
fn read_route(assignment: &RoutingAssignment, n: usize) -> Result<Tour> {
    let mut order = Vec::with_capacity(n);
    let mut node = DEPOT;
    loop {
        order.push(node);
        if order.len() > n {
            return Err(Error::malformed_tour(format!(
                "route from depot does not return within {n} nodes"
            )));
        }
        node = assignment
            .next(node)
            .ok_or_else(|| Error::malformed_tour(format!("node {node} has no successor")))?;
        if node == DEPOT {
            break;
        }
    }
    Ok(Tour::from_order(&order))
}

impl<S: RoutingSolver> SolvingStrategy for ConstraintRoutingStrategy<S> {
    fn name(&self) -> &str {
        NAME
    }

    fn solve(
        &self,
        distances: &DistanceMatrix,
        time_limit: Option<Duration>,
    ) -> Result<StrategyOutcome> {
        let n = distances.size();
        let model = RoutingModel::new(n, DEPOT, |from, to| distances.get(from, to));
        let params = self.params.clone().with_time_limit(time_limit);

        let assignment = self.solver.solve(&model, &params);
        log::debug!(
            "constraint_routing.solve: status={:?} objective={:?}",
            assignment.status,
            assignment.objective
        );
        if !assignment.status.has_solution() {
            return Ok(StrategyOutcome::infeasible());
        }

        let tour = read_route(&assignment, n)?;
        let outcome = StrategyOutcome::found(tour, assignment.status == RoutingStatus::Optimal);
        Ok(match assignment.objective {
            Some(objective) => outcome.with_reported_cost(objective),
            None => outcome,
        })
    }
}
