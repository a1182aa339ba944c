//! Miller–Tucker–Zemlin formulation solved by a [`MipSolver`].
//!
//! # Model
//!
//! ```text
//! min  Σ c_ij x_ij                    over i ≠ j
//! s.t. Σ_j x_ij = 1                   for every i   (leave once)
//!      Σ_i x_ij = 1                   for every j   (enter once)
//!      u_i - u_j + N x_ij <= N - 1    for i ≠ j in 1..N
//!      x_ij ∈ {0, 1},  1 <= u_i <= N - 1
//! ```
//!
//! The order variables `u` forbid every sub-cycle that avoids node 0.
//!
//! The solver is warm-started from the patched assignment tour, with `u_i`
//! set to the position of node `i` on it. A time-limited run therefore
//! always has a tour to return.
//!
//! # Reference
//!
//! Miller, C.E., Tucker, A.W. & Zemlin, R.A. (1960). "Integer programming
//! formulation of traveling salesman problems", *Journal of the ACM* 7(4),
//! 326-329.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{SolvingStrategy, StrategyOutcome};
use crate::constructive::assignment_seed;
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::mip::{BranchAndBound, MipModel, MipSolution, MipSolver, MipStatus, Sense, VarId};
use crate::models::Tour;

const NAME: &str = "IntegerProgramming";

/// Value above which a binary arc variable counts as selected.
const ARC_SELECTED: f64 = 0.5;

/// Configuration for the default [`IntegerProgrammingStrategy`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegerProgrammingConfig {
    /// Branch-and-bound node limit (`None` = no limit).
    pub max_nodes: Option<usize>,
}

impl IntegerProgrammingConfig {
    /// Sets the node limit.
    pub fn with_max_nodes(mut self, max_nodes: Option<usize>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Builds the branch-and-bound solver this config describes.
    pub fn solver(&self) -> BranchAndBound {
        match self.max_nodes {
            Some(cap) => BranchAndBound::new().with_max_nodes(cap),
            None => BranchAndBound::new(),
        }
    }
}

/// Exact strategy that delegates the MTZ model to a MIP solver.
///
/// | Solver status | Outcome |
/// |---------------|---------|
/// | `Optimal` | tour, `optimal = true` |
/// | `Feasible` | tour, `optimal = false` |
/// | `Infeasible`, `NotSolved` | no tour |
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::strategy::{IntegerProgrammingStrategy, SolvingStrategy};
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 5.0],
///     vec![5.0, 0.0, 1.0],
///     vec![1.0, 5.0, 0.0],
/// ])
/// .unwrap();
/// let outcome = IntegerProgrammingStrategy::new(&Default::default())
///     .solve(&dm, None)
///     .unwrap();
/// assert!(outcome.optimal);
/// assert_eq!(outcome.tour.unwrap().nodes(), &[0, 1, 2, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct IntegerProgrammingStrategy<M: MipSolver = BranchAndBound> {
    solver: M,
}

impl IntegerProgrammingStrategy<BranchAndBound> {
    pub const NAME: &'static str = NAME;

    /// Creates the strategy with the default solver configured by `config`.
    pub fn new(config: &IntegerProgrammingConfig) -> Self {
        Self {
            solver: config.solver(),
        }
    }
}

impl<M: MipSolver> IntegerProgrammingStrategy<M> {
    /// Creates the strategy around another MIP solver.
    pub fn with_solver(solver: M) -> Self {
        Self { solver }
    }
}

/// Arc variables `x[i][j]` (absent on the diagonal) and order variables
/// `u[i]` (absent for node 0) of a built model.
struct TourModel {
    model: MipModel,
    arcs: Vec<Vec<Option<VarId>>>,
    order: Vec<Option<VarId>>,
}

impl TourModel {
    /// Variable values encoding the closed tour through the open `order`.
    fn assignment_for(&self, tour_order: &[usize]) -> Vec<f64> {
        let mut values = vec![0.0; self.model.num_vars()];
        let n = tour_order.len();
        for (position, &node) in tour_order.iter().enumerate() {
            let next = tour_order[(position + 1) % n];
            if let Some(x) = self.arcs[node][next] {
                values[x.index()] = 1.0;
            }
        }
        let rotation = tour_order.iter().position(|&node| node == 0).unwrap_or(0);
        for offset in 1..n {
            let node = tour_order[(rotation + offset) % n];
            if let Some(u) = self.order[node] {
                values[u.index()] = offset as f64;
            }
        }
        values
    }
}

fn build_model(distances: &DistanceMatrix) -> TourModel {
    let n = distances.size();
    // Self-loops have no variable; the sentinel keeps any stray lookup prohibitive.
    let costs = distances.with_diagonal((distances.max_arc_cost() + 1.0) * n as f64);
    let mut model = MipModel::new(format!("mtz_tsp_{n}"));

    let mut arcs = vec![vec![None; n]; n];
    let mut objective = Vec::with_capacity(n * (n - 1));
    for (i, row) in arcs.iter_mut().enumerate() {
        for (j, slot) in row.iter_mut().enumerate() {
            if i != j {
                let x = model.add_binary(format!("x_{i}_{j}"));
                objective.push((x, costs.get(i, j)));
                *slot = Some(x);
            }
        }
    }
    model.minimize(objective);

    let order: Vec<Option<VarId>> = (0..n)
        .map(|i| (i > 0).then(|| model.add_continuous(format!("u_{i}"), 1.0, (n - 1) as f64)))
        .collect();

    for i in 0..n {
        let out: Vec<(VarId, f64)> = arcs[i].iter().flatten().map(|&x| (x, 1.0)).collect();
        model.add_constraint(out, Sense::Eq, 1.0);
        let inbound: Vec<(VarId, f64)> =
            arcs.iter().filter_map(|row| row[i]).map(|x| (x, 1.0)).collect();
        model.add_constraint(inbound, Sense::Eq, 1.0);
    }

    let big_n = n as f64;
    for i in 1..n {
        for j in 1..n {
            if let (Some(x), Some(ui), Some(uj)) = (arcs[i][j], order[i], order[j]) {
                model.add_constraint(
                    vec![(ui, 1.0), (uj, -1.0), (x, big_n)],
                    Sense::LessEq,
                    big_n - 1.0,
                );
            }
        }
    }

    TourModel { model, arcs, order }
}

/// Follows selected arcs from node 0 back to node 0.
fn walk_arcs(arcs: &[Vec<Option<VarId>>], solution: &MipSolution) -> Result<Tour> {
    let n = arcs.len();
    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    let mut node = 0;
    for _ in 0..n {
        if visited[node] {
            return Err(Error::malformed_tour(format!(
                "arc chain from node 0 revisits node {node} after {} steps",
                order.len()
            )));
        }
        visited[node] = true;
        order.push(node);
        node = arcs[node]
            .iter()
            .position(|x| x.is_some_and(|x| solution.value(x) > ARC_SELECTED))
            .ok_or_else(|| Error::malformed_tour(format!("no selected arc leaves node {node}")))?;
    }
    if node != 0 {
        return Err(Error::malformed_tour(format!(
            "arc chain from node 0 does not close after {n} steps, ends at node {node}"
        )));
    }
    Ok(Tour::from_order(&order))
}

impl<M: MipSolver> SolvingStrategy for IntegerProgrammingStrategy<M> {
    fn name(&self) -> &str {
        NAME
    }

    fn solve(
        &self,
        distances: &DistanceMatrix,
        time_limit: Option<Duration>,
    ) -> Result<StrategyOutcome> {
        let tour_model = build_model(distances);
        let model = &tour_model.model;
        log::debug!(
            "integer_programming.build: vars={} constraints={}",
            model.num_vars(),
            model.num_constraints()
        );

        let start = tour_model.assignment_for(&assignment_seed(distances));
        let solution = self.solver.solve_from(model, time_limit, &start);
        log::debug!(
            "integer_programming.solve: status={:?} nodes={}",
            solution.status,
            solution.nodes_explored
        );

        let optimal = match solution.status {
            MipStatus::Optimal => true,
            MipStatus::Feasible => {
                log::warn!("integer_programming.solve: search cut short, returning incumbent");
                false
            }
            MipStatus::Infeasible | MipStatus::NotSolved => {
                return Ok(StrategyOutcome::infeasible());
            }
        };
        if !solution.has_solution() {
            return Ok(StrategyOutcome::infeasible());
        }

        let tour = walk_arcs(&tour_model.arcs, &solution)?;
        let outcome = StrategyOutcome::found(tour, optimal);
        Ok(match solution.objective {
            Some(objective) => outcome.with_reported_cost(objective),
            None => outcome,
        })
    }
}
