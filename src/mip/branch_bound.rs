//! Depth-first branch-and-bound over LP relaxations.
//!
//! # Algorithm
//!
//! Each node carries its own variable bounds. The node's LP relaxation is
//! solved with the simplex in [`super::simplex`]; nodes that are infeasible
//! or cannot beat the incumbent are pruned. Otherwise the most fractional
//! integral variable is split into `x <= floor(v)` and `x >= ceil(v)`, and
//! the up branch is explored first. A relaxation with no fractional
//! integral variable becomes the new incumbent.
//!
//! The deadline is sampled before every node and before every simplex
//! pivot, so a time-limited run overshoots by at most one pivot plus one
//! tableau build. A feasible warm start passed to
//! [`MipSolver::solve_from`] becomes the first incumbent.
//!
//! # Reference
//!
//! Land, A.H. & Doig, A.G. (1960). "An automatic method of solving discrete
//! programming problems", *Econometrica* 28(3), 497-520.

use std::time::Duration;

use super::model::MipModel;
use super::simplex::{solve_relaxation, LpOutcome};
use super::{MipSolution, MipSolver, MipStatus};
use crate::budget::Deadline;

const INTEGRALITY_TOL: f64 = 1e-6;
const PRUNE_TOL: f64 = 1e-9;
const START_TOL: f64 = 1e-6;

/// Branch-and-bound solver for [`MipModel`]s.
///
/// # Examples
///
/// ```
/// use u_tsp::mip::{BranchAndBound, MipModel, MipSolver, MipStatus, Sense};
///
/// // max 5a + 4b + 3c s.t. 2a + 3b + c <= 5, 4a + b + 2c <= 11
/// let mut model = MipModel::new("knapsack");
/// let a = model.add_binary("a");
/// let b = model.add_binary("b");
/// let c = model.add_binary("c");
/// model.add_constraint(vec![(a, 2.0), (b, 3.0), (c, 1.0)], Sense::LessEq, 5.0);
/// model.add_constraint(vec![(a, 4.0), (b, 1.0), (c, 2.0)], Sense::LessEq, 11.0);
/// model.minimize(vec![(a, -5.0), (b, -4.0), (c, -3.0)]);
///
/// let solution = BranchAndBound::new().solve(&model, None);
/// assert_eq!(solution.status, MipStatus::Optimal);
/// assert!((solution.objective.unwrap() + 9.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    max_nodes: Option<usize>,
}

impl BranchAndBound {
    /// Creates a solver with no node limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after exploring `max_nodes` nodes (reported like a time-out).
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

/// Most fractional integral variable, if any.
fn branching_variable(model: &MipModel, values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (k, var) in model.variables().iter().enumerate() {
        if !var.is_integral() {
            continue;
        }
        let frac = values[k] - values[k].floor();
        let distance = frac.min(1.0 - frac);
        if distance > INTEGRALITY_TOL && best.map_or(true, |(_, d)| distance > d) {
            best = Some((k, distance));
        }
    }
    best.map(|(k, _)| k)
}

impl MipSolver for BranchAndBound {
    fn solve(&self, model: &MipModel, time_limit: Option<Duration>) -> MipSolution {
        self.search(model, time_limit, None)
    }

    fn solve_from(
        &self,
        model: &MipModel,
        time_limit: Option<Duration>,
        start: &[f64],
    ) -> MipSolution {
        self.search(model, time_limit, Some(start))
    }
}

impl BranchAndBound {
    fn search(
        &self,
        model: &MipModel,
        time_limit: Option<Duration>,
        start: Option<&[f64]>,
    ) -> MipSolution {
        if let Err(reason) = model.validate() {
            log::warn!("mip.solve: invalid model {}: {reason}", model.name());
            return MipSolution::without_solution(MipStatus::NotSolved, 0);
        }
        let deadline = Deadline::start(time_limit);
        let root: Vec<(f64, f64)> = model
            .variables()
            .iter()
            .map(|v| {
                if v.is_integral() {
                    (v.lower.ceil(), v.upper.floor())
                } else {
                    (v.lower, v.upper)
                }
            })
            .collect();

        let mut stack = vec![root];
        let mut incumbent: Option<(f64, Vec<f64>)> = match start {
            Some(values) if model.is_feasible(values, START_TOL) => {
                let objective = model.objective_value(values);
                log::debug!("mip.solve: warm start objective={objective:.4}");
                Some((objective, values.to_vec()))
            }
            Some(_) => {
                log::warn!("mip.solve: ignoring infeasible warm start for {}", model.name());
                None
            }
            None => None,
        };
        let mut nodes = 0usize;
        let mut interrupted = false;

        while let Some(bounds) = stack.pop() {
            if deadline.expired() || self.max_nodes.is_some_and(|cap| nodes >= cap) {
                interrupted = true;
                break;
            }
            nodes += 1;

            let (objective, values) = match solve_relaxation(model, &bounds, &deadline) {
                LpOutcome::Optimal { objective, values } => (objective, values),
                LpOutcome::Infeasible => continue,
                LpOutcome::TimedOut => {
                    interrupted = true;
                    break;
                }
                LpOutcome::Unbounded | LpOutcome::IterationLimit => {
                    log::warn!("mip.solve: relaxation failed at node {nodes}, skipping");
                    continue;
                }
            };
            if let Some((best, _)) = &incumbent {
                if objective >= best - PRUNE_TOL {
                    continue;
                }
            }

            match branching_variable(model, &values) {
                Some(k) => {
                    let v = values[k];
                    let mut down = bounds.clone();
                    down[k].1 = v.floor();
                    let mut up = bounds;
                    up[k].0 = v.ceil();
                    stack.push(down);
                    stack.push(up);
                }
                None => {
                    let rounded: Vec<f64> = values
                        .iter()
                        .zip(model.variables())
                        .map(|(&x, var)| if var.is_integral() { x.round() } else { x })
                        .collect();
                    log::debug!("mip.solve: incumbent objective={objective:.4} node={nodes}");
                    incumbent = Some((objective, rounded));
                }
            }
        }

        log::debug!(
            "mip.solve: done model={} nodes={nodes} interrupted={interrupted} elapsed_ms={}",
            model.name(),
            deadline.elapsed().as_millis()
        );

        match (incumbent, interrupted) {
            (Some((objective, values)), false) => MipSolution {
                status: MipStatus::Optimal,
                values,
                objective: Some(objective),
                nodes_explored: nodes,
            },
            (Some((objective, values)), true) => MipSolution {
                status: MipStatus::Feasible,
                values,
                objective: Some(objective),
                nodes_explored: nodes,
            },
            (None, false) => MipSolution::without_solution(MipStatus::Infeasible, nodes),
            (None, true) => MipSolution::without_solution(MipStatus::NotSolved, nodes),
        }
    }
}
