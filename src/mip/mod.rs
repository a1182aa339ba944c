//! Mixed-integer programming collaborator.
//!
//! - [`MipModel`] — variables, linear constraints, minimization objective
//! - [`MipSolver`] — narrow solver interface: model and time limit in,
//!   status and assignment out
//! - [`BranchAndBound`] — default solver: depth-first branch-and-bound on a
//!   dense two-phase simplex
//!
//! Callers depend only on [`MipStatus`] and on the solver honoring its
//! time limit, so another implementation can replace [`BranchAndBound`].

mod branch_bound;
mod model;
mod simplex;

pub use branch_bound::BranchAndBound;
pub use model::{LinearConstraint, MipModel, Sense, VarId, VarKind, Variable};

use std::time::Duration;

/// Termination status of a MIP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    /// Search completed; the solution is proven optimal.
    Optimal,
    /// A solution was found but the search was cut short.
    Feasible,
    /// Search completed without any feasible solution.
    Infeasible,
    /// Stopped (time limit, node limit or invalid model) before finding a solution.
    NotSolved,
}

/// Result of a MIP solve.
#[derive(Debug, Clone, PartialEq)]
pub struct MipSolution {
    /// Termination status.
    pub status: MipStatus,
    /// Variable values indexed by [`VarId::index`]; empty without a solution.
    pub values: Vec<f64>,
    /// Objective of `values`.
    pub objective: Option<f64>,
    /// Branch-and-bound nodes processed.
    pub nodes_explored: usize,
}

impl MipSolution {
    /// A solution-less result with the given status.
    pub fn without_solution(status: MipStatus, nodes_explored: usize) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
            nodes_explored,
        }
    }

    /// Returns `true` if variable values are available.
    pub fn has_solution(&self) -> bool {
        matches!(self.status, MipStatus::Optimal | MipStatus::Feasible) && !self.values.is_empty()
    }

    /// Value of `var`, or `0.0` without a solution.
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }
}

/// A mixed-integer solver.
pub trait MipSolver: Send + Sync {
    /// Minimizes `model` within `time_limit` (`None` = no limit).
    fn solve(&self, model: &MipModel, time_limit: Option<Duration>) -> MipSolution;

    /// Like [`solve`](Self::solve), starting from a known assignment.
    ///
    /// A feasible `start` lets a search cut short by its time limit still
    /// report [`MipStatus::Feasible`]. Solvers without warm-start support
    /// ignore it.
    fn solve_from(
        &self,
        model: &MipModel,
        time_limit: Option<Duration>,
        _start: &[f64],
    ) -> MipSolution {
        self.solve(model, time_limit)
    }
}
