//! Dense two-phase primal simplex for LP relaxations.
//!
//! # Algorithm
//!
//! Variables are shifted to `y = x - lower >= 0`; finite upper bounds become
//! `y <= upper - lower` rows. Rows are normalized to a non-negative
//! right-hand side and receive a slack (`<=`), a surplus plus an artificial
//! (`>=`), or an artificial (`=`).
//!
//! Phase 1 minimizes the sum of artificials; a positive optimum means the
//! relaxation is infeasible. Artificials left in the basis at zero are
//! pivoted out where possible, then phase 2 minimizes the real objective
//! with artificials barred from entering. Bland's rule (lowest index
//! entering column, lowest basic index on ratio ties) prevents cycling.
//!
//! The deadline is sampled before every pivot; an expired budget abandons
//! the relaxation with [`LpOutcome::TimedOut`].
//!
//! # Reference
//!
//! Dantzig, G.B. (1963). *Linear Programming and Extensions*. Princeton
//! University Press. Bland, R.G. (1977). "New finite pivoting rules for the
//! simplex method", *Mathematics of Operations Research* 2(2), 103-107.

use super::model::{MipModel, Sense};
use crate::budget::Deadline;

const PIVOT_EPS: f64 = 1e-9;
const FEASIBILITY_TOL: f64 = 1e-7;
const MAX_PIVOTS: usize = 100_000;

/// Outcome of solving an LP relaxation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LpOutcome {
    Optimal { objective: f64, values: Vec<f64> },
    Infeasible,
    Unbounded,
    IterationLimit,
    TimedOut,
}

struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    /// Index of the right-hand-side column.
    width: usize,
    pivots: usize,
}

enum Optimize {
    Done,
    Unbounded,
    IterationLimit,
    TimedOut,
}

impl Tableau {
    fn pivot(&mut self, objective: &mut [f64], row: usize, col: usize) {
        let p = self.rows[row][col];
        for v in self.rows[row].iter_mut() {
            *v /= p;
        }
        let pivot_row = self.rows[row].clone();
        for (i, r) in self.rows.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let f = r[col];
            if f.abs() > 0.0 {
                for (v, pv) in r.iter_mut().zip(&pivot_row) {
                    *v -= f * pv;
                }
            }
        }
        let f = objective[col];
        if f.abs() > 0.0 {
            for (v, pv) in objective.iter_mut().zip(&pivot_row) {
                *v -= f * pv;
            }
        }
        self.basis[row] = col;
        self.pivots += 1;
    }

    /// Minimizes the reduced-cost row `objective`, letting only columns
    /// below `entering_limit` enter the basis.
    fn optimize(
        &mut self,
        objective: &mut [f64],
        entering_limit: usize,
        deadline: &Deadline,
    ) -> Optimize {
        loop {
            if self.pivots > MAX_PIVOTS {
                return Optimize::IterationLimit;
            }
            if deadline.expired() {
                return Optimize::TimedOut;
            }
            let Some(col) = (0..entering_limit).find(|&c| objective[c] < -PIVOT_EPS) else {
                return Optimize::Done;
            };
            let mut leave: Option<(usize, f64)> = None;
            for (i, r) in self.rows.iter().enumerate() {
                let a = r[col];
                if a <= PIVOT_EPS {
                    continue;
                }
                let ratio = r[self.width] / a;
                let better = match leave {
                    None => true,
                    Some((li, lr)) => {
                        ratio < lr - PIVOT_EPS
                            || (ratio <= lr + PIVOT_EPS && self.basis[i] < self.basis[li])
                    }
                };
                if better {
                    leave = Some((i, ratio));
                }
            }
            let Some((row, _)) = leave else {
                return Optimize::Unbounded;
            };
            self.pivot(objective, row, col);
        }
    }
}

/// Solves the LP relaxation of `model` with per-variable `bounds`
/// overriding the model's own bounds, giving up once `deadline` expires.
pub(crate) fn solve_relaxation(
    model: &MipModel,
    bounds: &[(f64, f64)],
    deadline: &Deadline,
) -> LpOutcome {
    let n = model.num_vars();
    let costs = model.objective_coefficients();

    let mut raw_rows: Vec<(Vec<f64>, Sense, f64)> = Vec::new();
    for c in model.constraints() {
        let mut coeffs = vec![0.0; n];
        for &(var, a) in &c.terms {
            coeffs[var.index()] += a;
        }
        let shift: f64 = coeffs.iter().zip(bounds).map(|(a, b)| a * b.0).sum();
        raw_rows.push((coeffs, c.sense, c.rhs - shift));
    }
    for (k, &(lower, upper)) in bounds.iter().enumerate() {
        if upper < lower - FEASIBILITY_TOL {
            return LpOutcome::Infeasible;
        }
        if upper.is_finite() {
            let mut coeffs = vec![0.0; n];
            coeffs[k] = 1.0;
            raw_rows.push((coeffs, Sense::LessEq, (upper - lower).max(0.0)));
        }
    }
    for (coeffs, sense, rhs) in raw_rows.iter_mut() {
        if *rhs < 0.0 {
            for a in coeffs.iter_mut() {
                *a = -*a;
            }
            *rhs = -*rhs;
            *sense = match *sense {
                Sense::LessEq => Sense::GreaterEq,
                Sense::GreaterEq => Sense::LessEq,
                Sense::Eq => Sense::Eq,
            };
        }
    }

    let n_slack = raw_rows.iter().filter(|r| r.1 != Sense::Eq).count();
    let art_start = n + n_slack;
    let n_art = raw_rows.iter().filter(|r| r.1 != Sense::LessEq).count();
    let width = art_start + n_art;

    let mut tableau = Tableau {
        rows: Vec::with_capacity(raw_rows.len()),
        basis: Vec::with_capacity(raw_rows.len()),
        width,
        pivots: 0,
    };
    let mut slack_col = n;
    let mut art_col = art_start;
    for (coeffs, sense, rhs) in raw_rows {
        let mut row = vec![0.0; width + 1];
        row[..n].copy_from_slice(&coeffs);
        row[width] = rhs;
        match sense {
            Sense::LessEq => {
                row[slack_col] = 1.0;
                tableau.basis.push(slack_col);
                slack_col += 1;
            }
            Sense::GreaterEq => {
                row[slack_col] = -1.0;
                slack_col += 1;
                row[art_col] = 1.0;
                tableau.basis.push(art_col);
                art_col += 1;
            }
            Sense::Eq => {
                row[art_col] = 1.0;
                tableau.basis.push(art_col);
                art_col += 1;
            }
        }
        tableau.rows.push(row);
    }

    // Phase 1: minimize the sum of artificials.
    if n_art > 0 {
        let mut phase1 = vec![0.0; width + 1];
        for (row, &b) in tableau.rows.iter().zip(&tableau.basis) {
            if b < art_start {
                continue;
            }
            for (c, v) in phase1.iter_mut().enumerate() {
                if c < art_start || c == width {
                    *v -= row[c];
                }
            }
        }
        match tableau.optimize(&mut phase1, width, deadline) {
            Optimize::Done => {}
            Optimize::Unbounded => return LpOutcome::Infeasible,
            Optimize::IterationLimit => return LpOutcome::IterationLimit,
            Optimize::TimedOut => return LpOutcome::TimedOut,
        }
        if -phase1[width] > FEASIBILITY_TOL {
            return LpOutcome::Infeasible;
        }
        for i in 0..tableau.rows.len() {
            if tableau.basis[i] < art_start {
                continue;
            }
            if let Some(col) = (0..art_start).find(|&c| tableau.rows[i][c].abs() > PIVOT_EPS) {
                tableau.pivot(&mut phase1, i, col);
            }
        }
    }

    // Phase 2: minimize the shifted objective.
    let mut phase2 = vec![0.0; width + 1];
    phase2[..n].copy_from_slice(&costs);
    for i in 0..tableau.rows.len() {
        let f = phase2[tableau.basis[i]];
        if f.abs() > 0.0 {
            for (v, rv) in phase2.iter_mut().zip(&tableau.rows[i]) {
                *v -= f * rv;
            }
        }
    }
    match tableau.optimize(&mut phase2, art_start, deadline) {
        Optimize::Done => {}
        Optimize::Unbounded => return LpOutcome::Unbounded,
        Optimize::IterationLimit => return LpOutcome::IterationLimit,
        Optimize::TimedOut => return LpOutcome::TimedOut,
    }

    let mut values: Vec<f64> = bounds.iter().map(|b| b.0).collect();
    for (row, &b) in tableau.rows.iter().zip(&tableau.basis) {
        if b < n {
            values[b] += row[width];
        }
    }
    let objective = costs.iter().zip(&values).map(|(c, x)| c * x).sum();
    LpOutcome::Optimal { objective, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::mip::model::VarKind;

    fn solve(model: &MipModel, bounds: &[(f64, f64)]) -> LpOutcome {
        solve_relaxation(model, bounds, &Deadline::unbounded())
    }

    fn bounds(model: &MipModel) -> Vec<(f64, f64)> {
        model.variables().iter().map(|v| (v.lower, v.upper)).collect()
    }

    fn optimal(outcome: LpOutcome) -> (f64, Vec<f64>) {
        match outcome {
            LpOutcome::Optimal { objective, values } => (objective, values),
            other => panic!("expected optimum, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_max() {
        // max 3x + 2y s.t. x + y <= 4, x + 3y <= 6, x <= 3
        let mut model = MipModel::new("lp");
        let x = model.add_continuous("x", 0.0, 3.0);
        let y = model.add_continuous("y", 0.0, f64::INFINITY);
        model.add_constraint(vec![(x, 1.0), (y, 1.0)], Sense::LessEq, 4.0);
        model.add_constraint(vec![(x, 1.0), (y, 3.0)], Sense::LessEq, 6.0);
        model.minimize(vec![(x, -3.0), (y, -2.0)]);
        let (obj, values) = optimal(solve(&model, &bounds(&model)));
        assert!((obj + 11.0).abs() < 1e-7);
        assert!((values[0] - 3.0).abs() < 1e-7);
        assert!((values[1] - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_equality_and_ge() {
        // min x + 2y s.t. x + y = 5, x >= 1, y >= 2 (as rows)
        let mut model = MipModel::new("lp");
        let x = model.add_continuous("x", 0.0, f64::INFINITY);
        let y = model.add_continuous("y", 0.0, f64::INFINITY);
        model.add_constraint(vec![(x, 1.0), (y, 1.0)], Sense::Eq, 5.0);
        model.add_constraint(vec![(x, 1.0)], Sense::GreaterEq, 1.0);
        model.add_constraint(vec![(y, 1.0)], Sense::GreaterEq, 2.0);
        model.minimize(vec![(x, 1.0), (y, 2.0)]);
        let (obj, values) = optimal(solve(&model, &bounds(&model)));
        assert!((obj - 7.0).abs() < 1e-7);
        assert!((values[0] - 3.0).abs() < 1e-7);
        assert!((values[1] - 2.0).abs() < 1e-7);
    }

    #[test]
    fn test_shifted_lower_bounds() {
        // min x s.t. x + y >= 10, x in [2, 8], y in [1, 4]
        let mut model = MipModel::new("lp");
        let x = model.add_var("x", 2.0, 8.0, VarKind::Continuous);
        let y = model.add_var("y", 1.0, 4.0, VarKind::Continuous);
        model.add_constraint(vec![(x, 1.0), (y, 1.0)], Sense::GreaterEq, 10.0);
        model.minimize(vec![(x, 1.0)]);
        let (obj, values) = optimal(solve(&model, &bounds(&model)));
        assert!((obj - 6.0).abs() < 1e-7);
        assert!((values[1] - 4.0).abs() < 1e-7);
    }

    #[test]
    fn test_infeasible() {
        let mut model = MipModel::new("lp");
        let x = model.add_continuous("x", 0.0, 1.0);
        model.add_constraint(vec![(x, 1.0)], Sense::GreaterEq, 2.0);
        model.minimize(vec![(x, 1.0)]);
        assert_eq!(solve(&model, &bounds(&model)), LpOutcome::Infeasible);
    }

    #[test]
    fn test_crossed_bounds_infeasible() {
        let mut model = MipModel::new("lp");
        model.add_continuous("x", 0.0, 1.0);
        assert_eq!(solve(&model, &[(1.0, 0.0)]), LpOutcome::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        let mut model = MipModel::new("lp");
        let x = model.add_continuous("x", 0.0, f64::INFINITY);
        model.minimize(vec![(x, -1.0)]);
        assert_eq!(solve(&model, &bounds(&model)), LpOutcome::Unbounded);
    }

    #[test]
    fn test_redundant_equalities() {
        // x + y = 2 stated twice.
        let mut model = MipModel::new("lp");
        let x = model.add_continuous("x", 0.0, f64::INFINITY);
        let y = model.add_continuous("y", 0.0, f64::INFINITY);
        model.add_constraint(vec![(x, 1.0), (y, 1.0)], Sense::Eq, 2.0);
        model.add_constraint(vec![(x, 1.0), (y, 1.0)], Sense::Eq, 2.0);
        model.minimize(vec![(x, 1.0), (y, 3.0)]);
        let (obj, values) = optimal(solve(&model, &bounds(&model)));
        assert!((obj - 2.0).abs() < 1e-7);
        assert!((values[0] - 2.0).abs() < 1e-7);
    }

    #[test]
    fn test_expired_deadline_times_out() {
        let mut model = MipModel::new("lp");
        let x = model.add_continuous("x", 0.0, 3.0);
        let y = model.add_continuous("y", 0.0, 3.0);
        model.add_constraint(vec![(x, 1.0), (y, 1.0)], Sense::LessEq, 4.0);
        model.minimize(vec![(x, -1.0), (y, -2.0)]);
        let deadline = Deadline::start(Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(solve_relaxation(&model, &bounds(&model), &deadline), LpOutcome::TimedOut);
    }
}
