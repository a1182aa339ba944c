//! 2-opt improvement on a closed tour.
//!
//! # Algorithm
//!
//! For each pair of edges (t[i], t[i+1]) and (t[j], t[j+1]) with `j >= i + 2`
//! in a closed tour `t` of length n + 1, compute the change in cost from
//! reversing the segment between them:
//!
//! ```text
//! delta = d(t[i], t[j]) + d(t[i+1], t[j+1]) - d(t[i], t[i+1]) - d(t[j], t[j+1])
//! ```
//!
//! On asymmetric costs the reversed inner arcs change direction, so their
//! difference is added to `delta`. If delta < 0, reverse `t[i+1..=j]`
//! (first-improvement strategy). The pair (i = 0, j = n - 1) is skipped:
//! those two edges share node t[0], so the move would reverse the whole tour.
//!
//! One full scan over all pairs is a round. [`two_opt_improve`] repeats
//! rounds until a round makes no move, the round cap is reached, or the
//! deadline expires. The deadline is sampled once per pair.
//!
//! # Complexity
//!
//! O(n²) per round on symmetric costs, O(n³) on asymmetric costs.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::budget::Deadline;
use crate::distance::ArcCost;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Outcome of one 2-opt round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// At least one improving reversal was applied.
    Improved,
    /// The round found no improving reversal.
    Unchanged,
    /// The deadline expired during the round.
    TimedOut,
}

/// Summary of a multi-round 2-opt run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TwoOptReport {
    /// Rounds started.
    pub rounds: usize,
    /// Rounds that applied at least one reversal.
    pub improving_rounds: usize,
    /// Whether the deadline cut the search short.
    pub timed_out: bool,
}

/// Computes the cost change of reversing `tour[i+1..=j]`.
pub fn reversal_delta<C: ArcCost + ?Sized>(
    tour: &[usize],
    costs: &C,
    symmetric: bool,
    i: usize,
    j: usize,
) -> f64 {
    let (a, b, c, e) = (tour[i], tour[i + 1], tour[j], tour[j + 1]);
    let mut delta =
        costs.arc_cost(a, c) + costs.arc_cost(b, e) - costs.arc_cost(a, b) - costs.arc_cost(c, e);
    if !symmetric {
        for k in (i + 1)..j {
            delta += costs.arc_cost(tour[k + 1], tour[k]) - costs.arc_cost(tour[k], tour[k + 1]);
        }
    }
    delta
}

/// Runs one round of 2-opt over a closed tour, reversing in place.
///
/// # Examples
///
/// ```
/// use u_tsp::budget::Deadline;
/// use u_tsp::distance::{ArcCost, DistanceMatrix};
/// use u_tsp::local_search::{two_opt_pass, PassOutcome};
///
/// // Four corners of a unit square; 0-2-1-3 crosses itself.
/// let s = 2f64.sqrt();
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, s, 1.0],
///     vec![1.0, 0.0, 1.0, s],
///     vec![s, 1.0, 0.0, 1.0],
///     vec![1.0, s, 1.0, 0.0],
/// ])
/// .unwrap();
/// let mut tour = vec![0, 2, 1, 3, 0];
/// let outcome = two_opt_pass(&mut tour, &dm, true, &Deadline::unbounded());
/// assert_eq!(outcome, PassOutcome::Improved);
/// assert!((dm.path_cost(&tour) - 4.0).abs() < 1e-10);
/// ```
pub fn two_opt_pass<C: ArcCost + ?Sized>(
    tour: &mut [usize],
    costs: &C,
    symmetric: bool,
    deadline: &Deadline,
) -> PassOutcome {
    let len = tour.len();
    if len < 5 {
        return PassOutcome::Unchanged;
    }
    let mut improved = false;

    for i in 0..len - 1 {
        for j in (i + 2)..(len - 1) {
            if deadline.expired() {
                return PassOutcome::TimedOut;
            }
            if i == 0 && j == len - 2 {
                continue;
            }
            if reversal_delta(tour, costs, symmetric, i, j) < -IMPROVEMENT_EPS {
                tour[i + 1..=j].reverse();
                improved = true;
            }
        }
    }

    if improved {
        PassOutcome::Improved
    } else {
        PassOutcome::Unchanged
    }
}

/// Repeats 2-opt rounds until convergence, `max_rounds`, or the deadline.
pub fn two_opt_improve<C: ArcCost + ?Sized>(
    tour: &mut [usize],
    costs: &C,
    symmetric: bool,
    deadline: &Deadline,
    max_rounds: Option<usize>,
) -> TwoOptReport {
    let mut report = TwoOptReport::default();
    loop {
        if max_rounds.is_some_and(|cap| report.rounds >= cap) {
            break;
        }
        report.rounds += 1;
        match two_opt_pass(tour, costs, symmetric, deadline) {
            PassOutcome::Improved => report.improving_rounds += 1,
            PassOutcome::Unchanged => break,
            PassOutcome::TimedOut => {
                report.timed_out = true;
                break;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use proptest::prelude::*;
    use std::time::Duration;

    fn points_matrix(points: &[(f64, f64)]) -> DistanceMatrix {
        let rows: Vec<Vec<f64>> = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        DistanceMatrix::from_rows(&rows).expect("valid")
    }

    #[test]
    fn test_2opt_already_optimal() {
        let dm = points_matrix(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut tour = vec![0, 1, 2, 3, 0];
        let outcome = two_opt_pass(&mut tour, &dm, true, &Deadline::unbounded());
        assert_eq!(outcome, PassOutcome::Unchanged);
        assert_eq!(tour, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_2opt_keeps_endpoints() {
        let dm = points_matrix(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (4.0, 0.0),
        ]);
        let mut tour = vec![0, 1, 2, 3, 4, 0];
        two_opt_improve(&mut tour, &dm, true, &Deadline::unbounded(), None);
        assert_eq!(tour[0], 0);
        assert_eq!(tour[5], 0);
        assert!((dm.path_cost(&tour) - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_2opt_short_tours_untouched() {
        let dm = points_matrix(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let mut tour = vec![0, 2, 1, 0];
        let outcome = two_opt_pass(&mut tour, &dm, true, &Deadline::unbounded());
        assert_eq!(outcome, PassOutcome::Unchanged);
        assert_eq!(tour, vec![0, 2, 1, 0]);
    }

    #[test]
    fn test_2opt_times_out() {
        let dm = points_matrix(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (4.0, 0.0),
        ]);
        let deadline = Deadline::start(Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        let mut tour = vec![0, 1, 2, 3, 4, 0];
        let report = two_opt_improve(&mut tour, &dm, true, &deadline, None);
        assert!(report.timed_out);
        assert_eq!(tour, vec![0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_single_round_cap() {
        let dm = points_matrix(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (4.0, 0.0),
        ]);
        let mut tour = vec![0, 1, 2, 3, 4, 0];
        let report = two_opt_improve(&mut tour, &dm, true, &Deadline::unbounded(), Some(1));
        assert_eq!(report.rounds, 1);
    }

    #[test]
    fn test_asymmetric_delta_is_exact() {
        let dm = DistanceMatrix::from_rows(&[
            vec![0.0, 1.0, 7.0, 2.0, 9.0],
            vec![4.0, 0.0, 1.0, 8.0, 3.0],
            vec![6.0, 2.0, 0.0, 1.0, 5.0],
            vec![1.0, 9.0, 3.0, 0.0, 1.0],
            vec![1.0, 6.0, 2.0, 7.0, 0.0],
        ])
        .expect("valid");
        let tour = vec![0, 3, 1, 4, 2, 0];
        for i in 0..4 {
            for j in (i + 2)..5 {
                let mut reversed = tour.clone();
                reversed[i + 1..=j].reverse();
                let expected = dm.path_cost(&reversed) - dm.path_cost(&tour);
                let delta = reversal_delta(&tour, &dm, false, i, j);
                assert!((delta - expected).abs() < 1e-9, "i={i} j={j}");
            }
        }
    }

    proptest! {
        #[test]
        fn prop_2opt_never_worsens(cells in proptest::collection::vec(0.0f64..100.0, 36)) {
            let rows: Vec<Vec<f64>> = cells.chunks(6).map(<[f64]>::to_vec).collect();
            let dm = DistanceMatrix::from_rows(&rows).expect("valid");
            let mut tour = vec![0, 1, 2, 3, 4, 5, 0];
            let before = dm.path_cost(&tour);
            two_opt_improve(&mut tour, &dm, false, &Deadline::unbounded(), None);
            prop_assert!(dm.path_cost(&tour) <= before + 1e-9);
            prop_assert_eq!(tour[0], 0);
            prop_assert_eq!(tour[6], 0);
        }
    }
}
