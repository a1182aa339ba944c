//! Or-opt segment relocation on a closed tour.
//!
//! # Algorithm
//!
//! Tries moving segments of 1, 2, or 3 consecutive nodes to a different
//! position of the same tour, keeping their direction. Accepts the first
//! move that reduces the total cost:
//!
//! ```text
//! delta = d(p, first) + d(last, q) - d(p, q)          // insert between p, q
//!       - (d(prev, first) + d(last, next) - d(prev, next))  // remove
//! ```
//!
//! Because segment arcs keep their direction, the delta is exact on
//! asymmetric costs too. The start node at both ends of the tour never moves.
//!
//! # Complexity
//!
//! O(n²) per pass.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::budget::Deadline;
use crate::distance::ArcCost;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Applies one improving Or-opt move to a closed tour, if any exists.
///
/// Returns `true` if the tour changed. Stops early (returning `false`) once
/// the deadline has expired.
///
/// # Examples
///
/// ```
/// use u_tsp::budget::Deadline;
/// use u_tsp::distance::{ArcCost, DistanceMatrix};
/// use u_tsp::local_search::or_opt_move;
///
/// let rows: Vec<Vec<f64>> = (0..5)
///     .map(|i| (0..5).map(|j| (i as f64 - j as f64).abs()).collect())
///     .collect();
/// let dm = DistanceMatrix::from_rows(&rows).unwrap();
/// let mut tour = vec![0, 3, 1, 2, 4, 0];
/// let before = dm.path_cost(&tour);
/// assert!(or_opt_move(&mut tour, &dm, &Deadline::unbounded()));
/// assert!(dm.path_cost(&tour) < before);
/// ```
pub fn or_opt_move<C: ArcCost + ?Sized>(
    tour: &mut Vec<usize>,
    costs: &C,
    deadline: &Deadline,
) -> bool {
    let len = tour.len();
    if len < 4 {
        return false;
    }
    for seg_len in 1..=3usize {
        // Segment occupies positions [s, s + seg_len) inside 1..len-1.
        for s in 1..len {
            if s + seg_len > len - 1 {
                break;
            }
            if deadline.expired() {
                return false;
            }
            let first = tour[s];
            let last = tour[s + seg_len - 1];
            let prev = tour[s - 1];
            let next = tour[s + seg_len];
            let removal_gain = costs.arc_cost(prev, first) + costs.arc_cost(last, next)
                - costs.arc_cost(prev, next);

            // Insertion edge (tour[p], tour[p + 1]) outside the segment.
            for p in 0..len - 1 {
                if p + 1 >= s && p < s + seg_len {
                    continue;
                }
                let (a, b) = (tour[p], tour[p + 1]);
                let insert_cost =
                    costs.arc_cost(a, first) + costs.arc_cost(last, b) - costs.arc_cost(a, b);
                if insert_cost - removal_gain < -IMPROVEMENT_EPS {
                    let segment: Vec<usize> = tour.drain(s..s + seg_len).collect();
                    let at = if p < s { p + 1 } else { p + 1 - seg_len };
                    tour.splice(at..at, segment);
                    return true;
                }
            }
        }
    }
    false
}

/// Applies Or-opt moves until none improves or the deadline expires.
///
/// Returns the number of moves applied.
pub fn or_opt_improve<C: ArcCost + ?Sized>(
    tour: &mut Vec<usize>,
    costs: &C,
    deadline: &Deadline,
) -> usize {
    let mut moves = 0;
    while or_opt_move(tour, costs, deadline) {
        moves += 1;
    }
    moves
}
