//! Exact enumeration of every tour through node 0.
//!
//! Node 0 is fixed and the other N-1 nodes run through all (N-1)!
//! orderings in lexicographic order. The deadline is sampled before every
//! candidate after the first, so an interrupted run still returns the best
//! tour seen.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{budget_from_secs, SolvingStrategy, StrategyOutcome};
use crate::budget::Deadline;
use crate::distance::{ArcCost, DistanceMatrix};
use crate::error::Result;
use crate::models::Tour;

/// Configuration for [`ExhaustiveStrategy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhaustiveConfig {
    /// Budget used when the caller supplies none.
    pub default_budget_secs: f64,
}

impl Default for ExhaustiveConfig {
    fn default() -> Self {
        Self {
            default_budget_secs: 60.0,
        }
    }
}

impl ExhaustiveConfig {
    /// Sets the default budget in seconds.
    pub fn with_default_budget_secs(mut self, secs: f64) -> Self {
        self.default_budget_secs = secs;
        self
    }
}

/// Rearranges `items` into the next lexicographic permutation.
///
/// Returns `false` (leaving `items` untouched) when `items` is already the
/// last permutation.
///
/// # Examples
///
/// ```
/// use u_tsp::strategy::next_permutation;
///
/// let mut items = [1, 2, 3];
/// assert!(next_permutation(&mut items));
/// assert_eq!(items, [1, 3, 2]);
/// let mut last = [3, 2, 1];
/// assert!(!next_permutation(&mut last));
/// ```
pub fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let Some(pivot) = (0..items.len() - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let Some(successor) = (pivot + 1..items.len()).rev().find(|&j| items[j] > items[pivot]) else {
        return false;
    };
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

/// Brute-force strategy. Proves optimality when enumeration completes.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveStrategy {
    config: ExhaustiveConfig,
}

impl ExhaustiveStrategy {
    pub const NAME: &'static str = "Exhaustive";

    /// Creates the strategy with `config`.
    pub fn new(config: ExhaustiveConfig) -> Self {
        Self { config }
    }
}

impl SolvingStrategy for ExhaustiveStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn default_budget(&self) -> Option<Duration> {
        budget_from_secs(self.config.default_budget_secs)
    }

    fn solve(
        &self,
        distances: &DistanceMatrix,
        time_limit: Option<Duration>,
    ) -> Result<StrategyOutcome> {
        let deadline = Deadline::start(time_limit);
        let n = distances.size();

        // [0, 1, ..., n-1, 0]; only positions 1..n are permuted.
        let mut candidate: Vec<usize> = (0..n).chain(std::iter::once(0)).collect();
        let mut best = candidate.clone();
        let mut best_cost = distances.path_cost(&candidate);
        let mut scored = 1u64;
        let mut complete = true;

        while next_permutation(&mut candidate[1..n]) {
            if deadline.expired() {
                complete = false;
                break;
            }
            scored += 1;
            let cost = distances.path_cost(&candidate);
            if cost < best_cost {
                best_cost = cost;
                best.copy_from_slice(&candidate);
            }
        }

        if complete {
            log::debug!("exhaustive.enumerate: n={n} candidates={scored} best={best_cost:.4}");
        } else {
            log::warn!(
                "exhaustive.enumerate: budget exhausted after candidates={scored} best={best_cost:.4}"
            );
        }
        Ok(StrategyOutcome::found(Tour::new(best), complete).with_reported_cost(best_cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::TourEvaluator;
    use proptest::prelude::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid")
    }

    /// Independent enumeration: recursive over unvisited sets.
    fn brute_force(dm: &DistanceMatrix) -> f64 {
        fn go(dm: &DistanceMatrix, last: usize, visited: &mut Vec<bool>, depth: usize) -> f64 {
            let n = dm.size();
            if depth == n {
                return dm.get(last, 0);
            }
            let mut best = f64::INFINITY;
            for next in 1..n {
                if !visited[next] {
                    visited[next] = true;
                    best = best.min(dm.get(last, next) + go(dm, next, visited, depth + 1));
                    visited[next] = false;
                }
            }
            best
        }
        let mut visited = vec![false; dm.size()];
        visited[0] = true;
        go(dm, 0, &mut visited, 1)
    }

    #[test]
    fn test_permutation_count() {
        let mut items = [0, 1, 2, 3];
        let mut count = 1;
        while next_permutation(&mut items) {
            count += 1;
        }
        assert_eq!(count, 24);
        assert_eq!(items, [3, 2, 1, 0]);
    }

    #[test]
    fn test_sample_optimum() {
        let outcome = ExhaustiveStrategy::default().solve(&sample(), None).expect("solves");
        assert!(outcome.optimal);
        assert_eq!(outcome.reported_cost, Some(80.0));
        // Lexicographic order meets 0-1-3-2 before its reflection 0-2-3-1.
        assert_eq!(outcome.tour.expect("tour").nodes(), &[0, 1, 3, 2, 0]);
    }

    #[test]
    fn test_two_nodes() {
        let dm = DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![2.0, 0.0]]).expect("valid");
        let outcome = ExhaustiveStrategy::default().solve(&dm, None).expect("solves");
        assert!(outcome.optimal);
        assert_eq!(outcome.reported_cost, Some(3.0));
    }

    #[test]
    fn test_interrupted_keeps_first_candidate() {
        let rows: Vec<Vec<f64>> = (0..11)
            .map(|i| (0..11).map(|j| ((i * 7 + j * 13) % 17) as f64).collect())
            .collect();
        let dm = DistanceMatrix::from_rows(&rows).expect("valid");
        let outcome = ExhaustiveStrategy::default()
            .solve(&dm, Some(Duration::from_millis(5)))
            .expect("solves");
        // 10! candidates cannot finish in 5 ms.
        assert!(!outcome.optimal);
        let tour = outcome.tour.expect("tour");
        assert!(TourEvaluator::new(&dm).validate(&tour).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_matches_brute_force(
            rows in (2usize..=6).prop_flat_map(|n| {
                proptest::collection::vec(proptest::collection::vec(0.0f64..50.0, n), n)
            })
        ) {
            let dm = DistanceMatrix::from_rows(&rows).expect("valid");
            let outcome = ExhaustiveStrategy::default().solve(&dm, None).expect("solves");
            prop_assert!(outcome.optimal);
            let cost = TourEvaluator::new(&dm).cost(&outcome.tour.expect("tour")).expect("well-formed");
            prop_assert!((cost - brute_force(&dm)).abs() < 1e-9);
        }
    }
}
