//! Caller-facing solve result.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Tour;
use crate::error::{Error, Result};

/// Result of a successful solve.
///
/// `optimal == false` means the tour is the best found under the time
/// budget (or by a heuristic), not proven minimal. Infeasibility is never
/// encoded here; it is returned as [`Error::Infeasible`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tsp::models::{SolveResult, Tour};
///
/// let result = SolveResult {
///     tour: Tour::from_order(&[0, 2, 1]),
///     optimal: true,
///     total_cost: 12.0,
///     strategy_name: "Exhaustive".into(),
///     elapsed: Duration::from_millis(1),
/// };
/// let labels = ["Paris", "Lyon", "Lille"];
/// assert_eq!(
///     result.describe_route(&labels).unwrap(),
///     "Paris -> Lille -> Lyon -> Paris"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Closed tour starting and ending at node 0.
    pub tour: Tour,
    /// `true` only if the strategy proved the tour minimal.
    pub optimal: bool,
    /// Total cost as computed by the tour evaluator.
    pub total_cost: f64,
    /// Canonical name of the strategy that produced the tour.
    pub strategy_name: String,
    /// Wall-clock time spent inside the strategy.
    pub elapsed: Duration,
}

impl SolveResult {
    /// Maps the closed tour onto caller labels (one label per node).
    pub fn ordered_labels<'a, S>(&self, labels: &'a [S]) -> Result<Vec<&'a S>> {
        self.tour
            .nodes()
            .iter()
            .map(|&node| {
                labels.get(node).ok_or_else(|| {
                    Error::malformed_tour(format!(
                        "node {node} has no label ({} labels given)",
                        labels.len()
                    ))
                })
            })
            .collect()
    }

    /// Renders the tour as `A -> B -> ... -> A` using caller labels.
    pub fn describe_route<S: AsRef<str>>(&self, labels: &[S]) -> Result<String> {
        let ordered = self.ordered_labels(labels)?;
        Ok(ordered
            .iter()
            .map(|label| label.as_ref())
            .collect::<Vec<_>>()
            .join(" -> "))
    }

    /// Renders [`total_cost`](Self::total_cost), read as travel seconds, as
    /// whole hours and minutes: `"2 hour(s) and 5 minute(s)"`, or
    /// `"5 minute(s)"` under an hour.
    pub fn describe_duration(&self) -> String {
        let total_minutes = (self.total_cost.max(0.0) / 60.0).floor() as u64;
        let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
        if hours > 0 {
            format!("{hours} hour(s) and {minutes} minute(s)")
        } else {
            format!("{minutes} minute(s)")
        }
    }
}
