//! Tour evaluator that validates tours and computes their total cost.

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::models::Tour;

/// Computes tour costs against one distance matrix and checks that tours
/// are closed permutations of its nodes.
///
/// This is the single source of truth for "total cost": strategies use
/// [`order_cost`](Self::order_cost) internally and the engine re-checks
/// every returned tour with [`cost`](Self::cost).
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::evaluation::TourEvaluator;
/// use u_tsp::models::Tour;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 4.0],
///     vec![2.0, 0.0, 1.0],
///     vec![1.0, 5.0, 0.0],
/// ])
/// .unwrap();
/// let evaluator = TourEvaluator::new(&dm);
/// assert_eq!(evaluator.cost(&Tour::from_order(&[0, 1, 2])).unwrap(), 3.0);
/// assert!(evaluator.cost(&Tour::from_order(&[0, 1, 1])).is_err());
/// ```
pub struct TourEvaluator<'a> {
    distances: &'a DistanceMatrix,
}

impl<'a> TourEvaluator<'a> {
    /// Creates a new evaluator for the given matrix.
    pub fn new(distances: &'a DistanceMatrix) -> Self {
        Self { distances }
    }

    /// Checks the tour length, closure and permutation invariants.
    pub fn validate(&self, tour: &Tour) -> Result<()> {
        let n = self.distances.size();
        let nodes = tour.nodes();
        if nodes.len() != n + 1 {
            return Err(Error::malformed_tour(format!(
                "expected {} entries for {n} nodes, got {}",
                n + 1,
                nodes.len()
            )));
        }
        if nodes[0] != nodes[n] {
            return Err(Error::malformed_tour(format!(
                "tour is not closed: starts at {} and ends at {}",
                nodes[0], nodes[n]
            )));
        }
        let mut seen = vec![false; n];
        for (pos, &node) in nodes[..n].iter().enumerate() {
            if node >= n {
                return Err(Error::malformed_tour(format!(
                    "node {node} at position {pos} is out of range for {n} nodes"
                )));
            }
            if seen[node] {
                return Err(Error::malformed_tour(format!(
                    "node {node} is visited more than once"
                )));
            }
            seen[node] = true;
        }
        Ok(())
    }

    /// Validates the tour and returns `Σ matrix[tour[i-1]][tour[i]]`.
    pub fn cost(&self, tour: &Tour) -> Result<f64> {
        self.validate(tour)?;
        Ok(self.sequence_cost(tour.nodes()))
    }

    /// Cost of an open order closed back to its first node. Unchecked.
    pub fn order_cost(&self, order: &[usize]) -> f64 {
        match (order.first(), order.last()) {
            (Some(&first), Some(&last)) => {
                self.sequence_cost(order) + self.distances.get(last, first)
            }
            _ => 0.0,
        }
    }

    fn sequence_cost(&self, nodes: &[usize]) -> f64 {
        nodes
            .windows(2)
            .map(|w| self.distances.get(w[0], w[1]))
            .sum()
    }
}
