//! Single-vehicle routing model over an arc-cost callback.

use std::fmt;

use crate::distance::ArcCost;

/// Arc-cost callback: `(from, to) -> cost`.
pub type ArcCostCallback<'a> = Box<dyn Fn(usize, usize) -> f64 + Send + Sync + 'a>;

/// A routing problem with one vehicle that starts and ends at `depot` and
/// must visit every node exactly once.
///
/// Costs are never stored; the search queries the callback by node index.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::{ArcCost, DistanceMatrix};
/// use u_tsp::routing::RoutingModel;
///
/// let dm = DistanceMatrix::from_rows(&[vec![0.0, 2.0], vec![3.0, 0.0]]).unwrap();
/// let model = RoutingModel::new(dm.size(), 0, |i, j| dm.get(i, j));
/// assert_eq!(model.depot(), 0);
/// assert_eq!(model.arc_cost(1, 0), 3.0);
/// ```
pub struct RoutingModel<'a> {
    node_count: usize,
    depot: usize,
    arc_cost: ArcCostCallback<'a>,
}

impl<'a> RoutingModel<'a> {
    /// Creates a model with `node_count` nodes and the given arc costs.
    pub fn new<F>(node_count: usize, depot: usize, arc_cost: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Send + Sync + 'a,
    {
        Self {
            node_count,
            depot,
            arc_cost: Box::new(arc_cost),
        }
    }

    /// Start and end node of the vehicle.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Checks the node count, the depot index and that every arc cost is finite.
    pub fn validate(&self) -> Result<(), String> {
        if self.node_count < 2 {
            return Err(format!("need at least 2 nodes, got {}", self.node_count));
        }
        if self.depot >= self.node_count {
            return Err(format!(
                "depot {} out of range for {} nodes",
                self.depot, self.node_count
            ));
        }
        for i in 0..self.node_count {
            for j in 0..self.node_count {
                if i != j && !(self.arc_cost)(i, j).is_finite() {
                    return Err(format!("arc {i} -> {j} has no finite cost"));
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if every arc costs the same in both directions.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.node_count).all(|i| {
            ((i + 1)..self.node_count)
                .all(|j| ((self.arc_cost)(i, j) - (self.arc_cost)(j, i)).abs() <= tol)
        })
    }
}

impl ArcCost for RoutingModel<'_> {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn arc_cost(&self, from: usize, to: usize) -> f64 {
        (self.arc_cost)(from, to)
    }
}

impl fmt::Debug for RoutingModel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingModel")
            .field("node_count", &self.node_count)
            .field("depot", &self.depot)
            .finish_non_exhaustive()
    }
}
