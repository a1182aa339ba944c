//! Distance and travel cost matrices.
//!
//! Provides a validated dense cost matrix and the [`ArcCost`] abstraction
//! shared by the neighborhood operators.

mod matrix;

pub use matrix::DistanceMatrix;

/// Cost of travelling along a directed arc between two nodes.
///
/// Implemented by [`DistanceMatrix`] and by
/// [`RoutingModel`](crate::routing::RoutingModel), so operators such as
/// 2-opt can run against either.
pub trait ArcCost {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Cost of the arc `from → to`.
    fn arc_cost(&self, from: usize, to: usize) -> f64;

    /// Cost of a node sequence, summing consecutive arcs.
    ///
    /// The sequence is not closed implicitly: pass `[a, b, c, a]` for a loop.
    fn path_cost(&self, path: &[usize]) -> f64 {
        path.windows(2).map(|w| self.arc_cost(w[0], w[1])).sum()
    }
}

impl ArcCost for DistanceMatrix {
    fn node_count(&self) -> usize {
        self.size()
    }

    fn arc_cost(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }
}
