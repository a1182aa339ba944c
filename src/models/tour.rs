//! Closed tour type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed visiting order: `[start, ..., start]`.
///
/// For `n` nodes a well-formed tour has `n + 1` entries, begins and ends at
/// the same node, and visits every node of `0..n` exactly once in between.
/// A `Tour` does not enforce this on its own; use
/// [`TourEvaluator::validate`](crate::evaluation::TourEvaluator::validate)
/// against the matrix it belongs to.
///
/// # Examples
///
/// ```
/// use u_tsp::models::Tour;
///
/// let tour = Tour::from_order(&[0, 2, 1]);
/// assert_eq!(tour.nodes(), &[0, 2, 1, 0]);
/// assert_eq!(tour.num_nodes(), 3);
/// assert_eq!(tour.to_string(), "0 -> 2 -> 1 -> 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour {
    nodes: Vec<usize>,
}

impl Tour {
    /// Wraps an already closed sequence as-is.
    pub fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    /// Closes an open order by appending its first node.
    pub fn from_order(order: &[usize]) -> Self {
        let mut nodes = Vec::with_capacity(order.len() + 1);
        nodes.extend_from_slice(order);
        if let Some(&first) = order.first() {
            nodes.push(first);
        }
        Self { nodes }
    }

    /// The closed node sequence.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// The visiting order without the closing node.
    pub fn order(&self) -> &[usize] {
        match self.nodes.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Number of distinct positions (`len - 1`).
    pub fn num_nodes(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Node the tour starts and ends at.
    pub fn start(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    /// Returns the same cycle started at `node`, or `None` if it is absent.
    pub fn rotated_to(&self, node: usize) -> Option<Self> {
        let order = self.order();
        let pos = order.iter().position(|&v| v == node)?;
        let mut rotated: Vec<usize> = order[pos..].iter().chain(&order[..pos]).copied().collect();
        rotated.push(node);
        Some(Self { nodes: rotated })
    }

    /// Returns the cycle traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.reverse();
        Self { nodes }
    }

    /// Consumes the tour, returning the closed sequence.
    pub fn into_nodes(self) -> Vec<usize> {
        self.nodes
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
