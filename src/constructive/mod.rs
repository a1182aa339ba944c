//! Constructive heuristics for building initial tours.
//!
//! - [`assignment_successors`] — Hungarian-method assignment relaxation, O(n³)
//! - [`patch_cycles`] — Karp patching of assignment sub-cycles, O(n³)
//! - [`path_cheapest_arc`] — Greedy cheapest outgoing arc from the depot, O(n²)
//! - [`cheapest_insertion`] — Cheapest insertion into a growing cycle, O(n³)

mod assignment;
mod cheapest_arc;
mod patching;

pub use assignment::assignment_successors;
pub use cheapest_arc::{cheapest_insertion, path_cheapest_arc};
pub use patching::{cycle_labels, patch_cycles};

use crate::distance::DistanceMatrix;

/// Builds a closed-tour seed from the assignment relaxation.
///
/// Solves the assignment problem, splices its sub-cycles into one cycle and
/// returns the open order starting at node 0.
pub fn assignment_seed(distances: &DistanceMatrix) -> Vec<usize> {
    let successors = assignment_successors(distances);
    patch_cycles(&successors, distances)
}
