//! Sub-cycle patching.
//!
//! # Algorithm
//!
//! Given a successor function made of disjoint cycles, repeatedly merge the
//! cycle containing node 0 with another cycle. Merging exchanges the
//! successors of one node `a` in the first cycle and one node `b` in the
//! other:
//!
//! ```text
//! delta = d(a, s[b]) + d(b, s[a]) - d(a, s[a]) - d(b, s[b])
//! ```
//!
//! The exchange with the smallest delta over all candidate pairs is applied.
//! Each merge removes one cycle, so at most `n / 2` merges are needed.
//!
//! # Complexity
//!
//! O(n²) per merge, O(n³) overall.
//!
//! # Reference
//!
//! Karp, R.M. (1979). "A patching algorithm for the nonsymmetric
//! traveling-salesman problem", *SIAM Journal on Computing* 8(4), 561-573.

use crate::distance::DistanceMatrix;

/// Labels each node with the index of the cycle it belongs to.
///
/// Returns `(labels, cycle_count)`.
pub fn cycle_labels(successors: &[usize]) -> (Vec<usize>, usize) {
    let n = successors.len();
    let mut labels = vec![usize::MAX; n];
    let mut count = 0;
    for start in 0..n {
        if labels[start] != usize::MAX {
            continue;
        }
        let mut node = start;
        while labels[node] == usize::MAX {
            labels[node] = count;
            node = successors[node];
        }
        count += 1;
    }
    (labels, count)
}

/// Splices all cycles of `successors` into one Hamiltonian cycle and
/// returns it as an open order starting at node 0.
///
/// `successors` must be a permutation of `0..n`.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::constructive::patch_cycles;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 5.0, 5.0],
///     vec![1.0, 0.0, 2.0, 5.0],
///     vec![5.0, 2.0, 0.0, 1.0],
///     vec![5.0, 5.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// // Two 2-cycles: 0 <-> 1 and 2 <-> 3.
/// let order = patch_cycles(&[1, 0, 3, 2], &dm);
/// assert_eq!(order.len(), 4);
/// assert_eq!(order[0], 0);
/// ```
pub fn patch_cycles(successors: &[usize], distances: &DistanceMatrix) -> Vec<usize> {
    let n = successors.len();
    if n == 0 {
        return Vec::new();
    }
    let mut succ = successors.to_vec();
    let (mut labels, mut count) = cycle_labels(&succ);

    while count > 1 {
        let base = labels[0];
        let mut best: Option<(usize, usize, f64)> = None;
        for a in (0..n).filter(|&a| labels[a] == base) {
            for b in (0..n).filter(|&b| labels[b] != base) {
                let delta = distances.get(a, succ[b]) + distances.get(b, succ[a])
                    - distances.get(a, succ[a])
                    - distances.get(b, succ[b]);
                if best.map_or(true, |(_, _, d)| delta < d) {
                    best = Some((a, b, delta));
                }
            }
        }
        let Some((a, b, _)) = best else {
            break;
        };
        let merged = labels[b];
        succ.swap(a, b);
        for label in labels.iter_mut() {
            if *label == merged {
                *label = base;
            }
        }
        count -= 1;
    }

    let mut order = Vec::with_capacity(n);
    let mut node = 0;
    for _ in 0..n {
        order.push(node);
        node = succ[node];
    }
    order
}
