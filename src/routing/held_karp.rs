//! Held–Karp dynamic programming for exact small instances.
//!
//! # Algorithm
//!
//! `best[S][k]` is the cheapest path leaving the depot, visiting exactly the
//! non-depot nodes in `S`, and ending at `k ∈ S`:
//!
//! ```text
//! best[S ∪ {j}][j] = min over k ∈ S of best[S][k] + d(k, j)
//! ```
//!
//! The optimal tour closes the cheapest full path back to the depot. Subsets
//! are processed in increasing bitmask order, so every predecessor state is
//! final when it is read. The deadline is sampled once per subset.
//!
//! # Complexity
//!
//! O(2^n · n²) time, O(2^n · n) memory.
//!
//! # Reference
//!
//! Held, M. & Karp, R.M. (1962). "A dynamic programming approach to
//! sequencing problems", *Journal of the SIAM* 10(1), 196-210.

use super::RoutingModel;
use crate::budget::Deadline;
use crate::distance::ArcCost;

/// Returns the optimal open order starting at the depot, or `None` if the
/// deadline expired first.
pub(crate) fn held_karp(model: &RoutingModel<'_>, deadline: &Deadline) -> Option<Vec<usize>> {
    let depot = model.depot();
    let others: Vec<usize> = (0..model.node_count()).filter(|&v| v != depot).collect();
    let m = others.len();
    if m == 0 {
        return Some(vec![depot]);
    }
    let full = 1usize << m;
    let mut best = vec![f64::INFINITY; full * m];
    let mut parent = vec![usize::MAX; full * m];

    for (k, &node) in others.iter().enumerate() {
        best[(1 << k) * m + k] = model.arc_cost(depot, node);
    }

    for mask in 1..full {
        if deadline.expired() {
            return None;
        }
        for k in 0..m {
            if mask & (1 << k) == 0 {
                continue;
            }
            let current = best[mask * m + k];
            if !current.is_finite() {
                continue;
            }
            for next in 0..m {
                if mask & (1 << next) != 0 {
                    continue;
                }
                let extended = mask | (1 << next);
                let candidate = current + model.arc_cost(others[k], others[next]);
                if candidate < best[extended * m + next] {
                    best[extended * m + next] = candidate;
                    parent[extended * m + next] = k;
                }
            }
        }
    }

    let last = full - 1;
    let (mut k, _) = (0..m)
        .map(|k| (k, best[last * m + k] + model.arc_cost(others[k], depot)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let mut mask = last;
    let mut reversed = Vec::with_capacity(m);
    loop {
        reversed.push(others[k]);
        let p = parent[mask * m + k];
        mask &= !(1 << k);
        if p == usize::MAX {
            break;
        }
        k = p;
    }
    let mut order = Vec::with_capacity(m + 1);
    order.push(depot);
    order.extend(reversed.into_iter().rev());
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use std::time::Duration;

    #[test]
    fn test_held_karp_sample() {
        let dm = DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid");
        let model = RoutingModel::new(4, 0, |i, j| dm.get(i, j));
        let order = held_karp(&model, &Deadline::unbounded()).expect("completes");
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], 0);
        let mut closed = order.clone();
        closed.push(0);
        assert!((dm.path_cost(&closed) - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_held_karp_asymmetric_direction() {
        // Cheap arcs only along 0 -> 2 -> 1 -> 3 -> 0.
        let model = RoutingModel::new(4, 0, |i, j| match (i, j) {
            (0, 2) | (2, 1) | (1, 3) | (3, 0) => 1.0,
            _ => 10.0,
        });
        let order = held_karp(&model, &Deadline::unbounded()).expect("completes");
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_held_karp_non_zero_depot() {
        let model = RoutingModel::new(3, 2, |i, j| (i as f64 - j as f64).abs());
        let order = held_karp(&model, &Deadline::unbounded()).expect("completes");
        assert_eq!(order[0], 2);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_held_karp_deadline() {
        let model = RoutingModel::new(10, 0, |i, j| (i * 7 + j * 3) as f64);
        let deadline = Deadline::start(Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        assert!(held_karp(&model, &deadline).is_none());
    }
}
