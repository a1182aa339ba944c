//! Greedy first-solution construction over an arc-cost function.
//!
//! - [`path_cheapest_arc`] — extend the path from the depot with the
//!   cheapest arc to an unvisited node, O(n²)
//! - [`cheapest_insertion`] — insert the node whose cheapest insertion into
//!   the current cycle is smallest, O(n³)

use crate::distance::ArcCost;

/// Builds an open order starting at `depot` by always following the
/// cheapest arc out of the last node to an unvisited node.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::constructive::path_cheapest_arc;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 9.0, 1.0],
///     vec![1.0, 0.0, 9.0],
///     vec![9.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(path_cheapest_arc(&dm, 0), vec![0, 2, 1]);
/// ```
pub fn path_cheapest_arc<C: ArcCost + ?Sized>(costs: &C, depot: usize) -> Vec<usize> {
    let n = costs.node_count();
    if n == 0 || depot >= n {
        return Vec::new();
    }
    let mut visited = vec![false; n];
    visited[depot] = true;
    let mut order = Vec::with_capacity(n);
    order.push(depot);
    let mut current = depot;

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for next in 0..n {
            if visited[next] {
                continue;
            }
            let d = costs.arc_cost(current, next);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((next, d));
            }
        }
        let Some((next, _)) = best else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }
    order
}

/// Builds an open order starting at `depot` by cheapest insertion.
///
/// Starts from the cycle `depot → k → depot` with the cheapest round trip,
/// then repeatedly inserts the unrouted node with the smallest insertion
/// cost at its best position.
pub fn cheapest_insertion<C: ArcCost + ?Sized>(costs: &C, depot: usize) -> Vec<usize> {
    let n = costs.node_count();
    if n == 0 || depot >= n {
        return Vec::new();
    }
    let mut order = vec![depot];
    let mut routed = vec![false; n];
    routed[depot] = true;

    for _ in 1..n {
        // (node, insert position in `order`, delta)
        let mut best: Option<(usize, usize, f64)> = None;
        for node in (0..n).filter(|&v| !routed[v]) {
            for pos in 0..order.len() {
                let prev = order[pos];
                let next = order[(pos + 1) % order.len()];
                let delta = if order.len() == 1 {
                    costs.arc_cost(prev, node) + costs.arc_cost(node, prev)
                } else {
                    costs.arc_cost(prev, node) + costs.arc_cost(node, next)
                        - costs.arc_cost(prev, next)
                };
                if best.map_or(true, |(_, _, bd)| delta < bd) {
                    best = Some((node, pos + 1, delta));
                }
            }
        }
        let Some((node, pos, _)) = best else {
            break;
        };
        order.insert(pos, node);
        routed[node] = true;
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid")
    }

    fn assert_permutation(order: &[usize], n: usize) {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_path_cheapest_arc() {
        let dm = sample();
        // 0 -> 1 (10), 1 -> 3 (25), 3 -> 2 (30)
        assert_eq!(path_cheapest_arc(&dm, 0), vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_path_cheapest_arc_other_depot() {
        let dm = sample();
        let order = path_cheapest_arc(&dm, 2);
        assert_eq!(order[0], 2);
        assert_permutation(&order, 4);
    }

    #[test]
    fn test_cheapest_insertion() {
        let dm = sample();
        let order = cheapest_insertion(&dm, 0);
        assert_eq!(order[0], 0);
        assert_permutation(&order, 4);
        let mut closed = order.clone();
        closed.push(0);
        let cost = dm.path_cost(&closed);
        assert!((cost - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_depot() {
        let dm = sample();
        assert!(path_cheapest_arc(&dm, 9).is_empty());
        assert!(cheapest_insertion(&dm, 9).is_empty());
    }
}
