//! Assignment relaxation (Hungarian method).
//!
//! # Algorithm
//!
//! Solves the square linear assignment problem "row i departs to column j"
//! with row/column potentials and shortest augmenting paths. The diagonal
//! is treated as prohibitively expensive, so the result is a successor
//! function without self-loops: a set of disjoint directed cycles covering
//! every node. Its cost is a lower bound on the optimal tour cost.
//!
//! # Complexity
//!
//! O(n³).
//!
//! # Reference
//!
//! Kuhn, H.W. (1955). "The Hungarian method for the assignment problem",
//! *Naval Research Logistics Quarterly* 2, 83-97.

use crate::distance::DistanceMatrix;

/// Returns `successors[i] = j`, the minimum-cost assignment with `i != j`.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::constructive::assignment_successors;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 9.0],
///     vec![9.0, 0.0, 1.0],
///     vec![1.0, 9.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(assignment_successors(&dm), vec![1, 2, 0]);
/// ```
pub fn assignment_successors(distances: &DistanceMatrix) -> Vec<usize> {
    let n = distances.size();
    // Any assignment using a diagonal cell costs more than every derangement.
    let forbidden = (distances.max_arc_cost() + 1.0) * n as f64;
    let cost = |i: usize, j: usize| {
        if i == j {
            forbidden
        } else {
            distances.get(i, j)
        }
    };

    // 1-based potentials; column 0 is the virtual start of each augmentation.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut col0 = 0;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[col0] = true;
            let row0 = owner[col0];
            let mut delta = f64::INFINITY;
            let mut col1 = 0;
            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let reduced = cost(row0 - 1, col - 1) - u[row0] - v[col];
                if reduced < min_slack[col] {
                    min_slack[col] = reduced;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }
            for col in 0..=n {
                if used[col] {
                    u[owner[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }
            col0 = col1;
            if owner[col0] == 0 {
                break;
            }
        }

        loop {
            let col1 = way[col0];
            owner[col0] = owner[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut successors = vec![0; n];
    for col in 1..=n {
        if owner[col] != 0 {
            successors[owner[col] - 1] = col - 1;
        }
    }
    successors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_assignment(dm: &DistanceMatrix) -> f64 {
        fn search(dm: &DistanceMatrix, row: usize, used: &mut Vec<bool>, acc: f64, best: &mut f64) {
            let n = dm.size();
            if row == n {
                *best = best.min(acc);
                return;
            }
            for col in 0..n {
                if col != row && !used[col] {
                    used[col] = true;
                    search(dm, row + 1, used, acc + dm.get(row, col), best);
                    used[col] = false;
                }
            }
        }
        let mut best = f64::INFINITY;
        search(dm, 0, &mut vec![false; dm.size()], 0.0, &mut best);
        best
    }

    #[test]
    fn test_no_self_assignment() {
        let dm = DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid");
        let succ = assignment_successors(&dm);
        for (i, &j) in succ.iter().enumerate() {
            assert_ne!(i, j);
        }
        let mut targets = succ.clone();
        targets.sort_unstable();
        assert_eq!(targets, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = u_numflow::random::create_rng(11);
        for n in 2..7 {
            let rows: Vec<Vec<f64>> = (0..n)
                .map(|_| (0..n).map(|_| rand::Rng::random_range(&mut rng, 0.0..50.0)).collect())
                .collect();
            let dm = DistanceMatrix::from_rows(&rows).expect("valid");
            let succ = assignment_successors(&dm);
            let cost: f64 = succ.iter().enumerate().map(|(i, &j)| dm.get(i, j)).sum();
            assert!((cost - brute_force_assignment(&dm)).abs() < 1e-6, "n={n}");
        }
    }

    #[test]
    fn test_two_nodes() {
        let dm = DistanceMatrix::from_rows(&[vec![0.0, 3.0], vec![4.0, 0.0]]).expect("valid");
        assert_eq!(assignment_successors(&dm), vec![1, 0]);
    }
}
