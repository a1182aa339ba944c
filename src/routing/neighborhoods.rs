//! Bridges closed tours to the [`u_metaheur::vns`] framework.
//!
//! Three shaking neighborhoods of increasing strength:
//!
//! | k | Shake |
//! |---|-------|
//! | 0 | swap two random interior nodes |
//! | 1 | reverse a random interior segment |
//! | 2 | move a random interior segment to a random position |
//!
//! Local search alternates one 2-opt round with an Or-opt descent until
//! neither improves. The runner has no clock of its own, so every operator
//! returns its input unchanged once the deadline has expired and the
//! remaining iterations cost almost nothing.

use rand::Rng;
use u_metaheur::vns::VnsProblem;

use super::RoutingModel;
use crate::budget::Deadline;
use crate::distance::ArcCost;
use crate::local_search::{or_opt_improve, two_opt_pass, PassOutcome};

/// VNS problem over closed tours `[depot, ..., depot]`.
pub(crate) struct TourNeighborhoods<'m, 'a> {
    model: &'m RoutingModel<'a>,
    deadline: Deadline,
    symmetric: bool,
    initial: Vec<usize>,
}

impl<'m, 'a> TourNeighborhoods<'m, 'a> {
    pub(crate) fn new(
        model: &'m RoutingModel<'a>,
        deadline: Deadline,
        initial: Vec<usize>,
    ) -> Self {
        Self {
            model,
            deadline,
            symmetric: model.is_symmetric(1e-9),
            initial,
        }
    }
}

impl VnsProblem for TourNeighborhoods<'_, '_> {
    type Solution = Vec<usize>;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<usize> {
        self.initial.clone()
    }

    fn cost(&self, solution: &Vec<usize>) -> f64 {
        self.model.path_cost(solution)
    }

    fn neighborhood_count(&self) -> usize {
        3
    }

    fn shake<R: Rng>(&self, solution: &Vec<usize>, k: usize, rng: &mut R) -> Vec<usize> {
        let mut tour = solution.clone();
        let len = tour.len();
        // Fewer than three interior nodes leaves nothing worth perturbing.
        if len < 5 || self.deadline.expired() {
            return tour;
        }
        match k {
            0 => {
                let i = rng.random_range(1..len - 1);
                let mut j = rng.random_range(1..len - 1);
                while j == i {
                    j = rng.random_range(1..len - 1);
                }
                tour.swap(i, j);
            }
            1 => {
                let a = rng.random_range(1..len - 2);
                let b = rng.random_range(a + 1..len - 1);
                tour[a..=b].reverse();
            }
            _ => {
                let a = rng.random_range(1..len - 1);
                let b = rng.random_range(a..len - 1);
                let segment: Vec<usize> = tour.drain(a..=b).collect();
                let at = rng.random_range(1..tour.len());
                tour.splice(at..at, segment);
            }
        }
        tour
    }

    fn local_search(&self, solution: &Vec<usize>) -> Vec<usize> {
        let mut tour = solution.clone();
        while !self.deadline.expired() {
            let reversed = two_opt_pass(&mut tour, self.model, self.symmetric, &self.deadline);
            let moved = or_opt_improve(&mut tour, self.model, &self.deadline);
            if reversed != PassOutcome::Improved && moved == 0 {
                break;
            }
        }
        tour
    }
}
