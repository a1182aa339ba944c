//! Local search operators for improving closed tours.
//!
//! - [`two_opt`] — 2-opt segment reversal with exact asymmetric deltas
//! - [`or_opt`] — Or-opt segment relocation
//!
//! Both operate in place on closed tours (`[start, ..., start]`), never move
//! the start node, and sample a [`Deadline`](crate::budget::Deadline) inside
//! their inner loops.

mod or_opt;
mod two_opt;

pub use or_opt::{or_opt_improve, or_opt_move};
pub use two_opt::{reversal_delta, two_opt_improve, two_opt_pass, PassOutcome, TwoOptReport};
