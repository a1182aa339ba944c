//! Domain model types for tour solving.
//!
//! Provides the closed [`Tour`] sequence and the caller-facing
//! [`SolveResult`].

mod result;
mod tour;

pub use result::SolveResult;
pub use tour::Tour;
