//! Crate error type.

use thiserror::Error as ThisError;

/// Errors raised while building inputs or solving a tour.
///
/// A time-limited search that still produced a tour is not an error; it is
/// reported through [`SolveResult::optimal`](crate::models::SolveResult).
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// The cost table is not a valid distance matrix.
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),
    /// No strategy is registered under the requested name.
    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },
    /// A tour is not a closed permutation of the matrix nodes.
    #[error("malformed tour: {0}")]
    MalformedTour(String),
    /// The strategy's solver found no feasible tour.
    #[error("no feasible tour found by {strategy}")]
    Infeasible { strategy: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    pub fn malformed_tour(message: impl Into<String>) -> Self {
        Self::MalformedTour(message.into())
    }

    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::UnknownStrategy { name: name.into() }
    }

    pub fn infeasible(strategy: impl Into<String>) -> Self {
        Self::Infeasible {
            strategy: strategy.into(),
        }
    }
}
