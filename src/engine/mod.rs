//! Solving engine: resolves a strategy by name, applies the time budget,
//! and verifies the returned tour.

mod config;
mod solver;

pub use config::EngineConfig;
pub use solver::{resolve_budget, CostMatrixProvider, PlacesRoute, TspEngine};
