//! # u-tsp
//!
//! Traveling-salesman solving engine. Takes a square table of pairwise
//! travel costs and returns a closed visiting order, optionally under a
//! wall-clock budget, with a flag telling whether the tour is proven optimal.
//!
//! ## Modules
//!
//! - [`distance`] — Validated cost matrix and the [`ArcCost`](distance::ArcCost) trait
//! - [`models`] — Tour and solve result types
//! - [`evaluation`] — Tour well-formedness check and total cost
//! - [`budget`] — Cooperative deadlines
//! - [`constructive`] — Assignment relaxation, cycle patching, greedy construction
//! - [`local_search`] — 2-opt and Or-opt operators
//! - [`mip`] — Linear model, MIP solver trait, branch-and-bound
//! - [`routing`] — Routing model, routing solver trait, exact DP and VNS search
//! - [`strategy`] — The four solving strategies and the name registry
//! - [`engine`] — Strategy dispatch, budget resolution, result verification
//!
//! ## Example
//!
//! ```
//! use u_tsp::TspEngine;
//!
//! let rows = vec![
//!     vec![0.0, 10.0, 15.0, 20.0],
//!     vec![10.0, 0.0, 35.0, 25.0],
//!     vec![15.0, 35.0, 0.0, 30.0],
//!     vec![20.0, 25.0, 30.0, 0.0],
//! ];
//! let engine = TspEngine::new();
//! let result = engine.solve_rows(&rows, "IntegerProgramming", Some(10.0)).unwrap();
//! assert!(result.optimal);
//! assert!((result.total_cost - 80.0).abs() < 1e-9);
//! ```

pub mod budget;
pub mod constructive;
pub mod distance;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod mip;
pub mod models;
pub mod routing;
pub mod strategy;

pub use distance::DistanceMatrix;
pub use engine::{EngineConfig, TspEngine};
pub use error::{Error, Result};
pub use models::{SolveResult, Tour};
pub use strategy::{SolvingStrategy, StrategyOutcome, StrategyRegistry};
