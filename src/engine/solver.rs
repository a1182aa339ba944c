//! Strategy dispatch, budget resolution and result verification.

use std::time::{Duration, Instant};

use super::EngineConfig;
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::evaluation::TourEvaluator;
use crate::models::SolveResult;
use crate::strategy::StrategyRegistry;

/// Relative tolerance between a strategy's own cost and the evaluator's.
const COST_TOL: f64 = 1e-6;

/// Supplies a cost matrix for named places (geocoding, road networks, ...).
///
/// Row and column `i` of the returned matrix must belong to `places[i]`.
pub trait CostMatrixProvider {
    /// Builds the matrix for `places`.
    fn cost_matrix(&self, places: &[String]) -> Result<DistanceMatrix>;
}

/// A solve over named places.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesRoute {
    /// The underlying solve.
    pub result: SolveResult,
    /// Place names in visiting order, first place repeated at the end.
    pub route: Vec<String>,
}

/// Turns a caller budget into a time limit.
///
/// | `budget_secs` | Limit |
/// |---------------|-------|
/// | positive, finite | that many seconds |
/// | `+∞` | none |
/// | absent, zero, negative, NaN | `default` |
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tsp::engine::resolve_budget;
///
/// let default = Some(Duration::from_secs(10));
/// assert_eq!(resolve_budget(Some(2.5), default), Some(Duration::from_millis(2500)));
/// assert_eq!(resolve_budget(Some(f64::INFINITY), default), None);
/// assert_eq!(resolve_budget(None, default), default);
/// assert_eq!(resolve_budget(Some(-1.0), None), None);
/// ```
pub fn resolve_budget(budget_secs: Option<f64>, default: Option<Duration>) -> Option<Duration> {
    match budget_secs {
        // Also covers +∞ and values too large for a Duration.
        Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs).ok(),
        _ => default,
    }
}

/// Solves TSP instances with a strategy chosen by name.
///
/// # Examples
///
/// ```
/// use u_tsp::engine::TspEngine;
///
/// let engine = TspEngine::new();
/// let result = engine
///     .solve_rows(
///         &[
///             vec![0.0, 10.0, 15.0, 20.0],
///             vec![10.0, 0.0, 35.0, 25.0],
///             vec![15.0, 35.0, 0.0, 30.0],
///             vec![20.0, 25.0, 30.0, 0.0],
///         ],
///         "Exhaustive",
///         None,
///     )
///     .unwrap();
/// assert!(result.optimal);
/// assert_eq!(result.total_cost, 80.0);
/// assert_eq!(result.tour.to_string(), "0 -> 1 -> 3 -> 2 -> 0");
/// ```
#[derive(Debug)]
pub struct TspEngine {
    registry: StrategyRegistry,
    config: EngineConfig,
}

impl TspEngine {
    /// An engine with the built-in strategies and default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An engine with the built-in strategies and `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_registry(StrategyRegistry::with_defaults(), config)
    }

    /// An engine over a caller-built registry.
    pub fn with_registry(registry: StrategyRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// The strategy registry.
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Mutable access for registering strategies.
    pub fn registry_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.registry
    }

    /// The configuration handed to strategy factories.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Solves `distances` with the strategy registered as `strategy_name`.
    ///
    /// See [`resolve_budget`] for how `budget_secs` becomes a time limit.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownStrategy`] if no strategy has that name; nothing runs.
    /// - [`Error::Infeasible`] if the strategy found no tour.
    /// - [`Error::MalformedTour`] if the strategy returned a broken tour.
    pub fn solve(
        &self,
        distances: &DistanceMatrix,
        strategy_name: &str,
        budget_secs: Option<f64>,
    ) -> Result<SolveResult> {
        let strategy = self.registry.create(strategy_name, &self.config)?;
        let name = strategy.name().to_string();
        let time_limit = resolve_budget(budget_secs, strategy.default_budget());
        log::info!(
            "engine.solve: strategy={name} n={} budget_ms={}",
            distances.size(),
            time_limit.map_or_else(|| "unbounded".to_string(), |t| t.as_millis().to_string())
        );
        let started = Instant::now();
        let outcome = strategy.solve(distances, time_limit)?;
        let elapsed = started.elapsed();
        let Some(tour) = outcome.tour else {
            log::warn!(
                "engine.solve: strategy={name} found no tour elapsed_ms={}",
                elapsed.as_millis()
            );
            return Err(Error::infeasible(name));
        };
        let total_cost = TourEvaluator::new(distances).cost(&tour)?;
        if let Some(reported) = outcome.reported_cost {
            let mismatch = (reported - total_cost).abs() > COST_TOL * total_cost.abs().max(1.0);
            if mismatch {
                log::error!(
                    "engine.verify: strategy={name} reported={reported} evaluated={total_cost}"
                );
            }
            debug_assert!(
                !mismatch,
                "{name} reported cost {reported}, evaluator computed {total_cost}"
            );
        }
        log::info!(
            "engine.solve: strategy={name} cost={total_cost:.4} optimal={} elapsed_ms={}",
            outcome.optimal,
            elapsed.as_millis()
        );
        Ok(SolveResult {
            tour,
            optimal: outcome.optimal,
            total_cost,
            strategy_name: name,
            elapsed,
        })
    }

    /// Validates a raw table, then solves it.
    ///
    /// An invalid table fails with [`Error::InvalidMatrix`] before any
    /// strategy is built.
    pub fn solve_rows(
        &self,
        rows: &[Vec<f64>],
        strategy_name: &str,
        budget_secs: Option<f64>,
    ) -> Result<SolveResult> {
        let distances = DistanceMatrix::from_rows(rows)?;
        self.solve(&distances, strategy_name, budget_secs)
    }

    /// Asks `provider` for the matrix of `places`, solves it and maps the
    /// tour back to place names.
    pub fn solve_places<P: CostMatrixProvider + ?Sized>(
        &self,
        provider: &P,
        places: &[String],
        strategy_name: &str,
        budget_secs: Option<f64>,
    ) -> Result<PlacesRoute> {
        let distances = provider.cost_matrix(places)?;
        if distances.size() != places.len() {
            return Err(Error::invalid_matrix(format!(
                "provider returned a {0}x{0} matrix for {1} places",
                distances.size(),
                places.len()
            )));
        }
        let result = self.solve(&distances, strategy_name, budget_secs)?;
        let route = result.ordered_labels(places)?.into_iter().cloned().collect();
        Ok(PlacesRoute { result, route })
    }
}

impl Default for TspEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tour;
    use crate::strategy::{SolvingStrategy, StrategyOutcome};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const ALL: [&str; 4] = ["LocalSearch", "Exhaustive", "IntegerProgramming", "ConstraintRouting"];

    fn sample_rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ]
    }

    /// Counts calls and returns a fixed outcome.
    struct Scripted {
        calls: Arc<AtomicUsize>,
        outcome: StrategyOutcome,
    }

    impl SolvingStrategy for Scripted {
        fn name(&self) -> &str {
            "Scripted"
        }

        fn solve(
            &self,
            _distances: &DistanceMatrix,
            _time_limit: Option<Duration>,
        ) -> Result<StrategyOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }
    }

    fn engine_with_scripted(outcome: StrategyOutcome) -> (TspEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut engine = TspEngine::new();
        let counter = Arc::clone(&calls);
        engine.registry_mut().register("Scripted", move |_: &EngineConfig| {
            Box::new(Scripted {
                calls: Arc::clone(&counter),
                outcome: outcome.clone(),
            })
        });
        (engine, calls)
    }

    struct Fixed(Vec<Vec<f64>>);

    impl CostMatrixProvider for Fixed {
        fn cost_matrix(&self, _places: &[String]) -> Result<DistanceMatrix> {
            DistanceMatrix::from_rows(&self.0)
        }
    }

    #[test]
    fn test_unknown_strategy_runs_nothing() {
        let (engine, calls) = engine_with_scripted(StrategyOutcome::infeasible());
        let err = engine.solve_rows(&sample_rows(), "DoesNotExist", None).expect_err("unknown");
        assert_eq!(err, Error::unknown_strategy("DoesNotExist"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_matrix_runs_nothing() {
        let (engine, calls) = engine_with_scripted(StrategyOutcome::infeasible());
        let ragged = vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 2.0]];
        let err = engine.solve_rows(&ragged, "Scripted", None).expect_err("not square");
        assert!(matches!(err, Error::InvalidMatrix(_)));

        let missing = DistanceMatrix::from_optional_rows(&[
            vec![Some(0.0), None],
            vec![Some(1.0), Some(0.0)],
        ]);
        assert!(matches!(missing, Err(Error::InvalidMatrix(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_absent_tour_is_infeasible() {
        let (engine, calls) = engine_with_scripted(StrategyOutcome::infeasible());
        let err = engine.solve_rows(&sample_rows(), "Scripted", None).expect_err("no tour");
        assert_eq!(err, Error::infeasible("Scripted"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "evaluator computed")]
    fn test_cost_mismatch_panics_in_debug() {
        let wrong = StrategyOutcome::found(Tour::from_order(&[0, 1, 3, 2]), true)
            .with_reported_cost(70.0);
        let (engine, _) = engine_with_scripted(wrong);
        let _ = engine.solve_rows(&sample_rows(), "Scripted", None);
    }

    #[test]
    fn test_matching_cost_passes_cross_check() {
        let right = StrategyOutcome::found(Tour::from_order(&[0, 1, 3, 2]), true)
            .with_reported_cost(80.0 + 1e-9);
        let (engine, _) = engine_with_scripted(right);
        let result = engine.solve_rows(&sample_rows(), "Scripted", None).expect("solves");
        assert!((result.total_cost - 80.0).abs() < 1e-9);
        assert!(result.optimal);
    }

    #[test]
    fn test_malformed_tour_is_rejected() {
        let broken = StrategyOutcome::found(Tour::new(vec![0, 1, 1, 2, 0]), false);
        let (engine, _) = engine_with_scripted(broken);
        let err = engine.solve_rows(&sample_rows(), "Scripted", None).expect_err("duplicate");
        assert!(matches!(err, Error::MalformedTour(_)));
    }

    #[test]
    fn test_exact_strategies_find_80() {
        let engine = TspEngine::new();
        for name in ["Exhaustive", "IntegerProgramming", "ConstraintRouting"] {
            let result = engine.solve_rows(&sample_rows(), name, Some(30.0)).expect("solves");
            assert!(result.optimal, "{name} should prove optimality");
            assert!((result.total_cost - 80.0).abs() < 1e-9, "{name}: {}", result.total_cost);
            let nodes = result.tour.nodes();
            assert!(nodes == [0, 1, 3, 2, 0] || nodes == [0, 2, 3, 1, 0], "{name}: {nodes:?}");
            assert_eq!(result.strategy_name, name);
        }
    }

    #[test]
    fn test_alias_reports_canonical_name() {
        let result = TspEngine::new()
            .solve_rows(&sample_rows(), "Permutations", None)
            .expect("solves");
        assert_eq!(result.strategy_name, "Exhaustive");
    }

    #[test]
    fn test_time_limited_exhaustive_degrades() {
        let rows: Vec<Vec<f64>> = (0..11)
            .map(|i| {
                (0..11)
                    .map(|j| if i == j { 0.0 } else { ((i * 5 + j * 3) % 11 + 1) as f64 })
                    .collect()
            })
            .collect();
        let result = TspEngine::new()
            .solve_rows(&rows, "Exhaustive", Some(0.005))
            .expect("best so far");
        assert!(!result.optimal);
        assert_eq!(result.tour.num_nodes(), 11);
    }

    #[test]
    fn test_solve_places() {
        let places: Vec<String> = ["Depot", "North", "East", "South"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let route = TspEngine::new()
            .solve_places(&Fixed(sample_rows()), &places, "Exhaustive", None)
            .expect("solves");
        assert_eq!(route.route, vec!["Depot", "North", "South", "East", "Depot"]);
        assert_eq!(route.result.total_cost, 80.0);

        let err = TspEngine::new()
            .solve_places(&Fixed(sample_rows()), &places[..3], "Exhaustive", None)
            .expect_err("size mismatch");
        assert!(matches!(err, Error::InvalidMatrix(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_every_strategy_returns_a_permutation(
            rows in (2usize..=5).prop_flat_map(|n| {
                proptest::collection::vec(proptest::collection::vec(1.0f64..100.0, n), n)
            })
        ) {
            let engine = TspEngine::new();
            let n = rows.len();
            for name in ALL {
                let result = engine.solve_rows(&rows, name, Some(20.0)).expect("solves");
                let nodes = result.tour.nodes();
                prop_assert_eq!(nodes.len(), n + 1);
                prop_assert_eq!(nodes[0], nodes[n]);
                let mut sorted = nodes[..n].to_vec();
                sorted.sort_unstable();
                prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
            }
        }
    }
}
