//! Tour validation and cost evaluation.

mod evaluator;

pub use evaluator::TourEvaluator;
