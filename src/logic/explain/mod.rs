//! Explain Module - why a verdict came out the way it did

pub mod aggregator;
pub mod engine;
pub mod types;

pub use aggregator::FeatureImportanceAggregator;
pub use engine::ExplanationGenerator;
pub use types::{FeatureContribution, FeatureImportance};
