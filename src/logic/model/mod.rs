//! Model Module - classifier adapters
//!
//! Every classifier sits behind `ModelAdapter`. The reference ensemble is
//! four in-process variants; `remote` reaches a model-serving backend over
//! HTTP and `stub` is a scripted double.

pub mod adapter;
pub mod boosted;
pub mod forest;
pub mod isolation;
pub mod metrics;
pub mod neural;
pub mod remote;
pub mod stub;
pub mod tree;

use std::sync::Arc;

// Re-export common types
pub use adapter::{ModelAdapter, ModelVerdict};
pub use boosted::GradientBoostedAdapter;
pub use forest::RandomForestAdapter;
pub use isolation::IsolationForestAdapter;
pub use metrics::{MetricsBook, ModelMetrics};
pub use neural::NeuralNetAdapter;
pub use remote::{RemoteModelAdapter, RemoteModelConfig};
pub use stub::{StubAdapter, StubBehavior};

/// The four stock variants, in voting order
pub fn reference_adapters() -> Vec<Arc<dyn ModelAdapter>> {
    vec![
        Arc::new(GradientBoostedAdapter::reference()),
        Arc::new(RandomForestAdapter::reference()),
        Arc::new(NeuralNetAdapter::reference()),
        Arc::new(IsolationForestAdapter::reference()),
    ]
}
