//! Scripted adapter for tests and dry runs
//!
//! Returns a fixed verdict, optionally after a delay, or fails on demand.
//! It does not enforce the deadline itself, so it also exercises the
//! coordinator's own cut-off.

use std::time::Duration;

use async_trait::async_trait;

use super::adapter::{ModelAdapter, ModelVerdict};
use super::metrics::ModelMetrics;
use crate::logic::error::ModelError;
use crate::logic::features::FeatureVector;

#[derive(Debug, Clone, PartialEq)]
pub enum StubBehavior {
    Respond { score: f64, confidence: f64 },
    Delayed { delay: Duration, score: f64, confidence: f64 },
    Fail(String),
    /// Never completes
    Hang,
}

#[derive(Debug, Clone)]
pub struct StubAdapter {
    model_id: String,
    behavior: StubBehavior,
    feature_names: Vec<String>,
    metrics: ModelMetrics,
}

impl StubAdapter {
    pub fn new(model_id: &str, behavior: StubBehavior, feature_names: &[&str]) -> Self {
        Self {
            model_id: model_id.to_string(),
            behavior,
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            metrics: ModelMetrics::default(),
        }
    }

    pub fn responding(model_id: &str, score: f64, confidence: f64, feature_names: &[&str]) -> Self {
        Self::new(model_id, StubBehavior::Respond { score, confidence }, feature_names)
    }

    pub fn with_metrics(mut self, metrics: ModelMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

#[async_trait]
impl ModelAdapter for StubAdapter {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn predict(&self, _features: &FeatureVector, _deadline: Duration) -> Result<ModelVerdict, ModelError> {
        match &self.behavior {
            StubBehavior::Respond { score, confidence } => {
                ModelVerdict::clamped(&self.model_id, *score, *confidence, self.feature_names.clone())
            }
            StubBehavior::Delayed { delay, score, confidence } => {
                tokio::time::sleep(*delay).await;
                ModelVerdict::clamped(&self.model_id, *score, *confidence, self.feature_names.clone())
            }
            StubBehavior::Fail(message) => Err(ModelError::Backend {
                model_id: self.model_id.clone(),
                message: message.clone(),
            }),
            StubBehavior::Hang => std::future::pending().await,
        }
    }

    fn feature_names(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn self_reported_performance(&self) -> ModelMetrics {
        self.metrics.clone()
    }
}
