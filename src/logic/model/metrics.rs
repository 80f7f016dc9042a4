//! Self-reported model performance
//!
//! Observability only. Nothing in the voting path reads these numbers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Performance record an adapter reports about its underlying model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    /// Percent
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1_score: f32,
    /// Milliseconds
    pub latency: f32,
    /// Predictions per second
    pub throughput: f32,
    pub confidence_score: f32,
    pub drift_score: f32,
    pub prediction_count: u64,
    pub error_rate: f32,
    pub refreshed_at: DateTime<Utc>,
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self {
            accuracy: 0.0,
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
            latency: 0.0,
            throughput: 0.0,
            confidence_score: 0.0,
            drift_score: 0.0,
            prediction_count: 0,
            error_rate: 0.0,
            refreshed_at: DateTime::<Utc>::default(),
        }
    }
}

// ============================================================================
// LIVE COUNTERS
// ============================================================================

/// Static base record plus live prediction/latency counters.
/// `snapshot` folds the counters into a fresh record.
#[derive(Debug)]
pub struct MetricsBook {
    base: ModelMetrics,
    predictions: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl MetricsBook {
    pub fn new(base: ModelMetrics) -> Self {
        Self {
            base,
            predictions: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    pub fn record(&self, latency: Duration) {
        self.latency_sum_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ModelMetrics {
        let count = self.predictions.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);

        let mut metrics = self.base.clone();
        metrics.prediction_count = self.base.prediction_count + count;
        if count > 0 {
            metrics.latency = (sum as f32 / count as f32) / 1000.0;
        }
        metrics.refreshed_at = Utc::now();
        metrics
    }
}
