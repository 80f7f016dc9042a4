//! Model Adapter - one classifier behind a uniform async interface
//!
//! The coordinator only sees this trait. Variants own whatever state they
//! need (weights, trees, an HTTP client) and never share it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::metrics::ModelMetrics;
use crate::logic::error::ModelError;
use crate::logic::features::{FeatureLayout, FeatureVector};

// ============================================================================
// VERDICT
// ============================================================================

/// Output of one successful adapter call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub model_id: String,
    /// 0.0 - 1.0
    pub score: f64,
    /// 0.0 - 1.0
    pub confidence: f64,
    /// Feature names this model attends to
    pub features: Vec<String>,
}

impl ModelVerdict {
    /// Build a verdict, clamping score and confidence into [0, 1].
    /// NaN cannot be clamped meaningfully and is rejected.
    pub fn clamped(
        model_id: &str,
        score: f64,
        confidence: f64,
        features: Vec<String>,
    ) -> Result<Self, ModelError> {
        if score.is_nan() || confidence.is_nan() {
            return Err(ModelError::InvalidOutput {
                model_id: model_id.to_string(),
                message: format!("score={} confidence={}", score, confidence),
            });
        }

        Ok(Self {
            model_id: model_id.to_string(),
            score: score.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            features,
        })
    }
}

// ============================================================================
// ADAPTER TRAIT
// ============================================================================

#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Stable identifier, also the key in the weight registry
    fn model_id(&self) -> &str;

    /// Score one feature vector. Must finish within `deadline` or fail with
    /// `ModelError::Timeout`.
    async fn predict(&self, features: &FeatureVector, deadline: Duration) -> Result<ModelVerdict, ModelError>;

    /// Static list of attended feature names (no model call)
    fn feature_names(&self) -> Vec<String>;

    /// Observability only
    fn self_reported_performance(&self) -> ModelMetrics;

    /// Layout the model was tuned on, if it reads a fixed one
    fn expected_layout(&self) -> Option<&FeatureLayout> {
        None
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Margin-based confidence: 0.5 at the decision boundary, 1.0 at the extremes
pub fn margin_confidence(score: f64) -> f64 {
    0.5 + (score - 0.5).abs()
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Reject a vector produced under a layout the model was not tuned on
pub fn check_layout(
    model_id: &str,
    expected: Option<&FeatureLayout>,
    features: &FeatureVector,
) -> Result<(), ModelError> {
    match expected {
        Some(layout) if !features.is_compatible(layout) => Err(ModelError::InvalidOutput {
            model_id: model_id.to_string(),
            message: format!(
                "feature layout v{} {:08x} does not match v{} {:08x}",
                features.layout().version,
                features.layout().hash,
                layout.version,
                layout.hash
            ),
        }),
        _ => Ok(()),
    }
}

/// Run an in-process scorer and enforce the deadline on its wall time.
/// Returns the verdict and the elapsed time.
pub fn run_local<F>(
    model_id: &str,
    deadline: Duration,
    score: F,
) -> Result<(ModelVerdict, Duration), ModelError>
where
    F: FnOnce() -> Result<ModelVerdict, ModelError>,
{
    let started = Instant::now();
    let verdict = score()?;
    let elapsed = started.elapsed();

    if elapsed > deadline {
        return Err(ModelError::Timeout {
            model_id: model_id.to_string(),
            deadline_ms: deadline.as_millis() as u64,
        });
    }

    Ok((verdict, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_bounds() {
        let verdict = ModelVerdict::clamped("m", 1.7, -0.2, vec![]).unwrap();
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn test_clamped_rejects_nan() {
        let err = ModelVerdict::clamped("m", f64::NAN, 0.5, vec![]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidOutput { .. }));
    }

    #[test]
    fn test_margin_confidence() {
        assert_eq!(margin_confidence(0.5), 0.5);
        assert_eq!(margin_confidence(1.0), 1.0);
        assert_eq!(margin_confidence(0.0), 1.0);
    }

    #[test]
    fn test_run_local_zero_deadline_times_out() {
        let result = run_local("slow", Duration::ZERO, || {
            std::thread::sleep(Duration::from_millis(2));
            ModelVerdict::clamped("slow", 0.5, 0.5, vec![])
        });
        assert!(matches!(result, Err(ModelError::Timeout { .. })));
    }

    #[test]
    fn test_check_layout() {
        let reference = FeatureLayout::default();
        let matching = FeatureVector::new(std::sync::Arc::new(FeatureLayout::default()), vec![0.0; 4]).unwrap();
        let foreign = FeatureVector::from_named(&[("port", 1.0), ("flag_count", 2.0)]);

        assert!(check_layout("m", Some(&reference), &matching).is_ok());
        assert!(check_layout("m", None, &foreign).is_ok());
        assert!(matches!(
            check_layout("m", Some(&reference), &foreign),
            Err(ModelError::InvalidOutput { .. })
        ));
    }

    #[test]
    fn test_run_local_within_deadline() {
        let (verdict, _) = run_local("fast", Duration::from_secs(5), || {
            ModelVerdict::clamped("fast", 0.25, 0.75, vec!["a".to_string()])
        })
        .unwrap();
        assert_eq!(verdict.score, 0.25);
    }
}
