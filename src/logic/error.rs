//! Error Taxonomy
//!
//! Per-model failures (`ModelError`) are absorbed by the coordinator and only
//! reduce the quorum. Everything in `EnsembleError` reaches the caller.

use thiserror::Error;

// ============================================================================
// SCALING
// ============================================================================

/// Malformed or incomplete observation. The scoring call aborts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalingError {
    #[error("required field missing: {0}")]
    MissingField(String),

    #[error("field {field} is not a usable number: {value}")]
    NonNumeric { field: String, value: String },

    #[error("unknown feature in scaler layout: {0}")]
    UnknownFeature(String),
}

// ============================================================================
// PER-MODEL
// ============================================================================

/// Failure of a single adapter call. Never surfaced on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model {model_id} timed out after {deadline_ms}ms")]
    Timeout { model_id: String, deadline_ms: u64 },

    #[error("model {model_id} backend error: {message}")]
    Backend { model_id: String, message: String },

    #[error("model {model_id} returned invalid output: {message}")]
    InvalidOutput { model_id: String, message: String },
}

impl ModelError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ModelError::Timeout { .. })
    }
}

// ============================================================================
// CALL LEVEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnsembleError {
    #[error("scaling failed: {0}")]
    Scaling(#[from] ScalingError),

    #[error("insufficient models: {succeeded} succeeded, {failed} failed, quorum is {required}")]
    InsufficientModels {
        required: usize,
        succeeded: usize,
        failed: usize,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("model already registered: {0}")]
    AlreadyRegistered(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type EnsembleResult<T> = Result<T, EnsembleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_error_converts() {
        let err: EnsembleError = ScalingError::MissingField("traffic_volume".into()).into();
        assert!(matches!(err, EnsembleError::Scaling(ScalingError::MissingField(_))));
        assert_eq!(err.to_string(), "scaling failed: required field missing: traffic_volume");
    }

    #[test]
    fn test_model_error_timeout_flag() {
        let err = ModelError::Timeout { model_id: "xgboost".into(), deadline_ms: 50 };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "model xgboost timed out after 50ms");

        let err = ModelError::Backend { model_id: "remote".into(), message: "503".into() };
        assert!(!err.is_timeout());
    }
}
