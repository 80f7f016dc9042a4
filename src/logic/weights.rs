//! Weight Registry - voting weight per model
//!
//! The only shared mutable state of the engine. Single writer, many
//! readers; readers always get an owned copy stamped with a version, never
//! a live reference. Weights are not required to sum to 1.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::error::{EnsembleError, EnsembleResult};

/// Voting weight of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelWeight {
    pub model_id: String,
    pub weight: f64,
}

impl ModelWeight {
    pub fn new(model_id: &str, weight: f64) -> Self {
        Self {
            model_id: model_id.to_string(),
            weight,
        }
    }
}

/// Consistent copy of the registry at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSnapshot {
    /// Bumped on every successful write
    pub version: u64,
    pub weights: HashMap<String, f64>,
}

impl WeightSnapshot {
    pub fn get(&self, model_id: &str) -> Option<f64> {
        self.weights.get(model_id).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[derive(Debug, Default)]
struct Inner {
    version: u64,
    weights: HashMap<String, f64>,
}

#[derive(Debug, Default)]
pub struct WeightRegistry {
    inner: RwLock<Inner>,
}

/// Weight must be a number in [0, 1]
pub fn validate_weight(model_id: &str, weight: f64) -> EnsembleResult<()> {
    if weight.is_nan() || !(0.0..=1.0).contains(&weight) {
        return Err(EnsembleError::Validation(format!(
            "weight for {} must be between 0 and 1, got {}",
            model_id, weight
        )));
    }
    Ok(())
}

impl WeightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from initial weights; every entry is validated
    pub fn with_weights(initial: &[ModelWeight]) -> EnsembleResult<Self> {
        let registry = Self::new();
        for entry in initial {
            registry.register_model(&entry.model_id, entry.weight)?;
        }
        Ok(registry)
    }

    pub fn snapshot(&self) -> WeightSnapshot {
        let inner = self.inner.read();
        WeightSnapshot {
            version: inner.version,
            weights: inner.weights.clone(),
        }
    }

    pub fn get(&self, model_id: &str) -> Option<f64> {
        self.inner.read().weights.get(model_id).copied()
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.inner.read().weights.contains_key(model_id)
    }

    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    /// Update an existing model's weight. Returns the previous weight.
    pub fn set_weight(&self, model_id: &str, weight: f64) -> EnsembleResult<f64> {
        validate_weight(model_id, weight)?;

        let mut inner = self.inner.write();
        let slot = inner
            .weights
            .get_mut(model_id)
            .ok_or_else(|| EnsembleError::UnknownModel(model_id.to_string()))?;
        let previous = std::mem::replace(slot, weight);
        inner.version += 1;

        Ok(previous)
    }

    /// Add a model that is not yet known
    pub fn register_model(&self, model_id: &str, weight: f64) -> EnsembleResult<()> {
        validate_weight(model_id, weight)?;

        let mut inner = self.inner.write();
        if inner.weights.contains_key(model_id) {
            return Err(EnsembleError::AlreadyRegistered(model_id.to_string()));
        }
        inner.weights.insert(model_id.to_string(), weight);
        inner.version += 1;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
