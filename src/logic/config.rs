//! Engine Configuration
//!
//! defaults → JSON file (`ENSEMBLE_CONFIG`) → environment overrides.
//! Everything is validated before a coordinator is built from it.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{self, DEFAULT_DEADLINE_MS, DEFAULT_QUORUM, DEFAULT_WEIGHTS};
use crate::logic::ensemble::EnsembleCoordinator;
use crate::logic::error::{EnsembleError, EnsembleResult};
use crate::logic::features::{FeatureScaler, ScalerConfig};
use crate::logic::model::{self, ModelAdapter, RemoteModelAdapter, RemoteModelConfig};
use crate::logic::threat::ThreatThresholds;
use crate::logic::weights::{validate_weight, ModelWeight, WeightRegistry};

fn default_quorum() -> usize {
    DEFAULT_QUORUM
}

fn default_deadline_ms() -> u64 {
    DEFAULT_DEADLINE_MS
}

fn default_weights() -> Vec<ModelWeight> {
    DEFAULT_WEIGHTS
        .iter()
        .map(|(id, w)| ModelWeight::new(id, *w))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scaler: ScalerConfig,
    #[serde(default = "default_quorum")]
    pub quorum: usize,
    #[serde(default = "default_deadline_ms")]
    pub default_deadline_ms: u64,
    /// In-process members and their initial weights, in voting order
    #[serde(default = "default_weights")]
    pub weights: Vec<ModelWeight>,
    #[serde(default)]
    pub thresholds: ThreatThresholds,
    #[serde(default)]
    pub remote_models: Vec<RemoteModelConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scaler: ScalerConfig::default(),
            quorum: DEFAULT_QUORUM,
            default_deadline_ms: DEFAULT_DEADLINE_MS,
            weights: default_weights(),
            thresholds: ThreatThresholds::default(),
            remote_models: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> EnsembleResult<Self> {
        serde_json::from_str(raw).map_err(|e| EnsembleError::Config(format!("invalid config: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> EnsembleResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EnsembleError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// Apply overrides on top of whatever was loaded
    pub fn with_overrides(mut self, quorum: Option<usize>, deadline_ms: Option<u64>) -> Self {
        if let Some(q) = quorum {
            self.quorum = q;
        }
        if let Some(d) = deadline_ms {
            self.default_deadline_ms = d;
        }
        self
    }

    /// Load from the environment: optional file, then overrides, then validate
    pub fn load() -> EnsembleResult<Self> {
        let config = match constants::get_config_path() {
            Some(path) => {
                log::info!("Loading ensemble config from {}", path);
                Self::from_file(&path)?
            }
            None => {
                log::info!("ENSEMBLE_CONFIG not set, using defaults");
                Self::default()
            }
        };

        let config = config.with_overrides(
            constants::get_quorum_override(),
            constants::get_deadline_override(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Members in voting order: in-process first, then remote
    pub fn member_count(&self) -> usize {
        self.weights.len() + self.remote_models.len()
    }

    pub fn validate(&self) -> EnsembleResult<()> {
        self.scaler.validate()?;
        self.thresholds.validate()?;

        if self.default_deadline_ms == 0 {
            return Err(EnsembleError::Config("default_deadline_ms must be positive".to_string()));
        }

        let mut seen = HashSet::new();
        let members = self
            .weights
            .iter()
            .map(|w| (w.model_id.as_str(), w.weight))
            .chain(self.remote_models.iter().map(|r| (r.model_id.as_str(), r.weight)));
        for (model_id, weight) in members {
            validate_weight(model_id, weight)?;
            if !seen.insert(model_id) {
                return Err(EnsembleError::Config(format!("duplicate model: {}", model_id)));
            }
        }

        if self.member_count() == 0 {
            return Err(EnsembleError::Config("no models configured".to_string()));
        }
        if self.quorum == 0 || self.quorum > self.member_count() {
            return Err(EnsembleError::Config(format!(
                "quorum {} outside 1..={}",
                self.quorum,
                self.member_count()
            )));
        }
        Ok(())
    }

    /// Build the coordinator: reference adapters named in `weights`, then
    /// remote models
    pub fn build_coordinator(&self) -> EnsembleResult<EnsembleCoordinator> {
        self.validate()?;

        let mut stock: Vec<Arc<dyn ModelAdapter>> = model::reference_adapters();
        let registry = Arc::new(WeightRegistry::with_weights(&self.weights)?);

        let mut builder = EnsembleCoordinator::builder()
            .scaler(FeatureScaler::new(&self.scaler)?)
            .registry(registry)
            .thresholds(self.thresholds.clone())
            .quorum(self.quorum)
            .deadline(Duration::from_millis(self.default_deadline_ms));

        for entry in &self.weights {
            let position = stock
                .iter()
                .position(|a| a.model_id() == entry.model_id)
                .ok_or_else(|| EnsembleError::UnknownModel(entry.model_id.clone()))?;
            builder = builder.registered_adapter(stock.swap_remove(position));
        }

        for remote in &self.remote_models {
            log::info!("Remote model {} at {}", remote.model_id, remote.endpoint);
            let adapter = RemoteModelAdapter::new(remote.clone())?;
            builder = builder.adapter(Arc::new(adapter), remote.weight);
        }

        builder.build()
    }
}

// ============================================================================
// TESTS
// ============================================================================
