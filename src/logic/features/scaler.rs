//! Feature Scaler - z-score normalization of raw observations
//!
//! Configuration is validated once at construction (zero-variance features
//! are rejected there). `scale` is then a pure function of
//! (configuration, observation).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::layout::{FeatureLayout, RawFeature};
use super::observation::NetworkObservation;
use super::vector::FeatureVector;
use crate::logic::error::{EnsembleError, EnsembleResult, ScalingError};

const SECONDS_PER_DAY: f64 = 86_400.0;

// ============================================================================
// CONFIG
// ============================================================================

/// Normalization parameters for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

impl FeatureSpec {
    pub fn new(name: impl Into<String>, mean: f64, std: f64) -> Self {
        Self {
            name: name.into(),
            mean,
            std,
        }
    }
}

/// Ordered feature specs; order defines the vector layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerConfig {
    pub features: Vec<FeatureSpec>,
}

impl Default for ScalerConfig {
    /// Typical network data ranges
    fn default() -> Self {
        Self {
            features: vec![
                FeatureSpec::new("traffic_volume", 1000.0, 500.0),
                FeatureSpec::new("packet_size", 500.0, 200.0),
                FeatureSpec::new("port", 80.0, 40.0),
                FeatureSpec::new("time_of_day", 0.5, 0.2),
            ],
        }
    }
}

impl ScalerConfig {
    pub fn validate(&self) -> EnsembleResult<()> {
        if self.features.is_empty() {
            return Err(EnsembleError::Config("scaler has no features".to_string()));
        }

        let mut seen = HashSet::new();
        for spec in &self.features {
            if RawFeature::from_name(&spec.name).is_none() {
                return Err(EnsembleError::Config(format!("unknown feature: {}", spec.name)));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(EnsembleError::Config(format!("duplicate feature: {}", spec.name)));
            }
            if !spec.mean.is_finite() {
                return Err(EnsembleError::Config(format!("feature {} has non-finite mean", spec.name)));
            }
            if !spec.std.is_finite() || spec.std <= 0.0 {
                return Err(EnsembleError::Config(format!(
                    "feature {} has zero or invalid std: {}",
                    spec.name, spec.std
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SCALER
// ============================================================================

#[derive(Debug, Clone)]
pub struct FeatureScaler {
    layout: Arc<FeatureLayout>,
    columns: Vec<(RawFeature, f64, f64)>,
}

impl FeatureScaler {
    pub fn new(config: &ScalerConfig) -> EnsembleResult<Self> {
        config.validate()?;

        let mut columns = Vec::with_capacity(config.features.len());
        for spec in &config.features {
            let raw = RawFeature::from_name(&spec.name)
                .ok_or_else(|| EnsembleError::Config(format!("unknown feature: {}", spec.name)))?;
            columns.push((raw, spec.mean, spec.std));
        }

        let layout = FeatureLayout::new(config.features.iter().map(|s| s.name.clone()).collect());

        Ok(Self {
            layout: Arc::new(layout),
            columns,
        })
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Dimensionality L of every vector this scaler produces
    pub fn dimension(&self) -> usize {
        self.columns.len()
    }

    pub fn scale(&self, observation: &NetworkObservation) -> Result<FeatureVector, ScalingError> {
        let mut values = Vec::with_capacity(self.columns.len());
        for &(feature, mean, std) in &self.columns {
            let raw = extract(feature, observation)?;
            values.push((raw - mean) / std);
        }

        FeatureVector::new(self.layout.clone(), values)
            .map_err(|e| ScalingError::UnknownFeature(e.to_string()))
    }
}

// ============================================================================
// RAW EXTRACTION
// ============================================================================

fn extract(feature: RawFeature, obs: &NetworkObservation) -> Result<f64, ScalingError> {
    match feature {
        RawFeature::TrafficVolume => finite("traffic_volume", obs.traffic_volume),
        RawFeature::PacketSize => finite("packet_size", obs.packet_size),
        RawFeature::Port => {
            let port = obs.port.ok_or_else(|| ScalingError::MissingField("port".to_string()))?;
            if !(0..=65_535).contains(&port) {
                return Err(ScalingError::NonNumeric {
                    field: "port".to_string(),
                    value: port.to_string(),
                });
            }
            Ok(port as f64)
        }
        RawFeature::TimeOfDay => {
            let ts = obs
                .timestamp
                .ok_or_else(|| ScalingError::MissingField("timestamp".to_string()))?;
            let at = DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| ScalingError::NonNumeric {
                field: "timestamp".to_string(),
                value: ts.to_string(),
            })?;
            Ok(at.num_seconds_from_midnight() as f64 / SECONDS_PER_DAY)
        }
        RawFeature::FlagCount => obs
            .flags
            .as_ref()
            .map(|flags| flags.len() as f64)
            .ok_or_else(|| ScalingError::MissingField("flags".to_string())),
    }
}

fn finite(field: &str, value: Option<f64>) -> Result<f64, ScalingError> {
    let value = value.ok_or_else(|| ScalingError::MissingField(field.to_string()))?;
    if !value.is_finite() {
        return Err(ScalingError::NonNumeric {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

// ============================================================================
// TESTS
// ============================================================================
