//! Network Observation - raw input produced by the capture layer
//!
//! Numeric fields are optional at the type level so that an incomplete
//! observation still deserializes; the scaler decides which fields are
//! required for the configured layout.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::logic::error::ScalingError;

/// One observation of network traffic, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkObservation {
    #[serde(default)]
    pub traffic_volume: Option<f64>,
    #[serde(default)]
    pub packet_size: Option<f64>,
    #[serde(default)]
    pub protocol: String,
    #[serde(default, rename = "sourceIP")]
    pub source_ip: String,
    #[serde(default, rename = "destinationIP")]
    pub destination_ip: String,
    #[serde(default)]
    pub port: Option<i64>,
    /// Absent is distinct from empty: only `flag_count` layouts require it
    #[serde(default)]
    pub flags: Option<BTreeSet<String>>,
    /// Epoch seconds
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl NetworkObservation {
    /// Parse one JSON document. Type mismatches are schema violations and are
    /// reported as `ScalingError::NonNumeric` against the whole document.
    pub fn from_json(raw: &str) -> Result<Self, ScalingError> {
        serde_json::from_str(raw).map_err(|e| ScalingError::NonNumeric {
            field: "<observation>".to_string(),
            value: e.to_string(),
        })
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating NetworkObservation with named setters
#[derive(Debug, Default)]
pub struct ObservationBuilder {
    observation: NetworkObservation,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traffic_volume(mut self, value: f64) -> Self {
        self.observation.traffic_volume = Some(value);
        self
    }

    pub fn packet_size(mut self, value: f64) -> Self {
        self.observation.packet_size = Some(value);
        self
    }

    pub fn protocol(mut self, value: impl Into<String>) -> Self {
        self.observation.protocol = value.into();
        self
    }

    pub fn source_ip(mut self, value: impl Into<String>) -> Self {
        self.observation.source_ip = value.into();
        self
    }

    pub fn destination_ip(mut self, value: impl Into<String>) -> Self {
        self.observation.destination_ip = value.into();
        self
    }

    pub fn port(mut self, value: i64) -> Self {
        self.observation.port = Some(value);
        self
    }

    pub fn flag(mut self, value: impl Into<String>) -> Self {
        self.observation
            .flags
            .get_or_insert_with(BTreeSet::new)
            .insert(value.into());
        self
    }

    pub fn timestamp(mut self, value: i64) -> Self {
        self.observation.timestamp = Some(value);
        self
    }

    pub fn build(self) -> NetworkObservation {
        self.observation
    }
}
