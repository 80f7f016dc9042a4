//! Ensemble Types
//!
//! Data structures only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::threat::ThreatLevel;

/// A model left out of one vote, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedModel {
    pub model_id: String,
    pub reason: String,
    pub timed_out: bool,
}

/// Final, fused assessment for one observation. Built once per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleVerdict {
    pub threat_level: ThreatLevel,
    /// Weighted score the level was derived from
    pub score: f64,
    pub confidence: f64,
    /// In voting order
    pub contributing_models: Vec<String>,
    pub feature_importance: BTreeMap<String, f64>,
    pub explanation: String,
    pub excluded_models: Vec<ExcludedModel>,
    /// Version of the weight snapshot used for the vote
    pub weights_version: u64,
}

/// Per-model call counters (observability)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStats {
    pub model_id: String,
    pub successes: u64,
    pub timeouts: u64,
    pub errors: u64,
    pub avg_latency_ms: f32,
}

/// Engine status for dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,
    pub model_count: usize,
    pub quorum: usize,
    pub weights_version: u64,
    pub verdict_count: u64,
    pub failed_calls: u64,
    pub last_contributing: usize,
}
