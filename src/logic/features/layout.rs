//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add a raw feature kind → increment FEATURE_VERSION
//! 2. Change how a raw feature is derived → increment FEATURE_VERSION
//!
//! The concrete order of features comes from the scaler configuration. The
//! layout hash covers version + ordered names, so two vectors are comparable
//! only when both match.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when derivation rules change
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// RAW FEATURES
// ============================================================================

/// Raw features that can be derived from a `NetworkObservation`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawFeature {
    /// Bytes observed in the capture window
    TrafficVolume,
    /// Mean packet size in bytes
    PacketSize,
    /// Destination port
    Port,
    /// Seconds since UTC midnight / 86400
    TimeOfDay,
    /// Number of distinct TCP flags seen
    FlagCount,
}

impl RawFeature {
    pub const ALL: [RawFeature; 5] = [
        RawFeature::TrafficVolume,
        RawFeature::PacketSize,
        RawFeature::Port,
        RawFeature::TimeOfDay,
        RawFeature::FlagCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RawFeature::TrafficVolume => "traffic_volume",
            RawFeature::PacketSize => "packet_size",
            RawFeature::Port => "port",
            RawFeature::TimeOfDay => "time_of_day",
            RawFeature::FlagCount => "flag_count",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for RawFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference layout: the four features the stock ensemble was tuned on
pub const DEFAULT_LAYOUT: &[&str] = &[
    "traffic_volume", // 0: bytes in window
    "packet_size",    // 1: mean packet size
    "port",           // 2: destination port
    "time_of_day",    // 3: normalized time of day
];

// ============================================================================
// LAYOUT
// ============================================================================

/// Ordered feature names plus version/hash stamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    pub version: u8,
    pub hash: u32,
    pub names: Vec<String>,
}

impl FeatureLayout {
    pub fn new(names: Vec<String>) -> Self {
        let hash = compute_layout_hash(&names);
        Self {
            version: FEATURE_VERSION,
            hash,
            names,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get feature index by name (O(n) but features are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Get feature name by index
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Validate that incoming data matches this layout
    pub fn validate(&self, incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutError> {
        if incoming_version != self.version || incoming_hash != self.hash {
            return Err(LayoutError::Mismatch {
                expected_version: self.version,
                expected_hash: self.hash,
                actual_version: incoming_version,
                actual_hash: incoming_hash,
            });
        }
        Ok(())
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT.iter().map(|s| s.to_string()).collect())
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of a feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(
        "feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
         got v{actual_version} (hash: {actual_hash:08x})"
    )]
    Mismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    #[error("invalid vector dimension: expected {expected}, got {got}")]
    Dimension { expected: usize, got: usize },
}

// ============================================================================
// TESTS
// ============================================================================
