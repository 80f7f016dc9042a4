//! Threat Classifier
//!
//! Maps a weighted score to a `ThreatLevel`. Pure and deterministic.

use super::rules::ThreatThresholds;
use super::types::ThreatLevel;

/// Classify with the fixed default table
pub fn classify(score: f64) -> ThreatLevel {
    classify_with_thresholds(score, &ThreatThresholds::default())
}

/// Classification with custom thresholds
pub fn classify_with_thresholds(score: f64, thresholds: &ThreatThresholds) -> ThreatLevel {
    if score < thresholds.medium_min {
        ThreatLevel::Low
    } else if score < thresholds.high_min {
        ThreatLevel::Medium
    } else if score < thresholds.critical_min {
        ThreatLevel::High
    } else {
        ThreatLevel::Critical
    }
}

// ============================================================================
// TESTS
// ============================================================================
