//! Threat Classification Rules & Thresholds
//!
//! Thresholds are left-inclusive lower bounds:
//! `[0, 0.3) low, [0.3, 0.6) medium, [0.6, 0.8) high, [0.8, 1.0] critical`.

use serde::{Deserialize, Serialize};

use crate::logic::error::{EnsembleError, EnsembleResult};

// ============================================================================
// THRESHOLDS (Constants - fixed at runtime)
// ============================================================================

/// At or above this score = Medium
pub const MEDIUM_THRESHOLD: f64 = 0.3;

/// At or above this score = High
pub const HIGH_THRESHOLD: f64 = 0.6;

/// At or above this score = Critical
pub const CRITICAL_THRESHOLD: f64 = 0.8;

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatThresholds {
    pub medium_min: f64,
    pub high_min: f64,
    pub critical_min: f64,
}

impl Default for ThreatThresholds {
    fn default() -> Self {
        Self {
            medium_min: MEDIUM_THRESHOLD,
            high_min: HIGH_THRESHOLD,
            critical_min: CRITICAL_THRESHOLD,
        }
    }
}

impl ThreatThresholds {
    /// Bounds must be strictly increasing inside (0, 1)
    pub fn validate(&self) -> EnsembleResult<()> {
        let ordered = 0.0 < self.medium_min
            && self.medium_min < self.high_min
            && self.high_min < self.critical_min
            && self.critical_min < 1.0;

        if !ordered {
            return Err(EnsembleError::Config(format!(
                "thresholds must satisfy 0 < {} < {} < {} < 1",
                self.medium_min, self.high_min, self.critical_min
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ThreatThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_order_rejected() {
        let thresholds = ThreatThresholds {
            medium_min: 0.6,
            high_min: 0.3,
            critical_min: 0.8,
        };
        assert!(thresholds.validate().is_err());

        let thresholds = ThreatThresholds {
            critical_min: 1.0,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }
}
