//! Threat Module
//!
//! Turns the continuous ensemble score into a discrete threat level.
//!
//! ## Structure
//! - `types`: ThreatLevel
//! - `rules`: Thresholds and constants
//! - `classifier`: Classification logic

pub mod classifier;
pub mod rules;
pub mod types;

// Re-export main types for convenience
pub use classifier::{classify, classify_with_thresholds};
pub use rules::{ThreatThresholds, CRITICAL_THRESHOLD, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
pub use types::ThreatLevel;
