//! Central Configuration Constants
//!
//! Single source of truth for engine defaults.

/// Minimum number of models that must answer for a verdict
pub const DEFAULT_QUORUM: usize = 1;

/// Per-call deadline when the caller does not supply one (milliseconds)
pub const DEFAULT_DEADLINE_MS: u64 = 250;

/// Number of features named in the explanation sentence
pub const EXPLANATION_TOP_K: usize = 3;

/// Reference ensemble members and their initial voting weights
pub const DEFAULT_WEIGHTS: &[(&str, f64)] = &[
    ("xgboost", 0.35),
    ("random_forest", 0.25),
    ("neural_network", 0.25),
    ("isolation_forest", 0.15),
];

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "threat-ensemble";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Path of the JSON config file, if any
pub fn get_config_path() -> Option<String> {
    std::env::var("ENSEMBLE_CONFIG").ok().filter(|s| !s.is_empty())
}

/// Quorum override from environment
pub fn get_quorum_override() -> Option<usize> {
    std::env::var("ENSEMBLE_QUORUM")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Deadline override from environment (milliseconds)
pub fn get_deadline_override() -> Option<u64> {
    std::env::var("ENSEMBLE_DEADLINE_MS")
        .ok()
        .and_then(|s| s.parse().ok())
}
