//! Threat Ensemble - multi-model threat decision engine
//!
//! Fuses independent classifier verdicts on a network observation into one
//! threat level with a feature-level explanation.

pub mod constants;
pub mod logic;

pub use logic::config::EngineConfig;
pub use logic::ensemble::{EnsembleCoordinator, EnsembleVerdict};
pub use logic::error::{EnsembleError, EnsembleResult, ModelError, ScalingError};
pub use logic::features::NetworkObservation;
pub use logic::threat::ThreatLevel;
