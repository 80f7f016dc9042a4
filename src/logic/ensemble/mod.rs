//! Ensemble Module - fan-out, vote, classify, explain
//!
//! ## Structure
//! - `voting`: renormalization and weighted vote
//! - `coordinator`: EnsembleCoordinator and its builder
//! - `types`: EnsembleVerdict and observability records

pub mod coordinator;
pub mod types;
pub mod voting;

pub use coordinator::{EnsembleCoordinator, EnsembleCoordinatorBuilder};
pub use types::{CallStats, EngineStatus, EnsembleVerdict, ExcludedModel};
pub use voting::{renormalize, weighted_vote, VoteOutcome};
