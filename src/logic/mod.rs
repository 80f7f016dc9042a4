//! Logic Module - Ensemble Threat Decision Engine
//!
//! observation → features → models → vote → threat level → explanation

pub mod config;
pub mod ensemble;
pub mod error;
pub mod explain;
pub mod features;
pub mod model;
pub mod threat;
pub mod weights;
