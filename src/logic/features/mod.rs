//! Features Module - Feature Extraction Engine
//!
//! Turns a raw `NetworkObservation` into a fixed-length, z-scored
//! `FeatureVector` stamped with its layout.

pub mod layout;
pub mod observation;
pub mod scaler;
pub mod vector;

// Re-export common types
pub use layout::{FeatureLayout, LayoutError, RawFeature, DEFAULT_LAYOUT, FEATURE_VERSION};
pub use observation::{NetworkObservation, ObservationBuilder};
pub use scaler::{FeatureScaler, FeatureSpec, ScalerConfig};
pub use vector::FeatureVector;
