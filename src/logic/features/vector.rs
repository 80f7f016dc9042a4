//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! The vector shares its `FeatureLayout` with the scaler that produced it,
//! so the length invariant (values.len() == layout.len()) is checked once at
//! construction and names can be resolved without copying.

use std::sync::Arc;

use super::layout::{FeatureLayout, LayoutError};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    layout: Arc<FeatureLayout>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create from values laid out according to `layout`
    pub fn new(layout: Arc<FeatureLayout>, values: Vec<f64>) -> Result<Self, LayoutError> {
        if values.len() != layout.len() {
            return Err(LayoutError::Dimension {
                expected: layout.len(),
                got: values.len(),
            });
        }
        Ok(Self { layout, values })
    }

    /// Build a vector (and its layout) from name/value pairs
    pub fn from_named(pairs: &[(&str, f64)]) -> Self {
        let layout = FeatureLayout::new(pairs.iter().map(|(n, _)| n.to_string()).collect());
        Self {
            layout: Arc::new(layout),
            values: pairs.iter().map(|(_, v)| *v).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.layout.index_of(name).and_then(|i| self.get(i))
    }

    /// Value by name, or 0.0 (the scaled mean) when the layout lacks it
    pub fn get_or_mean(&self, name: &str) -> f64 {
        self.get_by_name(name).unwrap_or(0.0)
    }

    /// Validate that this vector was produced under `expected`
    pub fn validate(&self, expected: &FeatureLayout) -> Result<(), LayoutError> {
        expected.validate(self.layout.version, self.layout.hash)
    }

    pub fn is_compatible(&self, expected: &FeatureLayout) -> bool {
        self.validate(expected).is_ok()
    }

    /// Iterate (name, value) pairs in layout order
    pub fn named_values(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.layout
            .names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.layout.version,
            "layout_hash": self.layout.hash,
            "values": self.values,
            "named_values": self
                .named_values()
                .map(|(name, value)| (name.to_string(), value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_is_enforced() {
        let layout = Arc::new(FeatureLayout::default());
        let err = FeatureVector::new(layout.clone(), vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, LayoutError::Dimension { expected: 4, got: 2 });

        let vector = FeatureVector::new(layout, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(vector.len(), 4);
        assert_eq!(vector.get_by_name("port"), Some(3.0));
    }

    #[test]
    fn test_get_or_mean_defaults_to_zero() {
        let vector = FeatureVector::from_named(&[("port", 1.5)]);
        assert_eq!(vector.get_or_mean("port"), 1.5);
        assert_eq!(vector.get_or_mean("traffic_volume"), 0.0);
    }

    #[test]
    fn test_compatibility() {
        let default_layout = FeatureLayout::default();
        let vector = FeatureVector::new(Arc::new(FeatureLayout::default()), vec![0.0; 4]).unwrap();
        assert!(vector.is_compatible(&default_layout));

        let other = FeatureVector::from_named(&[("port", 0.0)]);
        assert!(!other.is_compatible(&default_layout));
    }

    #[test]
    fn test_to_log_entry() {
        let vector = FeatureVector::from_named(&[("port", 0.5), ("packet_size", -1.0)]);
        let log = vector.to_log_entry();
        assert_eq!(log["named_values"]["port"], 0.5);
        assert!(log["layout_hash"].as_u64().is_some());
    }
}
