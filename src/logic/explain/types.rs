use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub name: String,
    pub importance: f64, // Σ renormalized_weight * confidence
    /// Position of first appearance among contributing models
    pub first_seen: usize,
}

/// Per-feature importance, kept in first-seen order.
/// Ranking never relies on this order except to break ties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub contributions: Vec<FeatureContribution>,
}

impl FeatureImportance {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.importance)
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Sorted by importance DESC, ties by first-seen order
    pub fn ranked(&self) -> Vec<&FeatureContribution> {
        let mut ranked: Vec<&FeatureContribution> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(Ordering::Equal)
                .then(a.first_seen.cmp(&b.first_seen))
        });
        ranked
    }

    pub fn top(&self, k: usize) -> Vec<&FeatureContribution> {
        let mut ranked = self.ranked();
        ranked.truncate(k);
        ranked
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.contributions
            .iter()
            .map(|c| (c.name.clone(), c.importance))
            .collect()
    }
}
