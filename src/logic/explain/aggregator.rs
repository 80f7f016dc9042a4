//! Feature Importance Aggregator
//!
//! For each contributing model and each feature it declares, adds
//! `renormalized_weight * confidence` to that feature, once per declaration
//! (a feature listed twice counts twice). Only verdicts passed
//! in are considered, so excluded models can never leak features here.

use std::collections::HashMap;

use super::types::{FeatureContribution, FeatureImportance};
use crate::logic::model::ModelVerdict;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureImportanceAggregator;

impl FeatureImportanceAggregator {
    /// `contributors` must be in voting order; that order defines first-seen
    pub fn aggregate<'a, I>(&self, contributors: I) -> FeatureImportance
    where
        I: IntoIterator<Item = (&'a ModelVerdict, f64)>,
    {
        let mut contributions: Vec<FeatureContribution> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (verdict, weight) in contributors {
            let share = weight * verdict.confidence;

            for feature in &verdict.features {
                match index.get(feature) {
                    Some(&i) => contributions[i].importance += share,
                    None => {
                        index.insert(feature.clone(), contributions.len());
                        contributions.push(FeatureContribution {
                            name: feature.clone(),
                            importance: share,
                            first_seen: contributions.len(),
                        });
                    }
                }
            }
        }

        FeatureImportance { contributions }
    }
}
