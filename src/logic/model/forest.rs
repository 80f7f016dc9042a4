//! Random-forest style scorer
//!
//! Mean of leaf probabilities across trees. Confidence is the share of
//! trees that land on the same side of 0.5 as the ensemble mean.

use std::time::Duration;

use async_trait::async_trait;

use super::adapter::{check_layout, run_local, ModelAdapter, ModelVerdict};
use super::metrics::{MetricsBook, ModelMetrics};
use super::tree::TreeNode;
use crate::logic::error::ModelError;
use crate::logic::features::{FeatureLayout, FeatureVector};

pub struct RandomForestAdapter {
    model_id: String,
    trees: Vec<TreeNode<f64>>,
    feature_names: Vec<String>,
    /// Set for models tuned on a fixed layout
    layout: Option<FeatureLayout>,
    metrics: MetricsBook,
}

impl RandomForestAdapter {
    pub fn new(model_id: &str, trees: Vec<TreeNode<f64>>) -> Self {
        Self {
            model_id: model_id.to_string(),
            trees,
            feature_names: vec![
                "source_ip_reputation".to_string(),
                "destination_ip_reputation".to_string(),
                "time_based_patterns".to_string(),
                "flow_characteristics".to_string(),
            ],
            layout: None,
            metrics: MetricsBook::new(ModelMetrics::default()),
        }
    }

    /// Stock forest tuned on the reference layout
    pub fn reference() -> Self {
        let trees = vec![
            TreeNode::split(
                "traffic_volume",
                1.0,
                TreeNode::split("packet_size", -1.5, TreeNode::leaf(0.55), TreeNode::leaf(0.10)),
                TreeNode::split("traffic_volume", 2.5, TreeNode::leaf(0.70), TreeNode::leaf(0.95)),
            ),
            TreeNode::split(
                "port",
                2.0,
                TreeNode::split("traffic_volume", 1.5, TreeNode::leaf(0.15), TreeNode::leaf(0.75)),
                TreeNode::leaf(0.65),
            ),
            TreeNode::split(
                "time_of_day",
                -1.5,
                TreeNode::leaf(0.60),
                TreeNode::split("traffic_volume", 1.2, TreeNode::leaf(0.12), TreeNode::leaf(0.80)),
            ),
            TreeNode::split(
                "packet_size",
                2.0,
                TreeNode::split("traffic_volume", 2.0, TreeNode::leaf(0.20), TreeNode::leaf(0.85)),
                TreeNode::leaf(0.50),
            ),
            TreeNode::split("traffic_volume", 0.8, TreeNode::leaf(0.08), TreeNode::leaf(0.72)),
        ];

        let mut adapter = Self::new("random_forest", trees);
        adapter.layout = Some(FeatureLayout::default());
        adapter.metrics = MetricsBook::new(ModelMetrics {
            accuracy: 93.5,
            precision: 91.8,
            recall: 94.2,
            f1_score: 93.0,
            latency: 42.0,
            throughput: 1200.0,
            confidence_score: 85.2,
            drift_score: 0.11,
            prediction_count: 15847,
            error_rate: 6.5,
            ..Default::default()
        });
        adapter
    }

    /// (mean probability, agreement) over all trees
    pub fn vote(&self, vector: &FeatureVector) -> (f64, f64) {
        if self.trees.is_empty() {
            return (0.0, 0.0);
        }

        let leaves: Vec<f64> = self.trees.iter().map(|t| *t.descend(vector).0).collect();
        let n = leaves.len() as f64;
        let mean = leaves.iter().sum::<f64>() / n;

        let positive = mean >= 0.5;
        let agreeing = leaves.iter().filter(|&&p| (p >= 0.5) == positive).count();

        (mean, agreeing as f64 / n)
    }
}

#[async_trait]
impl ModelAdapter for RandomForestAdapter {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn predict(&self, features: &FeatureVector, deadline: Duration) -> Result<ModelVerdict, ModelError> {
        check_layout(&self.model_id, self.layout.as_ref(), features)?;
        let (verdict, elapsed) = run_local(&self.model_id, deadline, || {
            let (score, agreement) = self.vote(features);
            ModelVerdict::clamped(&self.model_id, score, agreement, self.feature_names.clone())
        })?;
        self.metrics.record(elapsed);
        Ok(verdict)
    }

    fn feature_names(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn self_reported_performance(&self) -> ModelMetrics {
        self.metrics.snapshot()
    }

    fn expected_layout(&self) -> Option<&FeatureLayout> {
        self.layout.as_ref()
    }
}
