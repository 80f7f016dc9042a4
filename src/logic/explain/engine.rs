use super::types::FeatureImportance;
use crate::constants::EXPLANATION_TOP_K;

/// Renders the rationale sentence for a verdict
#[derive(Debug, Clone, Copy)]
pub struct ExplanationGenerator {
    top_k: usize,
}

impl Default for ExplanationGenerator {
    fn default() -> Self {
        Self { top_k: EXPLANATION_TOP_K }
    }
}

impl ExplanationGenerator {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn generate(&self, model_count: usize, confidence: f64, importance: &FeatureImportance) -> String {
        let top: Vec<&str> = importance
            .top(self.top_k)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();

        let factors = if top.is_empty() {
            "none".to_string()
        } else {
            top.join(", ")
        };

        format!(
            "Ensemble prediction based on {} models. Primary contributing factors: {}. Overall confidence: {:.1}%",
            model_count,
            factors,
            confidence * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::explain::types::FeatureContribution;

    fn importance(pairs: &[(&str, f64)]) -> FeatureImportance {
        FeatureImportance {
            contributions: pairs
                .iter()
                .enumerate()
                .map(|(i, (name, value))| FeatureContribution {
                    name: name.to_string(),
                    importance: *value,
                    first_seen: i,
                })
                .collect(),
        }
    }

    #[test]
    fn test_top_three_sorted() {
        let imp = importance(&[("a", 0.1), ("b", 0.4), ("c", 0.3), ("d", 0.2)]);
        let text = ExplanationGenerator::default().generate(4, 0.9, &imp);
        assert_eq!(
            text,
            "Ensemble prediction based on 4 models. Primary contributing factors: b, c, d. Overall confidence: 90.0%"
        );
    }

    #[test]
    fn test_custom_top_k() {
        let imp = importance(&[("a", 0.1), ("b", 0.4), ("c", 0.3)]);
        let text = ExplanationGenerator::new(1).generate(2, 0.5, &imp);
        assert!(text.contains("factors: b."));
    }

    #[test]
    fn test_empty_importance() {
        let text = ExplanationGenerator::default().generate(1, 0.456, &FeatureImportance::default());
        assert!(text.contains("factors: none."));
        assert!(text.ends_with("45.6%"));
    }
}
