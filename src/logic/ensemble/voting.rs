//! Weighted Voting
//!
//! Weights are renormalized over the models that actually answered. When
//! those weights sum to zero every answering model gets an equal share.

/// Result of one weighted vote
#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    /// Σ w_i * score_i, in [0, 1]
    pub score: f64,
    /// Σ w_i * confidence_i, in [0, 1]
    pub confidence: f64,
    /// Renormalized weights, same order as the input
    pub weights: Vec<f64>,
}

/// Rescale `raw` so it sums to 1; uniform when the sum is 0
pub fn renormalize(raw: &[f64]) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }

    let total: f64 = raw.iter().sum();
    if total > 0.0 {
        raw.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / raw.len() as f64; raw.len()]
    }
}

/// `ballots` are (score, confidence, raw weight) per answering model
pub fn weighted_vote(ballots: &[(f64, f64, f64)]) -> VoteOutcome {
    let raw: Vec<f64> = ballots.iter().map(|&(_, _, w)| w).collect();
    let weights = renormalize(&raw);

    let mut score = 0.0;
    let mut confidence = 0.0;
    for (&(s, c, _), w) in ballots.iter().zip(&weights) {
        score += w * s;
        confidence += w * c;
    }

    VoteOutcome {
        score: score.clamp(0.0, 1.0),
        confidence: confidence.clamp(0.0, 1.0),
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_renormalize_subset() {
        let weights = renormalize(&[0.25, 0.25, 0.15]);
        assert!(close(weights.iter().sum::<f64>(), 1.0));
        assert!(close(weights[0], 0.25 / 0.65));
        assert!(close(weights[2], 0.15 / 0.65));
    }

    #[test]
    fn test_renormalize_zero_sum_is_uniform() {
        assert_eq!(renormalize(&[0.0, 0.0, 0.0, 0.0]), vec![0.25; 4]);
        assert!(renormalize(&[]).is_empty());
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        // 0.5 + 0.5 + 0.5 = 1.5 at rest
        let outcome = weighted_vote(&[(0.2, 0.6, 0.5), (0.4, 0.6, 0.5), (0.9, 0.6, 0.5)]);
        assert!(close(outcome.score, 0.5));
        assert!(close(outcome.confidence, 0.6));
    }

    #[test]
    fn test_uniform_scores_pass_through() {
        let outcome = weighted_vote(&[(0.9, 0.9, 0.35), (0.9, 0.9, 0.25), (0.9, 0.9, 0.25), (0.9, 0.9, 0.15)]);
        assert!(close(outcome.score, 0.9));
        assert!(close(outcome.confidence, 0.9));
    }

    #[test]
    fn test_zero_weight_model_has_no_say() {
        let outcome = weighted_vote(&[(1.0, 1.0, 0.0), (0.1, 0.5, 0.3)]);
        assert!(close(outcome.score, 0.1));
        assert!(close(outcome.confidence, 0.5));
        assert_eq!(outcome.weights[0], 0.0);
    }
}
