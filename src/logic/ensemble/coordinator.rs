//! Ensemble Coordinator
//!
//! scale → weight snapshot → parallel predict (deadline-bounded) →
//! weighted vote → threat level → feature importance → explanation.
//!
//! Per-model failures are fail-soft: the model is dropped from this vote
//! and counted. Only scaling errors and a missed quorum reach the caller.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use super::types::{CallStats, EngineStatus, EnsembleVerdict, ExcludedModel};
use super::voting::weighted_vote;
use crate::constants::{DEFAULT_DEADLINE_MS, DEFAULT_QUORUM};
use crate::logic::error::{EnsembleError, EnsembleResult, ModelError};
use crate::logic::explain::{ExplanationGenerator, FeatureImportanceAggregator};
use crate::logic::features::{FeatureScaler, FeatureVector, NetworkObservation, ScalerConfig};
use crate::logic::model::{ModelAdapter, ModelMetrics, ModelVerdict};
use crate::logic::threat::{classify_with_thresholds, ThreatThresholds};
use crate::logic::weights::WeightRegistry;

/// Collection cutoff for deadlines too large to add to `now`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

// ============================================================================
// CALL COUNTERS
// ============================================================================

#[derive(Debug, Default)]
struct ModelCallCounters {
    successes: AtomicU64,
    timeouts: AtomicU64,
    errors: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl ModelCallCounters {
    fn record(&self, outcome: &Result<ModelVerdict, ModelError>, elapsed: Duration) {
        match outcome {
            Ok(_) => {
                self.successes.fetch_add(1, Ordering::Relaxed);
                self.latency_sum_us
                    .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
            }
            Err(e) if e.is_timeout() => {
                self.timeouts.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn snapshot(&self, model_id: &str) -> CallStats {
        let successes = self.successes.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        CallStats {
            model_id: model_id.to_string(),
            successes,
            timeouts: self.timeouts.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            avg_latency_ms: if successes > 0 {
                (sum as f32 / successes as f32) / 1000.0
            } else {
                0.0
            },
        }
    }
}

// ============================================================================
// COORDINATOR
// ============================================================================

pub struct EnsembleCoordinator {
    scaler: FeatureScaler,
    adapters: Vec<Arc<dyn ModelAdapter>>,
    registry: Arc<WeightRegistry>,
    thresholds: ThreatThresholds,
    quorum: usize,
    default_deadline: Duration,
    aggregator: FeatureImportanceAggregator,
    explainer: ExplanationGenerator,
    counters: Vec<ModelCallCounters>,
    verdict_count: AtomicU64,
    failed_calls: AtomicU64,
    last_contributing: AtomicUsize,
}

impl EnsembleCoordinator {
    pub fn builder() -> EnsembleCoordinatorBuilder {
        EnsembleCoordinatorBuilder::default()
    }

    pub fn registry(&self) -> &Arc<WeightRegistry> {
        &self.registry
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    pub fn default_deadline(&self) -> Duration {
        self.default_deadline
    }

    pub fn model_ids(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.model_id().to_string()).collect()
    }

    /// Score one observation. `deadline` falls back to the configured default.
    pub async fn score_threat(
        &self,
        observation: &NetworkObservation,
        deadline: Option<Duration>,
    ) -> EnsembleResult<EnsembleVerdict> {
        let deadline = deadline.unwrap_or(self.default_deadline);

        // 1. Scale (abort on malformed input)
        let features = match self.scaler.scale(observation) {
            Ok(v) => {
                log::debug!("Scaled observation: {}", v.to_log_entry());
                Arc::new(v)
            }
            Err(e) => {
                log::warn!("Observation rejected: {}", e);
                self.failed_calls.fetch_add(1, Ordering::Relaxed);
                return Err(e.into());
            }
        };

        // 2. Weight snapshot, fixed for the rest of the call
        let snapshot = self.registry.snapshot();

        // 3-4. Fan out, collect whatever lands before the deadline
        let outcomes = self.collect_predictions(features, deadline).await;

        let mut succeeded: Vec<(ModelVerdict, f64)> = Vec::new();
        let mut excluded: Vec<ExcludedModel> = Vec::new();

        for (adapter, outcome) in self.adapters.iter().zip(outcomes) {
            let model_id = adapter.model_id();
            match outcome {
                Ok(verdict) => {
                    let weight = snapshot.get(model_id).unwrap_or_else(|| {
                        log::warn!("No weight registered for {}, voting with 0", model_id);
                        0.0
                    });
                    succeeded.push((verdict, weight));
                }
                Err(e) => {
                    log::warn!("Model {} excluded from vote: {}", model_id, e);
                    excluded.push(ExcludedModel {
                        model_id: model_id.to_string(),
                        reason: e.to_string(),
                        timed_out: e.is_timeout(),
                    });
                }
            }
        }

        // 5. Quorum
        if succeeded.len() < self.quorum {
            log::error!(
                "Quorum not met: {}/{} models answered, {} required",
                succeeded.len(),
                self.adapters.len(),
                self.quorum
            );
            self.failed_calls.fetch_add(1, Ordering::Relaxed);
            return Err(EnsembleError::InsufficientModels {
                required: self.quorum,
                succeeded: succeeded.len(),
                failed: excluded.len(),
            });
        }

        // 6-7. Renormalize over responders and vote
        let ballots: Vec<(f64, f64, f64)> = succeeded
            .iter()
            .map(|(v, w)| (v.score, v.confidence, *w))
            .collect();
        let outcome = weighted_vote(&ballots);

        // 8. Threat level
        let threat_level = classify_with_thresholds(outcome.score, &self.thresholds);

        // 9. Feature importance over contributors only
        let importance = self.aggregator.aggregate(
            succeeded
                .iter()
                .map(|(v, _)| v)
                .zip(outcome.weights.iter().copied()),
        );

        // 10. Explanation
        let explanation = self
            .explainer
            .generate(succeeded.len(), outcome.confidence, &importance);

        let contributing_models: Vec<String> =
            succeeded.iter().map(|(v, _)| v.model_id.clone()).collect();

        self.verdict_count.fetch_add(1, Ordering::Relaxed);
        self.last_contributing
            .store(contributing_models.len(), Ordering::Relaxed);

        log::debug!(
            "Verdict: level={} score={:.3} confidence={:.3} contributing={}/{}",
            threat_level,
            outcome.score,
            outcome.confidence,
            contributing_models.len(),
            self.adapters.len()
        );

        // 11. Done
        Ok(EnsembleVerdict {
            threat_level,
            score: outcome.score,
            confidence: outcome.confidence,
            contributing_models,
            feature_importance: importance.to_map(),
            explanation,
            excluded_models: excluded,
            weights_version: snapshot.version,
        })
    }

    /// One result per adapter, in registration order
    async fn collect_predictions(
        &self,
        features: Arc<FeatureVector>,
        deadline: Duration,
    ) -> Vec<Result<ModelVerdict, ModelError>> {
        let deadline_ms = deadline.as_millis() as u64;
        let now = tokio::time::Instant::now();
        let cutoff = now.checked_add(deadline).unwrap_or_else(|| now + FAR_FUTURE);

        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(self.adapters.len());
        for (index, adapter) in self.adapters.iter().enumerate() {
            let adapter = adapter.clone();
            let features = features.clone();
            let handle = tasks.spawn(async move {
                let started = Instant::now();
                let result = match tokio::time::timeout(deadline, adapter.predict(&features, deadline)).await {
                    Ok(Ok(verdict)) if verdict.model_id != adapter.model_id() => Err(ModelError::InvalidOutput {
                        model_id: adapter.model_id().to_string(),
                        message: format!("verdict labelled {}", verdict.model_id),
                    }),
                    Ok(result) => result,
                    Err(_) => Err(ModelError::Timeout {
                        model_id: adapter.model_id().to_string(),
                        deadline_ms,
                    }),
                };
                (index, result, started.elapsed())
            });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<Result<ModelVerdict, ModelError>>> =
            (0..self.adapters.len()).map(|_| None).collect();

        loop {
            match tokio::time::timeout_at(cutoff, tasks.join_next()).await {
                Ok(Some(Ok((index, result, elapsed)))) => {
                    self.counters[index].record(&result, elapsed);
                    slots[index] = Some(result);
                }
                Ok(Some(Err(join_error))) => {
                    log::error!("Prediction task failed: {}", join_error);
                    if let Some(&index) = task_index.get(&join_error.id()) {
                        let result = Err(ModelError::Backend {
                            model_id: self.adapters[index].model_id().to_string(),
                            message: join_error.to_string(),
                        });
                        self.counters[index].record(&result, Duration::ZERO);
                        slots[index] = Some(result);
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    // late arrivals are discarded
                    tasks.abort_all();
                    break;
                }
            }
        }

        slots
            .into_iter()
            .zip(&self.adapters)
            .zip(&self.counters)
            .map(|((slot, adapter), counters)| match slot {
                Some(result) => result,
                None => {
                    let result = Err(ModelError::Timeout {
                        model_id: adapter.model_id().to_string(),
                        deadline_ms,
                    });
                    counters.record(&result, deadline);
                    result
                }
            })
            .collect()
    }

    /// The only mutation path into the weight registry
    pub fn update_weight(&self, model_id: &str, weight: f64) -> EnsembleResult<()> {
        let previous = self.registry.set_weight(model_id, weight)?;
        log::info!("Weight updated: {} {:.3} -> {:.3}", model_id, previous, weight);
        Ok(())
    }

    /// Self-reported metrics of every adapter; never triggers a prediction
    pub fn get_model_performance(&self) -> BTreeMap<String, ModelMetrics> {
        self.adapters
            .iter()
            .map(|a| (a.model_id().to_string(), a.self_reported_performance()))
            .collect()
    }

    pub fn call_stats(&self) -> Vec<CallStats> {
        self.adapters
            .iter()
            .zip(&self.counters)
            .map(|(a, c)| c.snapshot(a.model_id()))
            .collect()
    }

    pub fn status(&self) -> EngineStatus {
        let layout = self.scaler.layout();
        EngineStatus {
            feature_version: layout.version,
            layout_hash: layout.hash,
            feature_count: layout.len(),
            model_count: self.adapters.len(),
            quorum: self.quorum,
            weights_version: self.registry.version(),
            verdict_count: self.verdict_count.load(Ordering::Relaxed),
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
            last_contributing: self.last_contributing.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

pub struct EnsembleCoordinatorBuilder {
    scaler: Option<FeatureScaler>,
    adapters: Vec<(Arc<dyn ModelAdapter>, Option<f64>)>,
    registry: Option<Arc<WeightRegistry>>,
    thresholds: ThreatThresholds,
    quorum: usize,
    deadline: Duration,
}

impl Default for EnsembleCoordinatorBuilder {
    fn default() -> Self {
        Self {
            scaler: None,
            adapters: Vec::new(),
            registry: None,
            thresholds: ThreatThresholds::default(),
            quorum: DEFAULT_QUORUM,
            deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
        }
    }
}

impl EnsembleCoordinatorBuilder {
    pub fn scaler(mut self, scaler: FeatureScaler) -> Self {
        self.scaler = Some(scaler);
        self
    }

    /// Add a model with its initial weight
    pub fn adapter(mut self, adapter: Arc<dyn ModelAdapter>, weight: f64) -> Self {
        self.adapters.push((adapter, Some(weight)));
        self
    }

    /// Add a model whose weight is already in the shared registry
    pub fn registered_adapter(mut self, adapter: Arc<dyn ModelAdapter>) -> Self {
        self.adapters.push((adapter, None));
        self
    }

    pub fn registry(mut self, registry: Arc<WeightRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn thresholds(mut self, thresholds: ThreatThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn quorum(mut self, quorum: usize) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn build(self) -> EnsembleResult<EnsembleCoordinator> {
        if self.adapters.is_empty() {
            return Err(EnsembleError::Config("ensemble needs at least one model".to_string()));
        }
        if self.quorum == 0 || self.quorum > self.adapters.len() {
            return Err(EnsembleError::Config(format!(
                "quorum {} outside 1..={}",
                self.quorum,
                self.adapters.len()
            )));
        }
        if self.deadline.is_zero() {
            return Err(EnsembleError::Config("deadline must be positive".to_string()));
        }
        self.thresholds.validate()?;

        let scaler = match self.scaler {
            Some(scaler) => scaler,
            None => FeatureScaler::new(&ScalerConfig::default())?,
        };
        let registry = self.registry.unwrap_or_default();

        let mut adapters: Vec<Arc<dyn ModelAdapter>> = Vec::with_capacity(self.adapters.len());
        for (adapter, weight) in self.adapters {
            let model_id = adapter.model_id().to_string();
            if adapters.iter().any(|a| a.model_id() == model_id) {
                return Err(EnsembleError::Config(format!("duplicate model: {}", model_id)));
            }
            if let Some(expected) = adapter.expected_layout() {
                let layout = scaler.layout();
                if expected.validate(layout.version, layout.hash).is_err() {
                    return Err(EnsembleError::Config(format!(
                        "model {} expects features {:?}, scaler produces {:?}",
                        model_id, expected.names, layout.names
                    )));
                }
            }

            match weight {
                Some(w) if registry.contains(&model_id) => {
                    registry.set_weight(&model_id, w)?;
                }
                Some(w) => registry.register_model(&model_id, w)?,
                None if registry.contains(&model_id) => {}
                None => return Err(EnsembleError::UnknownModel(model_id)),
            }

            adapters.push(adapter);
        }

        log::info!(
            "Ensemble ready: {} models, quorum {}, deadline {}ms, {} features",
            adapters.len(),
            self.quorum,
            self.deadline.as_millis(),
            scaler.dimension()
        );

        let counters = adapters.iter().map(|_| ModelCallCounters::default()).collect();

        Ok(EnsembleCoordinator {
            scaler,
            adapters,
            registry,
            thresholds: self.thresholds,
            quorum: self.quorum,
            default_deadline: self.deadline,
            aggregator: FeatureImportanceAggregator,
            explainer: ExplanationGenerator::default(),
            counters,
            verdict_count: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
            last_contributing: AtomicUsize::new(0),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::ObservationBuilder;
    use crate::logic::model::{StubAdapter, StubBehavior};
    use crate::logic::threat::ThreatLevel;

    fn observation() -> NetworkObservation {
        ObservationBuilder::new()
            .traffic_volume(1200.0)
            .packet_size(480.0)
            .port(443)
            .timestamp(1_700_000_000)
            .build()
    }

    fn stub(id: &str, score: f64, confidence: f64, features: &[&str]) -> Arc<dyn ModelAdapter> {
        Arc::new(StubAdapter::responding(id, score, confidence, features))
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_model_is_dropped() {
        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.7, 0.8, &["port"]), 0.5)
            .adapter(Arc::new(StubAdapter::new("hang", StubBehavior::Hang, &["flags"])), 0.5)
            .deadline(Duration::from_millis(50))
            .build()
            .unwrap();

        let verdict = coordinator.score_threat(&observation(), None).await.unwrap();

        assert_eq!(verdict.contributing_models, vec!["a".to_string()]);
        assert!((verdict.score - 0.7).abs() < 1e-12);
        assert_eq!(verdict.threat_level, ThreatLevel::High);
        assert!(!verdict.feature_importance.contains_key("flags"));
        assert_eq!(verdict.excluded_models.len(), 1);
        assert!(verdict.excluded_models[0].timed_out);

        let stats = coordinator.call_stats();
        assert_eq!(stats[0].successes, 1);
        assert_eq!(stats[1].timeouts, 1);
    }

    #[tokio::test]
    async fn test_failing_model_is_dropped() {
        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.1, 0.9, &["port"]), 0.3)
            .adapter(Arc::new(StubAdapter::new("bad", StubBehavior::Fail("boom".into()), &[])), 0.7)
            .build()
            .unwrap();

        let verdict = coordinator.score_threat(&observation(), None).await.unwrap();
        assert_eq!(verdict.contributing_models, vec!["a".to_string()]);
        assert!(!verdict.excluded_models[0].timed_out);
        assert!(verdict.excluded_models[0].reason.contains("boom"));
        assert_eq!(coordinator.call_stats()[1].errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quorum_enforced() {
        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.5, 0.5, &[]), 0.5)
            .adapter(Arc::new(StubAdapter::new("hang", StubBehavior::Hang, &[])), 0.5)
            .quorum(2)
            .build()
            .unwrap();

        let err = coordinator
            .score_threat(&observation(), Some(Duration::from_millis(20)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EnsembleError::InsufficientModels { required: 2, succeeded: 1, failed: 1 }
        );
        assert_eq!(coordinator.status().failed_calls, 1);
    }

    #[tokio::test]
    async fn test_zero_weights_fall_back_to_uniform() {
        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.2, 0.4, &["x"]), 0.0)
            .adapter(stub("b", 0.6, 0.8, &["y"]), 0.0)
            .build()
            .unwrap();

        let verdict = coordinator.score_threat(&observation(), None).await.unwrap();
        assert!((verdict.score - 0.4).abs() < 1e-12);
        assert!((verdict.confidence - 0.6).abs() < 1e-12);
        assert!((verdict.feature_importance["x"] - 0.2).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_update_weight_shifts_the_vote() {
        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.0, 1.0, &[]), 0.5)
            .adapter(stub("b", 1.0, 1.0, &[]), 0.5)
            .build()
            .unwrap();

        let before = coordinator.score_threat(&observation(), None).await.unwrap();
        assert!((before.score - 0.5).abs() < 1e-12);

        coordinator.update_weight("a", 0.0).unwrap();
        let after = coordinator.score_threat(&observation(), None).await.unwrap();
        assert!((after.score - 1.0).abs() < 1e-12);
        assert_eq!(after.threat_level, ThreatLevel::Critical);
        assert!(after.weights_version > before.weights_version);

        assert!(matches!(
            coordinator.update_weight("missing", 0.5),
            Err(EnsembleError::UnknownModel(_))
        ));
    }

    #[tokio::test]
    async fn test_mislabelled_verdict_rejected() {
        struct Liar;

        #[async_trait::async_trait]
        impl ModelAdapter for Liar {
            fn model_id(&self) -> &str {
                "liar"
            }
            async fn predict(&self, _: &FeatureVector, _: Duration) -> Result<ModelVerdict, ModelError> {
                ModelVerdict::clamped("someone_else", 1.0, 1.0, vec![])
            }
            fn feature_names(&self) -> Vec<String> {
                vec![]
            }
            fn self_reported_performance(&self) -> ModelMetrics {
                ModelMetrics::default()
            }
        }

        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.1, 0.5, &[]), 0.5)
            .adapter(Arc::new(Liar), 0.5)
            .build()
            .unwrap();

        let verdict = coordinator.score_threat(&observation(), None).await.unwrap();
        assert_eq!(verdict.contributing_models, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_unbounded_deadline() {
        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.9, 0.9, &["port"]), 1.0)
            .build()
            .unwrap();

        let verdict = coordinator
            .score_threat(&observation(), Some(Duration::MAX))
            .await
            .unwrap();
        assert_eq!(verdict.threat_level, ThreatLevel::Critical);
        assert_eq!(coordinator.call_stats()[0].successes, 1);
    }

    #[tokio::test]
    async fn test_panicking_model_is_a_backend_error() {
        struct Crashes;

        #[async_trait::async_trait]
        impl ModelAdapter for Crashes {
            fn model_id(&self) -> &str {
                "crashes"
            }
            async fn predict(&self, _: &FeatureVector, _: Duration) -> Result<ModelVerdict, ModelError> {
                panic!("weights file truncated")
            }
            fn feature_names(&self) -> Vec<String> {
                vec![]
            }
            fn self_reported_performance(&self) -> ModelMetrics {
                ModelMetrics::default()
            }
        }

        let coordinator = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.2, 0.5, &[]), 0.5)
            .adapter(Arc::new(Crashes), 0.5)
            .build()
            .unwrap();

        let verdict = coordinator.score_threat(&observation(), None).await.unwrap();
        assert_eq!(verdict.contributing_models, vec!["a".to_string()]);
        assert_eq!(verdict.excluded_models[0].model_id, "crashes");
        assert!(!verdict.excluded_models[0].timed_out);
        assert!(verdict.excluded_models[0].reason.contains("panicked"));

        let stats = coordinator.call_stats();
        assert_eq!(stats[1].errors, 1);
        assert_eq!(stats[1].timeouts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_weight_update_during_call_waits_for_next_call() {
        let slow = StubBehavior::Delayed {
            delay: Duration::from_millis(100),
            score: 0.0,
            confidence: 1.0,
        };
        let coordinator = EnsembleCoordinator::builder()
            .adapter(Arc::new(StubAdapter::new("slow", slow, &[])), 0.5)
            .adapter(stub("fast", 1.0, 1.0, &[]), 0.5)
            .build()
            .unwrap();
        let version = coordinator.registry().version();

        let obs = observation();
        let (in_flight, _) = tokio::join!(
            coordinator.score_threat(&obs, Some(Duration::from_secs(1))),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                coordinator.update_weight("slow", 0.0).unwrap();
            }
        );

        let in_flight = in_flight.unwrap();
        assert!((in_flight.score - 0.5).abs() < 1e-12);
        assert_eq!(in_flight.weights_version, version);
        assert!(coordinator.registry().version() > version);

        let next = coordinator
            .score_threat(&observation(), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert!((next.score - 1.0).abs() < 1e-12);
        assert_eq!(next.weights_version, coordinator.registry().version());
    }

    #[test]
    fn test_reference_model_needs_its_layout() {
        use crate::logic::features::FeatureSpec;
        use crate::logic::model::RandomForestAdapter;

        let config = ScalerConfig {
            features: vec![FeatureSpec::new("port", 80.0, 40.0), FeatureSpec::new("flag_count", 1.0, 1.0)],
        };
        let result = EnsembleCoordinator::builder()
            .scaler(FeatureScaler::new(&config).unwrap())
            .adapter(Arc::new(RandomForestAdapter::reference()), 0.5)
            .build();
        assert!(matches!(result, Err(EnsembleError::Config(_))));

        let stock = EnsembleCoordinator::builder()
            .adapter(Arc::new(RandomForestAdapter::reference()), 0.5)
            .build();
        assert!(stock.is_ok());
    }

    #[test]
    fn test_builder_validation() {
        assert!(EnsembleCoordinator::builder().build().is_err());

        let dup = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.1, 0.1, &[]), 0.5)
            .adapter(stub("a", 0.1, 0.1, &[]), 0.5)
            .build();
        assert!(matches!(dup, Err(EnsembleError::Config(_))));

        let quorum = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.1, 0.1, &[]), 0.5)
            .quorum(2)
            .build();
        assert!(quorum.is_err());

        let bad_weight = EnsembleCoordinator::builder()
            .adapter(stub("a", 0.1, 0.1, &[]), 1.5)
            .build();
        assert!(matches!(bad_weight, Err(EnsembleError::Validation(_))));

        let unregistered = EnsembleCoordinator::builder()
            .registered_adapter(stub("a", 0.1, 0.1, &[]))
            .build();
        assert!(matches!(unregistered, Err(EnsembleError::UnknownModel(_))));
    }

    #[test]
    fn test_shared_registry() {
        let registry = Arc::new(WeightRegistry::new());
        registry.register_model("a", 0.4).unwrap();

        let coordinator = EnsembleCoordinator::builder()
            .registry(registry.clone())
            .registered_adapter(stub("a", 0.1, 0.1, &[]))
            .build()
            .unwrap();

        registry.set_weight("a", 0.9).unwrap();
        assert_eq!(coordinator.registry().get("a"), Some(0.9));
        assert_eq!(coordinator.status().model_count, 1);
    }

    #[test]
    fn test_model_performance_is_self_reported() {
        let metrics = ModelMetrics {
            accuracy: 91.0,
            ..ModelMetrics::default()
        };
        let adapter = StubAdapter::responding("a", 0.1, 0.1, &[]).with_metrics(metrics);
        let coordinator = EnsembleCoordinator::builder()
            .adapter(Arc::new(adapter), 0.5)
            .build()
            .unwrap();

        let performance = coordinator.get_model_performance();
        assert_eq!(performance["a"].accuracy, 91.0);
        assert_eq!(coordinator.call_stats()[0].successes, 0);
    }
}
