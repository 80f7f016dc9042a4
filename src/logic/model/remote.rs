//! Remote Model Adapter - HTTP model-serving backend
//!
//! POSTs the scaled feature vector as JSON and expects
//! `{ "score": f64, "confidence": f64 }` back. The request carries the
//! deadline as its timeout; scores are clamped here, never by the caller.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::adapter::{ModelAdapter, ModelVerdict};
use super::metrics::{MetricsBook, ModelMetrics};
use crate::logic::error::{EnsembleError, EnsembleResult, ModelError};
use crate::logic::features::FeatureVector;

/// Remote model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteModelConfig {
    pub model_id: String,
    pub endpoint: String,
    pub weight: f64,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

// Request/Response types

#[derive(Debug, Serialize)]
pub struct ScoreRequest<'a> {
    pub model_id: &'a str,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub features: BTreeMap<&'a str, f64>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
    pub confidence: f64,
}

pub struct RemoteModelAdapter {
    config: RemoteModelConfig,
    http_client: reqwest::Client,
    metrics: MetricsBook,
}

impl RemoteModelAdapter {
    pub fn new(config: RemoteModelConfig) -> EnsembleResult<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| EnsembleError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            metrics: MetricsBook::new(ModelMetrics::default()),
        })
    }

    /// Turn a backend response into a verdict
    pub fn parse_response(&self, response: ScoreResponse) -> Result<ModelVerdict, ModelError> {
        ModelVerdict::clamped(
            &self.config.model_id,
            response.score,
            response.confidence,
            self.config.feature_names.clone(),
        )
    }

    fn map_transport_error(&self, err: reqwest::Error, deadline: Duration) -> ModelError {
        if err.is_timeout() {
            ModelError::Timeout {
                model_id: self.config.model_id.clone(),
                deadline_ms: deadline.as_millis() as u64,
            }
        } else if err.is_decode() {
            ModelError::InvalidOutput {
                model_id: self.config.model_id.clone(),
                message: err.to_string(),
            }
        } else {
            ModelError::Backend {
                model_id: self.config.model_id.clone(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl ModelAdapter for RemoteModelAdapter {
    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    async fn predict(&self, features: &FeatureVector, deadline: Duration) -> Result<ModelVerdict, ModelError> {
        let started = Instant::now();

        let request = ScoreRequest {
            model_id: &self.config.model_id,
            feature_version: features.layout().version,
            layout_hash: features.layout().hash,
            features: features.named_values().collect(),
        };

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .timeout(deadline)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, deadline))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            log::debug!("Remote model {} answered HTTP {}", self.config.model_id, status);
            return Err(ModelError::Backend {
                model_id: self.config.model_id.clone(),
                message: format!("HTTP {}", status),
            });
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e, deadline))?;

        let verdict = self.parse_response(body)?;
        self.metrics.record(started.elapsed());
        Ok(verdict)
    }

    fn feature_names(&self) -> Vec<String> {
        self.config.feature_names.clone()
    }

    fn self_reported_performance(&self) -> ModelMetrics {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn config(endpoint: String) -> RemoteModelConfig {
        RemoteModelConfig {
            model_id: "remote_gbm".to_string(),
            endpoint,
            weight: 0.2,
            feature_names: vec!["payload_entropy".to_string()],
        }
    }

    #[test]
    fn test_parse_response_clamps() {
        let adapter = RemoteModelAdapter::new(config("http://127.0.0.1:1/score".into())).unwrap();
        let verdict = adapter
            .parse_response(ScoreResponse { score: 1.4, confidence: 0.8 })
            .unwrap();
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.features, vec!["payload_entropy".to_string()]);

        let err = adapter
            .parse_response(ScoreResponse { score: f64::NAN, confidence: 0.8 })
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidOutput { .. }));
    }

    #[test]
    fn test_config_from_json_defaults_feature_names() {
        let cfg: RemoteModelConfig = serde_json::from_str(
            r#"{"model_id": "m", "endpoint": "http://localhost/score", "weight": 0.5}"#,
        )
        .unwrap();
        assert!(cfg.feature_names.is_empty());
    }

    #[tokio::test]
    async fn test_silent_backend_times_out() {
        // Accepts connections but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let adapter = RemoteModelAdapter::new(config(format!("http://{}/score", addr))).unwrap();
        let vector = FeatureVector::from_named(&[("port", 0.0)]);

        let err = adapter
            .predict(&vector, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
