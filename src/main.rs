//! Threat Ensemble - Main Entry Point
//!
//! Reads newline-delimited observations on stdin, writes one JSON line per
//! input: the verdict, or `{"error": ...}`.

use std::io::Write;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use threat_ensemble::constants::{APP_NAME, APP_VERSION};
use threat_ensemble::{EngineConfig, EnsembleCoordinator, NetworkObservation};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let coordinator = match EngineConfig::load().and_then(|config| config.build_coordinator()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to start engine: {}", e);
            std::process::exit(1);
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let out = handle_line(&coordinator, &line).await;
                let mut stdout = std::io::stdout().lock();
                if writeln!(stdout, "{}", out).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        }
    }

    let status = coordinator.status();
    log::info!(
        "Shutting down: {} verdicts, {} failed calls",
        status.verdict_count,
        status.failed_calls
    );
}

async fn handle_line(coordinator: &EnsembleCoordinator, line: &str) -> serde_json::Value {
    let observation = match NetworkObservation::from_json(line) {
        Ok(o) => o,
        Err(e) => return json!({ "error": e.to_string() }),
    };

    match coordinator.score_threat(&observation, None).await {
        Ok(verdict) => serde_json::to_value(&verdict).unwrap_or_else(|e| json!({ "error": e.to_string() })),
        Err(e) => json!({ "error": e.to_string() }),
    }
}
