//! Thin HTTP control surface: health and status snapshots for operators.
//! No mutation endpoints — the engine is driven by the inbound stream.

use crate::engage::ReplyEngine;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::timeout::TimeoutLayer;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReplyEngine>,
    pub started_at: Instant,
    pub gateway_name: String,
    pub posting_enabled: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    processed_posts: usize,
    engagements_recorded: usize,
    rate_remaining: usize,
    rate_next_available_ms: u128,
    personas: Vec<String>,
    gateway: String,
    posting_enabled: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/status", get(handle_status))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .with_state(state)
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let mut personas: Vec<String> = state
        .engine
        .personas()
        .into_iter()
        .map(|persona| persona.name)
        .collect();
    personas.sort();

    Json(StatusResponse {
        processed_posts: state.engine.processed_count(),
        engagements_recorded: state.engine.engagement_history().len(),
        rate_remaining: state.engine.rate_remaining(),
        rate_next_available_ms: state.engine.rate_next_available().as_millis(),
        personas,
        gateway: state.gateway_name.clone(),
        posting_enabled: state.posting_enabled,
    })
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|err| anyhow::anyhow!("invalid control address {host}:{port}: {err}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "control surface listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentGenerator;
    use crate::persona::Persona;
    use crate::social::Post;
    use async_trait::async_trait;
    use tower::util::ServiceExt;

    struct StubGenerator;

    #[async_trait]
    impl ContentGenerator for StubGenerator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate_reply(&self, _: &Post, _: &Persona) -> anyhow::Result<String> {
            Ok("reply".into())
        }

        async fn generate_thread(
            &self,
            _: &Post,
            _: &Persona,
            len: usize,
        ) -> anyhow::Result<Vec<String>> {
            Ok(vec!["segment".into(); len])
        }
    }

    fn state() -> AppState {
        let engine = ReplyEngine::new(
            &crate::engage::EngineSettings::default(),
            Arc::new(StubGenerator),
        );
        AppState {
            engine: Arc::new(engine),
            started_at: Instant::now(),
            gateway_name: "dry-run".into(),
            posting_enabled: false,
        }
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = router(state());
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn status_endpoint_lists_personas() {
        let app = router(state());
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/status")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["processed_posts"], 0);
        assert_eq!(value["personas"].as_array().unwrap().len(), 5);
    }
}
