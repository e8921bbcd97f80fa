//! Ping / Health Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{HealthResponse, PingResponse};
use crate::infrastructure::http::state::AppState;

/// Ping endpoint - 存活检查
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health endpoint - 依赖服务与存储状态
///
/// 始终返回 200，依赖不可用时 status 为 `degraded`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (llm, tts) = tokio::join!(
        state.text_generator.health_check(),
        state.tts_engine.health_check()
    );

    let (artifacts, artifact_bytes) = match state.audio_storage.get_stats().await {
        Ok(stats) => (stats.file_count, stats.used_bytes),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to collect storage stats");
            (0, 0)
        }
    };

    let status = if llm && tts { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        llm,
        tts,
        artifacts,
        artifact_bytes,
    })
}
