//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::AskResponse;

// ============================================================================
// Ask DTOs
// ============================================================================

/// 问答请求体
///
/// `query` 缺失或为 null 时反序列化为 None，由应用层统一报 400
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// 问答响应体
#[derive(Debug, Serialize)]
pub struct AskResponseDto {
    pub answer: String,
    pub audio: String,
}

impl From<AskResponse> for AskResponseDto {
    fn from(resp: AskResponse) -> Self {
        Self {
            answer: resp.answer,
            audio: resp.audio,
        }
    }
}

// ============================================================================
// Health DTOs
// ============================================================================

/// Ping 响应
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` 或 `degraded`
    pub status: &'static str,
    pub llm: bool,
    pub tts: bool,
    pub artifacts: u64,
    pub artifact_bytes: u64,
}
