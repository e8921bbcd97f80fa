//! Audio Handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tokio_util::io::ReaderStream;

use crate::application::{GetAudioQuery, GetAudioResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 流式返回音频目录中的文件
///
/// 共享槽位会在同名下被覆盖，所以禁止客户端缓存
pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let audio = state
        .get_audio_handler
        .handle(GetAudioQuery { filename })
        .await?;

    tracing::debug!(
        file = %audio.name,
        path = %audio.path.display(),
        size_bytes = audio.size_bytes,
        content_type = audio.content_type,
        "Serving audio file"
    );

    // 长度、ETag 和字节流都来自同一个已打开的句柄
    let tag = etag(&audio);
    let body = Body::from_stream(ReaderStream::new(audio.file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, audio.content_type)
        .header(header::CONTENT_LENGTH, audio.size_bytes)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::ETAG, tag)
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// 由文件名、大小和修改时间生成弱校验 ETag
fn etag(audio: &GetAudioResponse) -> String {
    let modified_nanos = audio
        .modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let digest = md5::compute(format!(
        "{}:{}:{}",
        audio.name, audio.size_bytes, modified_nanos
    ));
    format!("W/\"{:x}\"", digest)
}
