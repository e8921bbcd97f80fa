//! Ask Handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::application::AskCommand;
use crate::infrastructure::http::dto::{AskRequest, AskResponseDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 提交问题，返回回答文本与音频检索路径
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponseDto>, ApiError> {
    let Json(req) = payload?;

    let result = state
        .ask_handler
        .handle(AskCommand { query: req.query })
        .await?;

    Ok(Json(result.into()))
}
