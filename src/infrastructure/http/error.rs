//! HTTP Error Handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: u16,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            errno: status.as_u16(),
            detail: detail.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = status.as_u16(), error = %msg, "Bad request");
                msg
            }
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = status.as_u16(), error = %msg, "Resource not found");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = status.as_u16(), error = %msg, "Internal server error");
                msg
            }
        };

        (status, Json(ErrorResponse::new(status, detail))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        let detail = e.to_string();
        match e {
            ApplicationError::InvalidInput(_) => ApiError::BadRequest(detail),
            ApplicationError::NotFound(_) => ApiError::NotFound(detail),
            ApplicationError::InferenceFailure(_) | ApplicationError::StorageFailure(_) => {
                ApiError::Internal(detail)
            }
        }
    }
}

/// 请求体不是合法 JSON 或字段类型不符，统一视为输入无效
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApplicationError::invalid_input(rejection.body_text()).into()
    }
}
