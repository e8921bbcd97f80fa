//! Text Generator Port - 文本生成引擎抽象
//!
//! 定义语言模型推理的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 文本生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Inference task aborted: {0}")]
    Aborted(String),
}

/// 文本生成请求
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// 提示词（用户原始查询）
    pub prompt: String,
    /// 请求 ID（用于日志和追踪）
    pub request_id: String,
}

/// 文本生成响应
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// 生成的文本（只取一条序列）
    pub text: String,
}

/// Text Generator Port
///
/// 预训练生成式语言模型的抽象接口
#[async_trait]
pub trait TextGeneratorPort: Send + Sync {
    /// 根据提示词生成一段续写
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, GenerationError>;

    /// 检查模型服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
