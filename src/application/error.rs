//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{AudioStorageError, GenerationError, InspectError, TtsError};
use crate::domain::ask::AskError;
use crate::domain::audio::AudioError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 输入无效（缺失/空查询、非法文件名）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 模型推理失败（模型错误、资源耗尽、输出形态异常）
    #[error("Inference failure: {0}")]
    InferenceFailure(String),

    /// 音频读写失败
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// 资源未找到
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApplicationError {
    /// 创建输入无效错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// 创建推理失败错误
    pub fn inference(message: impl Into<String>) -> Self {
        Self::InferenceFailure(message.into())
    }

    /// 创建存储错误
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageFailure(message.into())
    }
}

impl From<AskError> for ApplicationError {
    fn from(err: AskError) -> Self {
        match err {
            AskError::MissingQuery | AskError::EmptyQuery => Self::InvalidInput(err.to_string()),
            AskError::EmptyAnswer => Self::InferenceFailure(err.to_string()),
        }
    }
}

impl From<AudioError> for ApplicationError {
    fn from(err: AudioError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<GenerationError> for ApplicationError {
    fn from(err: GenerationError) -> Self {
        Self::InferenceFailure(format!("text generation failed: {}", err))
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        Self::InferenceFailure(format!("speech synthesis failed: {}", err))
    }
}

impl From<InspectError> for ApplicationError {
    fn from(err: InspectError) -> Self {
        Self::InferenceFailure(format!("unexpected audio from TTS: {}", err))
    }
}

impl From<AudioStorageError> for ApplicationError {
    fn from(err: AudioStorageError) -> Self {
        match err {
            AudioStorageError::InvalidName(_) => Self::InvalidInput(err.to_string()),
            AudioStorageError::FileNotFound(_) | AudioStorageError::OutsideRoot(_) => {
                Self::NotFound(err.to_string())
            }
            AudioStorageError::IoError(_) => Self::StorageFailure(err.to_string()),
        }
    }
}
