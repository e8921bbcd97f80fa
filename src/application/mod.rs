//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextGenerator、TtsEngine、AudioInspector、AudioStorage）
//! - commands: 问答命令及处理器
//! - queries: 音频检索查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{handlers::AskHandler, AskCommand, AskResponse};

pub use error::ApplicationError;

pub use ports::{
    // Audio inspector
    AudioInfo,
    AudioInspectorPort,
    InspectError,
    // Audio storage
    AudioStorageError,
    AudioStoragePort,
    GcPolicy,
    GcResult,
    StorageStats,
    StoredArtifact,
    // Text generator
    GenerateRequest,
    GenerateResponse,
    GenerationError,
    TextGeneratorPort,
    // TTS engine
    InferRequest,
    InferResponse,
    TtsEnginePort,
    TtsError,
};

pub use queries::{handlers::GetAudioHandler, GetAudioQuery, GetAudioResponse};
