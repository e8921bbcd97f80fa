//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_inspector;
mod audio_storage;
mod text_generator;
mod tts_engine;

pub use audio_inspector::{AudioInfo, AudioInspectorPort, InspectError};
pub use audio_storage::{
    AudioStorageError, AudioStoragePort, GcPolicy, GcResult, StorageStats, StoredArtifact,
};
pub use text_generator::{GenerateRequest, GenerateResponse, GenerationError, TextGeneratorPort};
pub use tts_engine::{InferRequest, InferResponse, TtsEnginePort, TtsError};
