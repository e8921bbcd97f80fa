//! VoxReply - 文本问答 + 语音合成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Ask Context: 查询与回答
//! - Audio Context: 音频产物命名与格式
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TextGenerator, TtsEngine, AudioInspector, AudioStorage）
//! - Commands: 问答命令处理器
//! - Queries: 音频检索查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: LLM / TTS 客户端、WAV 解析、文件存储
//! - Worker: 有界推理执行池、产物 GC

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
