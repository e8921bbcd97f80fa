//! Worker Layer - 推理执行池与后台任务
//!
//! - InferencePool: 有界推理执行池
//! - ArtifactGcWorker: 定时清理音频产物

mod artifact_gc;
mod inference_pool;

pub use artifact_gc::{ArtifactGcConfig, ArtifactGcWorker};
pub use inference_pool::{InferencePool, PoolError, PooledTextGenerator, PooledTtsEngine};
