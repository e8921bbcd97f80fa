//! Audio Inspector Port - 音频校验抽象
//!
//! 校验 TTS 返回的音频确实是可解码的 WAV，并提取基本信息

use thiserror::Error;

/// 音频校验错误
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Audio contains no frames")]
    Empty,
}

/// 音频信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
    /// 每声道帧数
    pub frames: u64,
    /// 时长（毫秒）
    pub duration_ms: u64,
}

/// Audio Inspector Port
///
/// 解码是 CPU 密集操作，调用方应放在阻塞线程池中执行
pub trait AudioInspectorPort: Send + Sync {
    fn inspect(&self, data: &[u8]) -> Result<AudioInfo, InspectError>;
}
