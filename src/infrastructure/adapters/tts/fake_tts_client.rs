//! Fake TTS Client - 用于测试和本地演示的 TTS 客户端
//!
//! 不实际调用 TTS 服务，按文本长度生成一段正弦提示音 WAV

use async_trait::async_trait;
use std::f32::consts::PI;
use std::time::Duration;

use crate::application::ports::{InferRequest, InferResponse, TtsEnginePort, TtsError};
use crate::infrastructure::adapters::audio::encode_pcm16_wav;

/// 最短音频时长（毫秒）
const MIN_DURATION_MS: u64 = 200;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 采样率
    pub sample_rate: u32,
    /// 每个字符对应的音频时长（毫秒）
    pub ms_per_char: u64,
    /// 音频时长上限（毫秒）
    pub max_duration_ms: u64,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            ms_per_char: 60,
            max_duration_ms: 10_000,
            latency_ms: 100,
        }
    }
}

/// Fake TTS Client
///
/// 音频长度随文本长度变化，便于区分不同请求写入的产物
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            sample_rate = config.sample_rate,
            ms_per_char = config.ms_per_char,
            "FakeTtsClient initialized"
        );
        Self { config }
    }

    fn duration_for(&self, text: &str) -> u64 {
        let chars = text.chars().count() as u64;
        let max = self.config.max_duration_ms.max(MIN_DURATION_MS);
        (chars * self.config.ms_per_char).clamp(MIN_DURATION_MS, max)
    }

    fn render_tone(&self, duration_ms: u64) -> Vec<u8> {
        let sample_rate = self.config.sample_rate;
        let num_samples = (sample_rate as u64 * duration_ms / 1000) as usize;
        let samples: Vec<i16> = (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                ((2.0 * PI * 440.0 * t).sin() * 0.2 * i16::MAX as f32) as i16
            })
            .collect();
        encode_pcm16_wav(&samples, sample_rate, 1)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        tracing::debug!(
            request_id = %request.request_id,
            text_len = request.text.len(),
            voice = %request.voice,
            "FakeTtsClient: rendering tone"
        );

        // 模拟推理延迟
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        let duration_ms = self.duration_for(&request.text);
        Ok(InferResponse {
            audio_data: self.render_tone(duration_ms),
            duration_ms: Some(duration_ms),
            sample_rate: Some(self.config.sample_rate),
        })
    }
}
