//! Ask Command Handlers
//!
//! 请求流水线：校验 → 文本生成 → 语音合成 → 音频校验 → 落盘 → 组装响应

use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::ask_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioInspectorPort, AudioStoragePort, GenerateRequest, InferRequest, TextGeneratorPort,
    TtsEnginePort,
};
use crate::domain::ask::{Answer, Query, RequestId};
use crate::domain::audio::AudioArtifact;

/// Ask Handler - 处理一次问答请求
///
/// 两个模型调用严格串行（语音合成依赖生成的文本），不做缓存，
/// 相同查询每次都会重新调用两个模型
pub struct AskHandler {
    text_generator: Arc<dyn TextGeneratorPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    audio_inspector: Arc<dyn AudioInspectorPort>,
    audio_storage: Arc<dyn AudioStoragePort>,
    /// 固定音色策略
    voice: String,
}

impl AskHandler {
    pub fn new(
        text_generator: Arc<dyn TextGeneratorPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        audio_inspector: Arc<dyn AudioInspectorPort>,
        audio_storage: Arc<dyn AudioStoragePort>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            text_generator,
            tts_engine,
            audio_inspector,
            audio_storage,
            voice: voice.into(),
        }
    }

    pub async fn handle(&self, cmd: AskCommand) -> Result<AskResponse, ApplicationError> {
        let query = Query::parse(cmd.query)?;
        let request_id = RequestId::new();
        let started = Instant::now();

        tracing::info!(
            request_id = %request_id,
            query_chars = query.char_count(),
            "Ask request accepted"
        );

        let answer = self.generate(&request_id, &query).await?;
        let artifact = self.synthesize(&request_id, &answer).await?;

        tracing::info!(
            request_id = %request_id,
            answer_chars = answer.as_str().chars().count(),
            artifact = %artifact.name,
            audio_bytes = artifact.size_bytes,
            duration_ms = artifact.duration_ms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ask request completed"
        );

        Ok(AskResponse {
            request_id,
            answer: answer.into_inner(),
            audio: artifact.reference(),
            artifact,
        })
    }

    /// 文本生成
    async fn generate(
        &self,
        request_id: &RequestId,
        query: &Query,
    ) -> Result<Answer, ApplicationError> {
        let started = Instant::now();
        let response = self
            .text_generator
            .generate(GenerateRequest {
                prompt: query.as_str().to_string(),
                request_id: request_id.to_string(),
            })
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Text generation failed");
                e
            })?;

        tracing::debug!(
            request_id = %request_id,
            text_len = response.text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Text generated"
        );

        Ok(Answer::new(response.text)?)
    }

    /// 语音合成并落盘
    async fn synthesize(
        &self,
        request_id: &RequestId,
        answer: &Answer,
    ) -> Result<AudioArtifact, ApplicationError> {
        let started = Instant::now();
        let response = self
            .tts_engine
            .infer(InferRequest {
                text: answer.as_str().to_string(),
                voice: self.voice.clone(),
                request_id: request_id.to_string(),
            })
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Speech synthesis failed");
                e
            })?;

        let reported_sample_rate = response.sample_rate;
        let audio_data = response.audio_data;

        // 解码校验放到阻塞线程池，避免占用请求任务
        let inspector = self.audio_inspector.clone();
        let (audio_data, info) = tokio::task::spawn_blocking(move || {
            let info = inspector.inspect(&audio_data);
            (audio_data, info)
        })
        .await
        .map_err(|e| ApplicationError::inference(format!("audio inspection aborted: {}", e)))?;
        let info = info?;

        if let Some(rate) = reported_sample_rate {
            if rate != info.sample_rate {
                tracing::warn!(
                    request_id = %request_id,
                    reported = rate,
                    decoded = info.sample_rate,
                    "TTS sample rate header disagrees with audio"
                );
            }
        }

        let name = self.audio_storage.allocate_name();
        let path = self.audio_storage.save(&name, &audio_data).await?;

        tracing::debug!(
            request_id = %request_id,
            path = %path.display(),
            size = audio_data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Speech synthesized and stored"
        );

        Ok(AudioArtifact {
            name,
            size_bytes: audio_data.len() as u64,
            sample_rate: info.sample_rate,
            channels: info.channels,
            duration_ms: info.duration_ms,
        })
    }
}
