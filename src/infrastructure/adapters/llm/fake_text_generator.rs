//! Fake Text Generator - 用于测试和本地演示的文本生成器
//!
//! 不调用任何模型，根据提示词拼出确定性的回答

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{
    GenerateRequest, GenerateResponse, GenerationError, TextGeneratorPort,
};

/// Fake Text Generator 配置
#[derive(Debug, Clone)]
pub struct FakeTextGeneratorConfig {
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeTextGeneratorConfig {
    fn default() -> Self {
        Self { latency_ms: 50 }
    }
}

/// Fake Text Generator
pub struct FakeTextGenerator {
    config: FakeTextGeneratorConfig,
}

impl FakeTextGenerator {
    pub fn new(config: FakeTextGeneratorConfig) -> Self {
        tracing::info!(latency_ms = config.latency_ms, "FakeTextGenerator initialized");
        Self { config }
    }
}

#[async_trait]
impl TextGeneratorPort for FakeTextGenerator {
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, GenerationError> {
        tracing::debug!(
            request_id = %request.request_id,
            prompt_len = request.prompt.len(),
            "FakeTextGenerator: composing answer"
        );

        // 模拟推理延迟
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        Ok(GenerateResponse {
            text: format!(
                "You asked: \"{}\". This answer was composed without a language model.",
                request.prompt.trim()
            ),
        })
    }
}
