//! HTTP Text Generator - 调用外部文本生成推理服务
//!
//! 实现 TextGeneratorPort trait，接口兼容 text-generation-inference:
//! POST http://localhost:8080/generate
//! Request: {"inputs": "...", "parameters": {"max_new_tokens": 100, ...}}
//! Response: {"generated_text": "..."} 或 [{"generated_text": "..."}]

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    GenerateRequest, GenerateResponse, GenerationError, TextGeneratorPort,
};

/// 生成请求体 (JSON)
#[derive(Debug, Serialize)]
struct GenerateHttpRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    return_full_text: bool,
    do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

/// 服务可能返回单个对象，也可能返回序列数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateHttpResponse {
    Single(Generation),
    Batch(Vec<Generation>),
}

impl GenerateHttpResponse {
    /// 只取第一条序列
    fn into_first(self) -> Option<String> {
        match self {
            Self::Single(g) => Some(g.generated_text),
            Self::Batch(list) => list.into_iter().next().map(|g| g.generated_text),
        }
    }
}

/// HTTP 文本生成客户端配置
#[derive(Debug, Clone)]
pub struct HttpTextGeneratorConfig {
    /// 推理服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 最大生成 token 数
    pub max_new_tokens: u32,
    /// 是否在结果中包含提示词
    pub return_full_text: bool,
    /// 采样温度，None 表示贪心解码
    pub temperature: Option<f32>,
}

impl Default for HttpTextGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 120,
            max_new_tokens: 100,
            return_full_text: true,
            temperature: None,
        }
    }
}

/// HTTP 文本生成客户端
///
/// 启动时构建一次，所有请求共享同一个连接池
pub struct HttpTextGenerator {
    client: Client,
    config: HttpTextGeneratorConfig,
}

impl HttpTextGenerator {
    pub fn new(config: HttpTextGeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!("{}/generate", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGeneratorPort for HttpTextGenerator {
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, GenerationError> {
        let body = GenerateHttpRequest {
            inputs: &request.prompt,
            parameters: GenerateParameters {
                max_new_tokens: self.config.max_new_tokens,
                return_full_text: self.config.return_full_text,
                do_sample: self.config.temperature.is_some(),
                temperature: self.config.temperature,
            },
        };

        tracing::debug!(
            url = %self.generate_url(),
            request_id = %request.request_id,
            prompt_len = request.prompt.len(),
            max_new_tokens = self.config.max_new_tokens,
            "Sending text generation request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else if e.is_connect() {
                    GenerationError::NetworkError(format!(
                        "Cannot connect to generation service: {}",
                        e
                    ))
                } else {
                    GenerationError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: GenerateHttpResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::InvalidResponse(format!("Failed to parse generation: {}", e))
            }
        })?;

        let text = parsed.into_first().ok_or_else(|| {
            GenerationError::InvalidResponse("Generation list is empty".to_string())
        })?;

        tracing::info!(
            request_id = %request.request_id,
            text_len = text.len(),
            "Text generation completed"
        );

        Ok(GenerateResponse { text })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
