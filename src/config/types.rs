//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::GcPolicy;
use crate::domain::audio::{ArtifactNaming, DEFAULT_SHARED_FILE_NAME};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 文本生成引擎配置
    #[serde(default)]
    pub llm: LlmConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 推理执行池配置
    #[serde(default)]
    pub inference: InferenceConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// GC 配置
    #[serde(default)]
    pub gc: GcConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 推理后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// 调用外部 HTTP 推理服务
    #[default]
    Http,
    /// 进程内假实现（测试 / 演示）
    Fake,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Http => write!(f, "http"),
            Backend::Fake => write!(f, "fake"),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置（前端页面）
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_enabled() -> bool {
    false
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend/dist")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 启用时返回静态文件目录
    pub fn static_dir(&self) -> Option<PathBuf> {
        self.static_files
            .enabled
            .then(|| self.static_files.dir.clone())
    }
}

/// 文本生成引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// 后端类型
    #[serde(default)]
    pub backend: Backend,

    /// 推理服务基础 URL
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// 最大生成 token 数
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// 生成结果是否包含提示词
    #[serde(default = "default_return_full_text")]
    pub return_full_text: bool,

    /// 采样温度，不设置则贪心解码
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_llm_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_max_new_tokens() -> u32 {
    100
}

fn default_return_full_text() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            url: default_llm_url(),
            timeout_secs: default_llm_timeout(),
            max_new_tokens: default_max_new_tokens(),
            return_full_text: default_return_full_text(),
            temperature: None,
        }
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 后端类型
    #[serde(default)]
    pub backend: Backend,

    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 固定音色
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_tts_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_tts_timeout() -> u64 {
    300
}

fn default_voice() -> String {
    "random".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            voice: default_voice(),
        }
    }
}

/// 推理执行池配置
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// 最大并发推理数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    2
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音频存储目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// 产物命名策略: shared / unique
    #[serde(default)]
    pub naming: ArtifactNaming,

    /// 共享槽位文件名
    #[serde(default = "default_shared_file_name")]
    pub shared_file_name: String,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("static/audio")
}

fn default_shared_file_name() -> String {
    DEFAULT_SHARED_FILE_NAME.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            naming: ArtifactNaming::default(),
            shared_file_name: default_shared_file_name(),
        }
    }
}

/// GC（垃圾回收）配置
#[derive(Debug, Clone, Deserialize)]
pub struct GcConfig {
    /// 是否启用自动 GC
    #[serde(default = "default_gc_enabled")]
    pub enabled: bool,

    /// GC 间隔时间（秒）
    #[serde(default = "default_gc_interval")]
    pub interval_secs: u64,

    /// 产物最长保留时间（秒）
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// 最多保留的产物数量
    #[serde(default = "default_max_artifacts")]
    pub max_artifacts: usize,
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    600 // 10 分钟
}

fn default_max_age() -> u64 {
    3600 // 1 小时
}

fn default_max_artifacts() -> usize {
    100
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: default_gc_enabled(),
            interval_secs: default_gc_interval(),
            max_age_secs: default_max_age(),
            max_artifacts: default_max_artifacts(),
        }
    }
}

impl GcConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn policy(&self) -> GcPolicy {
        GcPolicy {
            max_age: Duration::from_secs(self.max_age_secs),
            max_artifacts: self.max_artifacts,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.url, "http://localhost:8080");
        assert_eq!(config.llm.max_new_tokens, 100);
        assert_eq!(config.tts.voice, "random");
        assert_eq!(config.storage.naming, ArtifactNaming::Shared);
        assert_eq!(config.storage.shared_file_name, "response.wav");
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
        assert_eq!(config.static_dir(), None);
    }

    #[test]
    fn test_gc_policy() {
        let policy = GcConfig::default().policy();
        assert_eq!(policy.max_age, Duration::from_secs(3600));
        assert_eq!(policy.max_artifacts, 100);
    }
}
