//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, Backend};
use crate::domain::audio::ArtifactName;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXREPLY_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOXREPLY_SERVER__PORT=8000`
/// - `VOXREPLY_LLM__URL=http://tgi:8080`
/// - `VOXREPLY_TTS__BACKEND=fake`
/// - `VOXREPLY_STORAGE__NAMING=unique`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("llm.backend", "http")?
        .set_default("llm.url", "http://localhost:8080")?
        .set_default("llm.timeout_secs", 120)?
        .set_default("llm.max_new_tokens", 100)?
        .set_default("tts.backend", "http")?
        .set_default("tts.url", "http://localhost:8001")?
        .set_default("tts.timeout_secs", 300)?
        .set_default("tts.voice", "random")?
        .set_default("inference.max_concurrent", 2)?
        .set_default("storage.audio_dir", "static/audio")?
        .set_default("storage.naming", "shared")?
        .set_default("gc.enabled", true)?
        .set_default("gc.interval_secs", 600)?
        .set_default("gc.max_age_secs", 3600)?
        .set_default("gc.max_artifacts", 100)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: VOXREPLY_LLM__MAX_NEW_TOKENS=200
    builder = builder.add_source(
        Environment::with_prefix("VOXREPLY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.llm.backend == Backend::Http && config.llm.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM URL cannot be empty when backend is http".to_string(),
        ));
    }

    if config.llm.max_new_tokens == 0 {
        return Err(ConfigError::ValidationError(
            "LLM max_new_tokens must be greater than 0".to_string(),
        ));
    }

    if config.tts.backend == Backend::Http && config.tts.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty when backend is http".to_string(),
        ));
    }

    if config.inference.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Inference max_concurrent must be greater than 0".to_string(),
        ));
    }

    if config.storage.audio_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Audio directory cannot be empty".to_string(),
        ));
    }

    ArtifactName::parse(&config.storage.shared_file_name).map_err(|e| {
        ConfigError::ValidationError(format!(
            "Invalid shared_file_name '{}': {}",
            config.storage.shared_file_name, e
        ))
    })?;

    if config.gc.enabled && config.gc.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "GC interval cannot be 0 when GC is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if let Some(dir) = config.server.static_dir() {
        tracing::info!("Static Files: {:?}", dir);
    }
    tracing::info!("LLM Backend: {} ({})", config.llm.backend, config.llm.url);
    tracing::info!("LLM Timeout: {}s", config.llm.timeout_secs);
    tracing::info!("LLM Max New Tokens: {}", config.llm.max_new_tokens);
    tracing::info!("TTS Backend: {} ({})", config.tts.backend, config.tts.url);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("TTS Voice: {}", config.tts.voice);
    tracing::info!("Inference Max Concurrent: {}", config.inference.max_concurrent);
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("Artifact Naming: {}", config.storage.naming);
    tracing::info!("GC Enabled: {}", config.gc.enabled);
    if config.gc.enabled {
        tracing::info!("GC Interval: {}s", config.gc.interval_secs);
        tracing::info!("GC Max Age: {}s", config.gc.max_age_secs);
        tracing::info!("GC Max Artifacts: {}", config.gc.max_artifacts);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::ArtifactNaming;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_llm_url() {
        let mut config = AppConfig::default();
        config.llm.url = String::new();
        assert!(validate_config(&config).is_err());

        // fake 后端不需要 URL
        config.llm.backend = Backend::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = AppConfig::default();
        config.tts.url = "   ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_concurrency() {
        let mut config = AppConfig::default();
        config.inference.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_shared_name() {
        let mut config = AppConfig::default();
        config.storage.shared_file_name = "../response.wav".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_gc_interval() {
        let mut config = AppConfig::default();
        config.gc.interval_secs = 0;
        assert!(validate_config(&config).is_err());

        config.gc.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[llm]
backend = "fake"

[storage]
naming = "unique"
audio_dir = "/tmp/voxreply-audio"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.backend, Backend::Fake);
        assert_eq!(config.tts.backend, Backend::Http);
        assert_eq!(config.storage.naming, ArtifactNaming::Unique);
        assert_eq!(config.llm.max_new_tokens, 100);
    }

    #[test]
    fn test_load_rejects_unknown_backend() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[tts]\nbackend = \"grpc\"").unwrap();

        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
