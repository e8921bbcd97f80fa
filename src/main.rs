//! VoxReply - 文本问答 + 语音合成服务
//!
//! 启动流程：加载配置 → 初始化日志 → 构建适配器 → 启动 GC → 启动 HTTP 服务

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use voxreply::application::{AudioStoragePort, TextGeneratorPort, TtsEnginePort};
use voxreply::config::{
    load_config, print_config, AppConfig, Backend, LlmConfig, LogConfig, TtsConfig,
};
use voxreply::domain::audio::ArtifactName;
use voxreply::infrastructure::adapters::{
    FakeTextGenerator, FakeTextGeneratorConfig, FakeTtsClient, FakeTtsClientConfig,
    FileAudioStorage, HttpTextGenerator, HttpTextGeneratorConfig, HttpTtsClient,
    HttpTtsClientConfig, WavInspector,
};
use voxreply::infrastructure::http::{AppState, HttpServer, HttpServerConfig};
use voxreply::infrastructure::worker::{
    ArtifactGcConfig, ArtifactGcWorker, InferencePool, PooledTextGenerator, PooledTtsEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("VoxReply - text answer + speech synthesis");
    print_config(&config);

    // 推理执行池：两个模型共享同一组许可
    let pool = Arc::new(InferencePool::new(config.inference.max_concurrent));
    let text_generator: Arc<dyn TextGeneratorPort> = Arc::new(PooledTextGenerator::new(
        build_text_generator(&config.llm)?,
        pool.clone(),
    ));
    let tts_engine: Arc<dyn TtsEnginePort> = Arc::new(PooledTtsEngine::new(
        build_tts_engine(&config.tts)?,
        pool,
    ));

    let audio_storage: Arc<dyn AudioStoragePort> = Arc::new(build_storage(&config).await?);

    // GC Worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let gc_handle = if config.gc.enabled {
        let worker = ArtifactGcWorker::new(
            ArtifactGcConfig {
                interval: config.gc.interval(),
                policy: config.gc.policy(),
            },
            audio_storage.clone(),
            shutdown_rx,
        );
        Some(tokio::spawn(worker.run()))
    } else {
        None
    };

    let state = AppState::new(
        text_generator,
        tts_engine,
        Arc::new(WavInspector::new()),
        audio_storage,
        config.tts.voice.clone(),
    );
    let server = HttpServer::new(HttpServerConfig::from(&config.server), state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = gc_handle {
        let _ = handle.await;
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，`RUST_LOG` 优先于配置文件
fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},voxreply={},tower_http=debug", log.level, log.level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_text_generator(config: &LlmConfig) -> anyhow::Result<Arc<dyn TextGeneratorPort>> {
    let generator: Arc<dyn TextGeneratorPort> = match config.backend {
        Backend::Http => {
            let llm_config = HttpTextGeneratorConfig {
                base_url: config.url.clone(),
                timeout_secs: config.timeout_secs,
                max_new_tokens: config.max_new_tokens,
                return_full_text: config.return_full_text,
                temperature: config.temperature,
            };
            Arc::new(HttpTextGenerator::new(llm_config)?)
        }
        Backend::Fake => Arc::new(FakeTextGenerator::new(FakeTextGeneratorConfig::default())),
    };
    Ok(generator)
}

fn build_tts_engine(config: &TtsConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    let engine: Arc<dyn TtsEnginePort> = match config.backend {
        Backend::Http => Arc::new(HttpTtsClient::new(
            HttpTtsClientConfig::new(&config.url).with_timeout(config.timeout_secs),
        )?),
        Backend::Fake => Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default())),
    };
    Ok(engine)
}

async fn build_storage(config: &AppConfig) -> anyhow::Result<FileAudioStorage> {
    let shared_name = ArtifactName::parse(config.storage.shared_file_name.as_str())?;
    let storage = FileAudioStorage::new(
        &config.storage.audio_dir,
        config.storage.naming,
        shared_name,
    )
    .await?;
    Ok(storage)
}
