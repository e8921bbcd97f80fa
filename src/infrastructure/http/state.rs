//! Application State
//!
//! 持有端口实例与命令/查询处理器，以 `Arc<AppState>` 注入路由

use std::sync::Arc;

use crate::application::{
    AskHandler, AudioInspectorPort, AudioStoragePort, GetAudioHandler, TextGeneratorPort,
    TtsEnginePort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub text_generator: Arc<dyn TextGeneratorPort>,
    pub tts_engine: Arc<dyn TtsEnginePort>,
    pub audio_storage: Arc<dyn AudioStoragePort>,

    // ========== Command Handlers ==========
    pub ask_handler: AskHandler,

    // ========== Query Handlers ==========
    pub get_audio_handler: GetAudioHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `voice` 为固定音色，每次合成都使用同一个
    pub fn new(
        text_generator: Arc<dyn TextGeneratorPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        audio_inspector: Arc<dyn AudioInspectorPort>,
        audio_storage: Arc<dyn AudioStoragePort>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            text_generator: text_generator.clone(),
            tts_engine: tts_engine.clone(),
            audio_storage: audio_storage.clone(),

            ask_handler: AskHandler::new(
                text_generator,
                tts_engine,
                audio_inspector,
                audio_storage.clone(),
                voice,
            ),

            get_audio_handler: GetAudioHandler::new(audio_storage),
        }
    }
}
