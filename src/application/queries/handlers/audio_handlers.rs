//! Audio Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::AudioStoragePort;
use crate::application::queries::audio_queries::{GetAudioQuery, GetAudioResponse};
use crate::domain::audio::ArtifactName;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// GetAudio Handler - 定位音频文件
///
/// 目录下任意合法文件名都可检索，不限于最近一次生成的产物
pub struct GetAudioHandler {
    audio_storage: Arc<dyn AudioStoragePort>,
}

impl GetAudioHandler {
    pub fn new(audio_storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { audio_storage }
    }

    pub async fn handle(&self, query: GetAudioQuery) -> Result<GetAudioResponse, ApplicationError> {
        let name = ArtifactName::parse(query.filename)?;
        let stored = self.audio_storage.open(&name).await?;

        let content_type = name
            .format()
            .map(|f| f.content_type())
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        Ok(GetAudioResponse {
            name,
            path: stored.path,
            file: stored.file,
            size_bytes: stored.size_bytes,
            modified: stored.modified,
            content_type,
        })
    }
}
