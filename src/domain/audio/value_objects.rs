//! Audio Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AudioError;

/// 音频检索路由前缀
pub const AUDIO_ROUTE_PREFIX: &str = "/api/audio";

/// 共享槽位的默认文件名
pub const DEFAULT_SHARED_FILE_NAME: &str = "response.wav";

/// 每请求唯一产物的文件名前缀
const GENERATED_PREFIX: &str = "response-";

const MAX_NAME_LEN: usize = 255;

/// 产物命名策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactNaming {
    /// 所有请求写入同一个文件，后写覆盖先写
    #[default]
    Shared,
    /// 每个请求写入 `response-<uuid>.wav`
    Unique,
}

impl std::fmt::Display for ArtifactNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactNaming::Shared => write!(f, "shared"),
            ArtifactNaming::Unique => write!(f, "unique"),
        }
    }
}

/// 音频产物文件名
///
/// 不变量:
/// - 单个路径段（不含 `/`、`\`、NUL）
/// - 非空、不超过 255 字节
/// - 不以 `.` 开头（排除 `.`、`..`、隐藏文件和写入中的临时文件）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn parse(name: impl Into<String>) -> Result<Self, AudioError> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(AudioError::InvalidName(name));
        }
        if name.starts_with('.') {
            return Err(AudioError::InvalidName(name));
        }
        if name.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
            return Err(AudioError::InvalidName(name));
        }
        Ok(Self(name))
    }

    /// 生成新的唯一产物名
    pub fn generate() -> Self {
        Self(format!("{}{}.wav", GENERATED_PREFIX, Uuid::new_v4().simple()))
    }

    /// 是否为 [`ArtifactName::generate`] 生成的名称（GC 只清理这类文件）
    pub fn is_generated(&self) -> bool {
        self.0
            .strip_prefix(GENERATED_PREFIX)
            .and_then(|rest| rest.strip_suffix(".wav"))
            .map_or(false, |id| {
                id.len() == 32 && id.chars().all(|c| c.is_ascii_hexdigit())
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.0
            .rsplit_once('.')
            .and_then(|(_, ext)| AudioFormat::from_extension(ext))
    }

    /// 服务端相对检索路径，如 `/api/audio/response.wav`
    pub fn reference(&self) -> String {
        format!("{}/{}", AUDIO_ROUTE_PREFIX, self.0)
    }
}

impl std::fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
        }
    }
}

/// 已落盘的音频产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub name: ArtifactName,
    pub size_bytes: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_ms: u64,
}

impl AudioArtifact {
    pub fn reference(&self) -> String {
        self.name.reference()
    }
}
