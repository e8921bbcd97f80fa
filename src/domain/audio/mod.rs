//! Audio Context - 音频产物限界上下文
//!
//! 职责:
//! - 音频产物命名与路径安全
//! - 产物命名策略（共享槽位 / 每请求唯一）
//! - 音频格式与检索路径

mod errors;
mod value_objects;

pub use errors::AudioError;
pub use value_objects::{
    ArtifactName, ArtifactNaming, AudioArtifact, AudioFormat, AUDIO_ROUTE_PREFIX,
    DEFAULT_SHARED_FILE_NAME,
};
