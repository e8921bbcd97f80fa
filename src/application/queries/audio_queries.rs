//! Audio Queries - 音频查询

use std::path::PathBuf;
use std::time::SystemTime;
use tokio::fs::File;

use crate::domain::audio::ArtifactName;

/// 获取音频查询
///
/// `filename` 为客户端提供的原始路径段，由处理器校验
#[derive(Debug, Clone)]
pub struct GetAudioQuery {
    pub filename: String,
}

/// 获取音频响应
///
/// `size_bytes` 和 `modified` 与 `file` 来自同一个句柄
#[derive(Debug)]
pub struct GetAudioResponse {
    pub name: ArtifactName,
    /// 已确认位于音频目录内的真实路径
    pub path: PathBuf,
    pub file: File,
    pub size_bytes: u64,
    pub modified: Option<SystemTime>,
    pub content_type: &'static str,
}
