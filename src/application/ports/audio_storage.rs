//! Audio Storage Port - 出站端口
//!
//! 定义音频产物存储、检索和 GC 的抽象接口

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio::fs::File;

use crate::domain::audio::ArtifactName;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Path escapes audio directory: {0}")]
    OutsideRoot(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// GC 策略
#[derive(Debug, Clone)]
pub struct GcPolicy {
    /// 产物最长保留时间，达到即清理
    pub max_age: Duration,
    /// 最多保留的产物数量（保留最新的）
    pub max_artifacts: usize,
}

impl Default for GcPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(3600), // 1 小时
            max_artifacts: 100,
        }
    }
}

/// 存储统计
#[derive(Debug, Clone, Default)]
pub struct StorageStats {
    /// 已使用空间（字节）
    pub used_bytes: u64,
    /// 文件数量
    pub file_count: u64,
}

/// 已打开的产物文件
///
/// 大小和修改时间取自 `file` 句柄本身，同名文件随后被替换也不影响
#[derive(Debug)]
pub struct StoredArtifact {
    /// 位于音频目录内的真实路径
    pub path: PathBuf,
    pub file: File,
    pub size_bytes: u64,
    pub modified: Option<SystemTime>,
}

/// GC 结果
#[derive(Debug, Clone, Default)]
pub struct GcResult {
    /// 删除的文件数量
    pub deleted_files: u64,
    /// 释放的空间（字节）
    pub freed_bytes: u64,
}

/// Audio Storage Port - 出站端口
///
/// 管理静态音频目录中的产物文件
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 为一次新的合成分配产物名
    fn allocate_name(&self) -> ArtifactName;

    /// 写入产物（原子替换同名文件）
    async fn save(&self, name: &ArtifactName, data: &[u8]) -> Result<PathBuf, AudioStorageError>;

    /// 打开产物文件，保证位于音频目录之内且是普通文件
    async fn open(&self, name: &ArtifactName) -> Result<StoredArtifact, AudioStorageError>;

    /// 获取存储统计
    async fn get_stats(&self) -> Result<StorageStats, AudioStorageError>;

    /// 执行垃圾回收
    async fn gc(&self, policy: &GcPolicy) -> Result<GcResult, AudioStorageError>;
}
