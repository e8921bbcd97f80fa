//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait
//!
//! 目录布局:
//! - `<audio_dir>/response.wav`            共享槽位
//! - `<audio_dir>/response-<uuid>.wav`     每请求唯一产物
//! - `<audio_dir>/.<name>.tmp-<uuid>`      写入中的临时文件

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{
    AudioStorageError, AudioStoragePort, GcPolicy, GcResult, StorageStats, StoredArtifact,
};
use crate::domain::audio::{ArtifactName, ArtifactNaming};

/// 临时文件超过该时长视为残留
const TMP_GRACE: Duration = Duration::from_secs(300);

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 存储根目录（已规范化）
    base_dir: PathBuf,
    naming: ArtifactNaming,
    /// 共享槽位文件名
    shared_name: ArtifactName,
}

struct ArtifactEntry {
    path: PathBuf,
    modified: DateTime<Utc>,
    size: u64,
}

impl FileAudioStorage {
    /// 创建新的文件存储
    pub async fn new(
        base_dir: impl AsRef<Path>,
        naming: ArtifactNaming,
        shared_name: ArtifactName,
    ) -> Result<Self, AudioStorageError> {
        let base_dir = base_dir.as_ref();

        // 确保目录存在
        fs::create_dir_all(base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        let base_dir = fs::canonicalize(base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::info!(
            dir = %base_dir.display(),
            naming = %naming,
            shared_name = %shared_name,
            "Audio storage ready"
        );

        Ok(Self {
            base_dir,
            naming,
            shared_name,
        })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn tmp_path(&self, name: &ArtifactName) -> PathBuf {
        self.base_dir
            .join(format!(".{}.tmp-{}", name, Uuid::new_v4().simple()))
    }

    fn is_tmp_file(file_name: &str) -> bool {
        file_name.starts_with('.') && file_name.contains(".tmp-")
    }

    async fn list_files(&self) -> Result<Vec<(String, ArtifactEntry)>, AudioStorageError> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?
        {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            files.push((
                entry.file_name().to_string_lossy().to_string(),
                ArtifactEntry {
                    path: entry.path(),
                    modified,
                    size: metadata.len(),
                },
            ));
        }

        Ok(files)
    }

    async fn remove(&self, entry: &ArtifactEntry, result: &mut GcResult) {
        match fs::remove_file(&entry.path).await {
            Ok(()) => {
                result.deleted_files += 1;
                result.freed_bytes += entry.size;
            }
            // 并发 GC 或请求已删除
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %entry.path.display(),
                    error = %e,
                    "Failed to remove artifact"
                );
            }
        }
    }
}

fn age_of(modified: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - modified).to_std().unwrap_or(Duration::ZERO)
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    fn allocate_name(&self) -> ArtifactName {
        match self.naming {
            ArtifactNaming::Shared => self.shared_name.clone(),
            ArtifactNaming::Unique => ArtifactName::generate(),
        }
    }

    async fn save(&self, name: &ArtifactName, data: &[u8]) -> Result<PathBuf, AudioStorageError> {
        let tmp_path = self.tmp_path(name);
        let audio_path = self.base_dir.join(name.as_str());

        // 先写临时文件再 rename，读者不会看到写了一半的文件
        if let Err(e) = fs::write(&tmp_path, data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AudioStorageError::IoError(e.to_string()));
        }
        if let Err(e) = fs::rename(&tmp_path, &audio_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AudioStorageError::IoError(e.to_string()));
        }

        tracing::debug!("Saved audio: name={}, size={} bytes", name, data.len());

        Ok(audio_path)
    }

    async fn open(&self, name: &ArtifactName) -> Result<StoredArtifact, AudioStorageError> {
        let requested = self.base_dir.join(name.as_str());

        let resolved = match fs::canonicalize(&requested).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AudioStorageError::FileNotFound(name.to_string()));
            }
            Err(e) => return Err(AudioStorageError::IoError(e.to_string())),
        };

        // 符号链接等可能指向目录之外
        if !resolved.starts_with(&self.base_dir) {
            tracing::warn!(
                name = %name,
                resolved = %resolved.display(),
                "Rejected audio path outside storage directory"
            );
            return Err(AudioStorageError::OutsideRoot(name.to_string()));
        }

        // 只打开一次，大小和修改时间都从这个句柄读取
        let file = match fs::File::open(&resolved).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AudioStorageError::FileNotFound(name.to_string()));
            }
            Err(e) => return Err(AudioStorageError::IoError(e.to_string())),
        };
        let metadata = file
            .metadata()
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;
        if !metadata.is_file() {
            return Err(AudioStorageError::FileNotFound(name.to_string()));
        }

        Ok(StoredArtifact {
            path: resolved,
            file,
            size_bytes: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    async fn get_stats(&self) -> Result<StorageStats, AudioStorageError> {
        let mut stats = StorageStats::default();
        for (file_name, entry) in self.list_files().await? {
            if Self::is_tmp_file(&file_name) {
                continue;
            }
            stats.file_count += 1;
            stats.used_bytes += entry.size;
        }
        Ok(stats)
    }

    async fn gc(&self, policy: &GcPolicy) -> Result<GcResult, AudioStorageError> {
        let now = Utc::now();
        let mut result = GcResult::default();
        let mut generated = Vec::new();

        for (file_name, entry) in self.list_files().await? {
            if Self::is_tmp_file(&file_name) {
                if age_of(entry.modified, now) >= TMP_GRACE {
                    self.remove(&entry, &mut result).await;
                }
                continue;
            }
            // 共享槽位和其他手工放入的文件不参与 GC
            let is_generated = ArtifactName::parse(file_name.as_str())
                .map(|n| n.is_generated())
                .unwrap_or(false);
            if is_generated {
                generated.push(entry);
            }
        }

        // 新的在前
        generated.sort_by(|a, b| b.modified.cmp(&a.modified));

        for (index, entry) in generated.iter().enumerate() {
            let expired = age_of(entry.modified, now) >= policy.max_age;
            let over_count = index >= policy.max_artifacts;
            if expired || over_count {
                self.remove(entry, &mut result).await;
            }
        }

        if result.deleted_files > 0 {
            tracing::info!(
                deleted_files = result.deleted_files,
                freed_bytes = result.freed_bytes,
                "Audio GC completed"
            );
        }

        Ok(result)
    }
}
