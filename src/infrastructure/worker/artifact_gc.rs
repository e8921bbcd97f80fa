//! Artifact GC Worker - 定时清理过期音频产物

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::application::ports::{AudioStoragePort, GcPolicy};

/// GC Worker 配置
#[derive(Debug, Clone)]
pub struct ArtifactGcConfig {
    /// GC 间隔
    pub interval: Duration,
    /// 清理策略
    pub policy: GcPolicy,
}

/// 产物 GC Worker
pub struct ArtifactGcWorker {
    config: ArtifactGcConfig,
    storage: Arc<dyn AudioStoragePort>,
    shutdown: watch::Receiver<bool>,
}

impl ArtifactGcWorker {
    pub fn new(
        config: ArtifactGcConfig,
        storage: Arc<dyn AudioStoragePort>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            storage,
            shutdown,
        }
    }

    /// 启动 Worker，直到收到关闭信号
    pub async fn run(mut self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = self.config.policy.max_age.as_secs(),
            max_artifacts = self.config.policy.max_artifacts,
            "ArtifactGcWorker started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.run_once().await,
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("ArtifactGcWorker stopped");
    }

    async fn run_once(&self) {
        if let Err(e) = self.storage.gc(&self.config.policy).await {
            tracing::error!(error = %e, "Audio GC failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::{ArtifactName, ArtifactNaming};
    use crate::infrastructure::adapters::FileAudioStorage;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_worker_collects_then_stops() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(
            FileAudioStorage::new(
                temp_dir.path(),
                ArtifactNaming::Unique,
                ArtifactName::parse("response.wav").unwrap(),
            )
            .await
            .unwrap(),
        );
        let name = storage.allocate_name();
        storage.save(&name, b"old").await.unwrap();

        let (tx, rx) = watch::channel(false);
        let worker = ArtifactGcWorker::new(
            ArtifactGcConfig {
                interval: Duration::from_millis(10),
                policy: GcPolicy {
                    max_age: Duration::ZERO,
                    max_artifacts: 10,
                },
            },
            storage.clone(),
            rx,
        );
        let handle = tokio::spawn(worker.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(storage.open(&name).await.is_err());

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
