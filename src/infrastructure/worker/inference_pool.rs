//! Inference Pool - 有界推理执行池
//!
//! 所有模型调用都经由该池执行：
//! - 使用 semaphore 限制全进程同时进行的推理数
//! - 每次调用在独立任务中运行，请求任务只等待结果
//! - 客户端断开不会中止已开始的推理

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::application::ports::{
    GenerateRequest, GenerateResponse, GenerationError, InferRequest, InferResponse,
    TextGeneratorPort, TtsEnginePort, TtsError,
};

/// 执行池错误
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("inference pool is closed")]
    Closed,

    #[error("inference task panicked: {0}")]
    Panicked(String),
}

/// 推理执行池
pub struct InferencePool {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl InferencePool {
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        tracing::info!(max_concurrent = max_concurrent, "InferencePool started");
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// 正在执行的推理数
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.semaphore.available_permits()
    }

    /// 在池中执行一个推理任务
    pub async fn run<F, T>(&self, stage: &'static str, job: F) -> Result<T, PoolError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;

        tracing::trace!(stage = stage, in_flight = self.in_flight(), "Inference permit acquired");

        let handle = tokio::spawn(async move {
            let _permit = permit; // 持有 permit 直到任务完成
            job.await
        });

        handle.await.map_err(|e| {
            tracing::error!(stage = stage, error = %e, "Inference task failed to complete");
            PoolError::Panicked(e.to_string())
        })
    }
}

/// 经由执行池调用的文本生成器
pub struct PooledTextGenerator {
    inner: Arc<dyn TextGeneratorPort>,
    pool: Arc<InferencePool>,
}

impl PooledTextGenerator {
    pub fn new(inner: Arc<dyn TextGeneratorPort>, pool: Arc<InferencePool>) -> Self {
        Self { inner, pool }
    }
}

#[async_trait]
impl TextGeneratorPort for PooledTextGenerator {
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, GenerationError> {
        let inner = self.inner.clone();
        self.pool
            .run("generate", async move { inner.generate(request).await })
            .await
            .map_err(|e| GenerationError::Aborted(e.to_string()))?
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }
}

/// 经由执行池调用的 TTS 引擎
pub struct PooledTtsEngine {
    inner: Arc<dyn TtsEnginePort>,
    pool: Arc<InferencePool>,
}

impl PooledTtsEngine {
    pub fn new(inner: Arc<dyn TtsEnginePort>, pool: Arc<InferencePool>) -> Self {
        Self { inner, pool }
    }
}

#[async_trait]
impl TtsEnginePort for PooledTtsEngine {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        let inner = self.inner.clone();
        self.pool
            .run("synthesize", async move { inner.infer(request).await })
            .await
            .map_err(|e| TtsError::Aborted(e.to_string()))?
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_never_exceeds_max_concurrent() {
        let pool = Arc::new(InferencePool::new(2));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let jobs = (0..8).map(|_| {
            let pool = pool.clone();
            let running = running.clone();
            let peak = peak.clone();
            async move {
                pool.run("test", async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
                .await
            }
        });

        let results = futures_util::future::join_all(jobs).await;
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_job_survives_dropped_caller() {
        let pool = Arc::new(InferencePool::new(1));
        let finished = Arc::new(AtomicUsize::new(0));

        let flag = finished.clone();
        let caller = {
            let pool = pool.clone();
            tokio::spawn(async move {
                pool.run("test", async move {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    flag.fetch_add(1, Ordering::SeqCst);
                })
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        caller.abort();

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_job_is_reported() {
        let pool = InferencePool::new(1);
        let result = pool
            .run("test", async {
                if true {
                    panic!("model exploded");
                }
            })
            .await;
        assert!(matches!(result, Err(PoolError::Panicked(_))));
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_zero_is_clamped_to_one() {
        let pool = InferencePool::new(0);
        let result = tokio::time::timeout(Duration::from_secs(1), pool.run("test", async { 7 }))
            .await
            .unwrap();
        assert_eq!(result.unwrap(), 7);
    }
}
