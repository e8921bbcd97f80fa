//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ask                POST  提交问题，生成回答与语音
//! - /api/audio/:filename    GET   获取音频文件
//! - /api/ping               GET   存活检查
//! - /api/health             GET   依赖服务与存储状态

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health))
        .route("/ask", post(handlers::ask))
        .route("/audio/:filename", get(handlers::get_audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::application::{
        AudioStoragePort, GenerateRequest, GenerateResponse, GenerationError, TextGeneratorPort,
        TtsEnginePort,
    };
    use crate::domain::audio::{ArtifactName, ArtifactNaming};
    use crate::infrastructure::adapters::{
        FakeTextGenerator, FakeTextGeneratorConfig, FakeTtsClient, FakeTtsClientConfig,
        FileAudioStorage, WavInspector,
    };

    struct FailingGenerator;

    #[async_trait]
    impl TextGeneratorPort for FailingGenerator {
        async fn generate(&self, _: GenerateRequest) -> Result<GenerateResponse, GenerationError> {
            Err(GenerationError::ServiceError("model unavailable".into()))
        }

        async fn health_check(&self) -> bool {
            false
        }
    }

    fn fake_generator() -> Arc<dyn TextGeneratorPort> {
        Arc::new(FakeTextGenerator::new(FakeTextGeneratorConfig { latency_ms: 0 }))
    }

    fn fake_tts() -> Arc<dyn TtsEnginePort> {
        Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            latency_ms: 0,
            ..Default::default()
        }))
    }

    fn shared_slot() -> ArtifactName {
        ArtifactName::parse("response.wav").unwrap()
    }

    async fn build_app_with_storage(
        dir: &TempDir,
        naming: ArtifactNaming,
        generator: Arc<dyn TextGeneratorPort>,
    ) -> (Router, Arc<FileAudioStorage>) {
        let storage = Arc::new(
            FileAudioStorage::new(dir.path(), naming, shared_slot())
                .await
                .unwrap(),
        );

        let state = AppState::new(
            generator,
            fake_tts(),
            Arc::new(WavInspector::new()),
            storage.clone(),
            "random",
        );

        (create_routes().with_state(Arc::new(state)), storage)
    }

    async fn build_app(
        dir: &TempDir,
        naming: ArtifactNaming,
        generator: Arc<dyn TextGeneratorPort>,
    ) -> Router {
        build_app_with_storage(dir, naming, generator).await.0
    }

    async fn ask(app: &Router, body: impl Into<Body>) -> Response {
        app.clone()
            .oneshot(
                Request::post("/api/ask")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_bytes(resp: Response) -> Vec<u8> {
        to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_ask_returns_answer_and_audio_reference() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        let resp = ask(&app, json!({"query": "What is the weather today?"}).to_string()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert!(!json["answer"].as_str().unwrap().is_empty());
        assert_eq!(json["audio"], "/api/audio/response.wav");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_query() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        let resp = ask(&app, json!({"query": ""}).to_string()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["errno"], 400);
        assert!(json["detail"].as_str().unwrap().contains("Invalid input"));

        let resp = ask(&app, json!({"query": "   "}).to_string()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ask_rejects_missing_or_malformed_query() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        for body in [
            "{}".to_string(),
            json!({"query": null}).to_string(),
            json!({"query": 42}).to_string(),
            "not json".to_string(),
        ] {
            let resp = ask(&app, body.clone()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            let json = body_json(resp).await;
            assert!(json["detail"].as_str().unwrap().contains("Invalid input"));
        }

        // 没有生成任何产物
        assert!(!dir.path().join("response.wav").exists());
    }

    #[tokio::test]
    async fn test_returned_audio_is_retrievable() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        let json = body_json(ask(&app, json!({"query": "Tell me a joke"}).to_string()).await).await;
        let audio = json["audio"].as_str().unwrap().to_string();

        let resp = get(&app, &audio).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");
        assert!(resp.headers().contains_key(header::ETAG));

        let bytes = body_bytes(resp).await;
        assert!(bytes.len() > 44);
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    #[tokio::test]
    async fn test_same_query_twice_conforms() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        for _ in 0..2 {
            let resp = ask(&app, json!({"query": "Hello"}).to_string()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let json = body_json(resp).await;
            assert!(json["answer"].is_string());
            assert!(json["audio"].as_str().unwrap().starts_with("/api/audio/"));
        }
    }

    #[tokio::test]
    async fn test_shared_slot_holds_most_recent_synthesis() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        ask(&app, json!({"query": "Hi"}).to_string()).await;
        let first = body_bytes(get(&app, "/api/audio/response.wav").await).await;

        ask(
            &app,
            json!({"query": "Please describe the history of the printing press"}).to_string(),
        )
        .await;
        let second = body_bytes(get(&app, "/api/audio/response.wav").await).await;

        // 假 TTS 的时长随文本长度增长
        assert!(second.len() > first.len());
        assert_eq!(
            second,
            std::fs::read(dir.path().join("response.wav")).unwrap()
        );
    }

    #[tokio::test]
    async fn test_unique_naming_keeps_each_artifact() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Unique, fake_generator()).await;

        let a = body_json(ask(&app, json!({"query": "one"}).to_string()).await).await;
        let b = body_json(ask(&app, json!({"query": "two"}).to_string()).await).await;

        let a = a["audio"].as_str().unwrap().to_string();
        let b = b["audio"].as_str().unwrap().to_string();
        assert_ne!(a, b);
        assert!(a.starts_with("/api/audio/response-"));

        assert_eq!(get(&app, &a).await.status(), StatusCode::OK);
        assert_eq!(get(&app, &b).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_audio_not_found() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        let resp = get(&app, "/api/audio/missing.wav").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["errno"], 404);
    }

    #[tokio::test]
    async fn test_get_audio_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        for uri in [
            "/api/audio/..%2Fsecret.wav",
            "/api/audio/..",
            "/api/audio/.hidden.wav",
            "/api/audio/a%5Cb.wav",
        ] {
            let resp = get(&app, uri).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
        }
    }

    #[tokio::test]
    async fn test_inference_failure_returns_500_without_artifact() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, Arc::new(FailingGenerator)).await;

        let resp = ask(&app, json!({"query": "Hello"}).to_string()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert!(json["detail"]
            .as_str()
            .unwrap()
            .starts_with("Inference failure"));

        assert!(!dir.path().join("response.wav").exists());
    }

    #[tokio::test]
    async fn test_storage_failure_returns_500_without_tmp_file() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        // 共享槽位被目录占用，落盘时 rename 失败
        let blocker = dir.path().join("response.wav");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let resp = ask(&app, json!({"query": "Hello"}).to_string()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["errno"], 500);
        assert!(json["detail"]
            .as_str()
            .unwrap()
            .starts_with("Storage failure"));

        for entry in std::fs::read_dir(dir.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.contains(".tmp-"), "leftover temp file: {}", name);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_audio_length_matches_body_while_slot_is_replaced() {
        let dir = TempDir::new().unwrap();
        let (app, storage) =
            build_app_with_storage(&dir, ArtifactNaming::Shared, fake_generator()).await;
        storage.save(&shared_slot(), &[1u8; 100]).await.unwrap();

        let writer = {
            let storage = storage.clone();
            tokio::spawn(async move {
                for i in 0..300u32 {
                    let data = if i % 2 == 0 {
                        vec![2u8; 50_000]
                    } else {
                        vec![3u8; 100]
                    };
                    storage.save(&shared_slot(), &data).await.unwrap();
                }
            })
        };

        let mut reads = 0;
        while !writer.is_finished() || reads < 200 {
            let resp = get(&app, "/api/audio/response.wav").await;
            assert_eq!(resp.status(), StatusCode::OK);
            let declared: usize = resp.headers()[header::CONTENT_LENGTH]
                .to_str()
                .unwrap()
                .parse()
                .unwrap();

            let bytes = body_bytes(resp).await;
            assert_eq!(bytes.len(), declared, "Content-Length disagreed with body");
            // 内容来自同一次写入
            assert!(bytes.iter().all(|b| *b == bytes[0]));
            reads += 1;
        }

        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_ping_and_health() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, fake_generator()).await;

        let json = body_json(get(&app, "/api/ping").await).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

        ask(&app, json!({"query": "Hello"}).to_string()).await;
        let resp = get(&app, "/api/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["artifacts"], 1);
        assert!(json["artifact_bytes"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_health_degraded_when_backend_down() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, ArtifactNaming::Shared, Arc::new(FailingGenerator)).await;

        let resp = get(&app, "/api/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["llm"], false);
        assert_eq!(json["tts"], true);
    }
}
