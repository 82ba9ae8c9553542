//! HTTP surface of the support assistant.
//!
//! [`start`] loads configuration and the knowledge base, builds the
//! text-generation backend and serves [`router`] until Ctrl+C.

use std::sync::Arc;

mod core;
mod error_handler;
mod routes;

use ai_llm_service::{LlmService, config::default_config::config_from_env};
use axum::{
    Router,
    routing::{get, post},
};
use contextor::ContextorConfig;
use knowledge_base::KnowledgeBase;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use crate::{
    core::app_state::{AppConfig, AppState, ConfigError},
    error_handler::{AppError, GENERATION_FAILED_TEXT},
};
use crate::routes::{
    answer::answer_route::{answer, answer_localized},
    health_route::health,
};

/// Routes with request tracing; CORS is added by [`start`] when configured.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/answer", post(answer))
        .route("/{locale}/api/answer", post(answer_localized))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start() -> Result<(), AppError> {
    let cfg = AppConfig::from_env()?;
    let cors = cfg.cors_layer()?;

    let kb = KnowledgeBase::load_shared(&cfg.knowledge_base_path)?;
    let llm = LlmService::new(config_from_env()?)?;
    info!(
        provider = ?llm.config().provider,
        model = %llm.config().model,
        "text generation backend ready"
    );
    let contextor = ContextorConfig::from_env().map_err(AppError::Assistant)?;

    let state = Arc::new(AppState::new(&cfg, kb, Arc::new(llm), contextor));

    let mut app = router(state);
    if let Some(cors) = cors {
        app = app.layer(cors);
    }

    let listener = tokio::net::TcpListener::bind(&cfg.address)
        .await
        .map_err(AppError::Bind)?;
    info!(
        address = %cfg.address,
        locales = ?cfg.locales,
        default_locale = %cfg.default_locale,
        "listening"
    );

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use ai_llm_service::{AiLlmError, HealthStatus, TextGenerator};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    enum Reply {
        Text(&'static str),
        Fail,
    }

    struct FakeGenerator {
        reply: Reply,
        calls: AtomicUsize,
        last_system: std::sync::Mutex<Option<String>>,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, _prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_system.lock().unwrap() = system.map(str::to_string);
            match self.reply {
                Reply::Text(t) => Ok(t.to_string()),
                Reply::Fail => Err(AiLlmError::Timeout(Duration::from_secs(30))),
            }
        }

        async fn health(&self) -> HealthStatus {
            HealthStatus {
                provider: "Fake".into(),
                endpoint: String::new(),
                model: Some("fake-1".into()),
                ok: true,
                latency_ms: 0,
                message: "fine".into(),
            }
        }
    }

    fn fake(reply: Reply) -> Arc<FakeGenerator> {
        Arc::new(FakeGenerator {
            reply,
            calls: AtomicUsize::new(0),
            last_system: std::sync::Mutex::new(None),
        })
    }

    fn app_with(generator: Arc<FakeGenerator>, locales: &[&str], max_chars: usize) -> Router {
        let kb: KnowledgeBase = serde_json::from_value(json!({
            "brand": { "name": "CelesteIQ" },
            "packages": [ { "id": "sec1", "name": "Security Audit" } ],
            "faq": [ { "q": "Where are you?", "a": "Montevideo." } ],
            "routing": [ { "triggers": ["security"], "targetPackageId": "sec1" } ]
        }))
        .unwrap();

        let cfg = AppConfig {
            address: "127.0.0.1:0".into(),
            knowledge_base_path: "unused.json".into(),
            locales: locales.iter().map(|l| l.to_string()).collect(),
            default_locale: locales[0].to_string(),
            max_question_chars: max_chars,
            cors_allowed_origins: vec![],
        };
        let state = AppState::new(&cfg, Arc::new(kb), generator, ContextorConfig::default());
        router(Arc::new(state))
    }

    fn app(generator: Arc<FakeGenerator>) -> Router {
        app_with(generator, &["es"], 2000)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn answer_returns_text() {
        let g = fake(Reply::Text("Ofrecemos auditorías."));
        let res = app(g.clone())
            .oneshot(post_json("/api/answer", r#"{"question":"¿Hacen security audits?"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, json!({ "text": "Ofrecemos auditorías." }));
        assert_eq!(g.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_question_is_allowed() {
        let g = fake(Reply::Text("Hola"));
        let res = app(g)
            .oneshot(post_json("/api/answer", r#"{"question":""}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn configured_locale_prefix_is_accepted() {
        let g = fake(Reply::Text("Hi"));
        let res = app_with(g.clone(), &["es", "en"], 2000)
            .oneshot(post_json("/en/api/answer", r#"{"question":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let system = g.last_system.lock().unwrap().clone().unwrap();
        assert!(system.contains("Always reply in English"));
    }

    #[tokio::test]
    async fn unknown_locale_is_not_found() {
        let g = fake(Reply::Text("unused"));
        let res = app(g.clone())
            .oneshot(post_json("/fr/api/answer", r#"{"question":"bonjour"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = json_body(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(g.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_or_incomplete_body_is_bad_request() {
        for body in ["{not json", r#"{"q":"hi"}"#, r#"{"question":42}"#] {
            let g = fake(Reply::Text("unused"));
            let res = app(g.clone())
                .oneshot(post_json("/api/answer", body))
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body}");
            let json = json_body(res).await;
            assert_eq!(json["success"], false);
            assert_eq!(json["error"]["code"], "BAD_REQUEST");
            assert_eq!(g.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn too_long_question_is_bad_request() {
        let g = fake(Reply::Text("unused"));
        let res = app_with(g.clone(), &["es"], 5)
            .oneshot(post_json("/api/answer", r#"{"question":"¿auditoría?"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = json_body(res).await;
        assert_eq!(json["error"]["details"][0]["path"], "question");
        assert_eq!(g.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generation_failure_is_500_with_text() {
        let g = fake(Reply::Fail);
        let res = app(g)
            .oneshot(post_json("/api/answer", r#"{"question":"hola"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res).await, json!({ "text": GENERATION_FAILED_TEXT }));
    }

    #[tokio::test]
    async fn health_wraps_status() {
        let res = app(fake(Reply::Text("unused")))
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let json = json_body(res).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["ok"], true);
        assert_eq!(json["data"]["model"], "fake-1");
    }
}
