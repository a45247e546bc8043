//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST API under `/api/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/health", get(http::http_health))
        .route("/api/generate-content", post(http::http_generate_content))
        .route("/api/generate-questions", post(http::http_generate_questions))
        .route("/api/evaluate-quiz", post(http::http_evaluate_quiz))
        .route("/api/progress", get(http::http_get_progress))
        .route("/api/subjects", get(http::http_get_subjects))
        .route("/api/content-types", get(http::http_get_content_types))
        .route("/api/question-types", get(http::http_get_question_types))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::build_router;
    use crate::config::Prompts;
    use crate::state::AppState;
    use crate::store::MemoryStore;

    fn offline_state() -> Arc<AppState> {
        Arc::new(AppState {
            openai: None,
            prompts: Prompts::default(),
            question_bank: Arc::new(vec![]),
            store: Arc::new(MemoryStore::new(16)),
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let app = build_router(offline_state());
        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn quiz_evaluation_falls_back_without_model() {
        let app = build_router(offline_state());
        let body = r#"{
            "questions": [{
                "id": "1",
                "question": "Python is compiled. True or false?",
                "type": "True/False",
                "correctAnswer": "False"
            }],
            "answers": [{ "questionId": "1", "answer": "false" }],
            "topic": "Python"
        }"#;
        let res = app.oneshot(post_json("/api/evaluate-quiz", body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_question_list_is_unprocessable() {
        let app = build_router(offline_state());
        let body = r#"{ "questions": [], "answers": [], "topic": "Python" }"#;
        let res = app.oneshot(post_json("/api/evaluate-quiz", body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn fallback_questions_are_served_offline() {
        let app = build_router(offline_state());
        let body = r#"{
            "content": "Python basics",
            "questionCount": 2,
            "questionTypes": ["Multiple Choice"],
            "difficulty": "Easy",
            "subject": "Computer Science"
        }"#;
        let res = app.oneshot(post_json("/api/generate-questions", body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
