//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/configure", post(configure_handler))
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/reset", post(reset_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerConfig;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            TimerConfig::new(2, 3, 2),
        ))
    }

    async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn configure_with_zero_rounds_returns_422() {
        let state = app_state();
        let router = create_router(Arc::clone(&state));

        let (status, body) = post_json(router, "/configure", r#"{"rounds": 0}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");

        // The rejected configuration left the timer untouched
        assert_eq!(body["timer"]["phase"], "idle");
        assert_eq!(body["timer"]["rounds"], 2);
        assert_eq!(state.get_snapshot().unwrap().rounds, 2);
    }

    #[tokio::test]
    async fn configure_while_running_returns_409() {
        let state = app_state();
        state.start().unwrap();
        let router = create_router(Arc::clone(&state));

        let (status, body) = post_json(
            router,
            "/configure",
            r#"{"rounds": 5, "round_minutes": 1}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");

        // The running countdown is untouched
        assert_eq!(body["timer"]["phase"], "working");
        assert_eq!(body["timer"]["rounds"], 2);
        assert_eq!(body["timer"]["remaining_secs"], 3);
        assert_eq!(state.get_snapshot().unwrap().rounds, 2);
    }

    #[tokio::test]
    async fn configure_while_idle_returns_200() {
        let router = create_router(app_state());

        let (status, body) = post_json(
            router,
            "/configure",
            r#"{"rounds": 5, "round_minutes": 1, "rest_seconds": 30}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["timer"]["rounds"], 5);
    }
}
