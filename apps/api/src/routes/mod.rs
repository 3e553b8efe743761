pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::layout::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/paginate", post(handlers::handle_paginate))
        .route(
            "/api/v1/resumes/paginate",
            post(handlers::handle_paginate_resume),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::layout::budget::PageSetup;
    use crate::layout::{FontFamily, TemplateOptions};

    #[tokio::test]
    async fn test_health_reports_service() {
        let state = AppState {
            default_template: TemplateOptions::single_column(
                PageSetup::default(),
                FontFamily::Inter,
                14.0,
            ),
        };
        let response = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "pager-api");
    }
}
