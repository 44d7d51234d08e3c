//! Embedded frontend assets.
//!
//! The chat page, the dashboard template and its script are compiled into the
//! binary with `include_str!`, so both servers ship as a single binary.

use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

const CHAT_HTML: &str = include_str!("../../../frontend/index.html");
const DASHBOARD_JS: &str = include_str!("../../../frontend/dashboard.js");

/// Source of the dashboard page, rendered by minijinja.
pub(crate) const DASHBOARD_TEMPLATE: &str = include_str!("../../../frontend/dashboard.html");

/// `GET /` for the chat server.
pub fn chat_page_router() -> Router {
    Router::new().route("/", get(chat_page_handler))
}

/// Static files for the dashboard server.
pub fn dashboard_assets_router() -> Router {
    Router::new().route("/static/dashboard.js", get(dashboard_js_handler))
}

async fn chat_page_handler() -> Html<&'static str> {
    Html(CHAT_HTML)
}

async fn dashboard_js_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        DASHBOARD_JS,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn serves_chat_page() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = chat_page_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("<!DOCTYPE html>"));
        assert!(text.contains("/chat"), "page should post to the chat endpoint");
    }

    #[tokio::test]
    async fn serves_dashboard_script() {
        let req = Request::builder()
            .uri("/static/dashboard.js")
            .body(Body::empty())
            .unwrap();
        let response = dashboard_assets_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.contains("javascript"));
    }
}
