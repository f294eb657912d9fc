use axum::{
    http::{header, Uri},
    response::{Html, IntoResponse, Json, Response},
};
use modkit::ProblemResponse;
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Unknown routes answer with a problem document instead of an empty 404.
pub async fn not_found_fallback(uri: Uri) -> ProblemResponse {
    let ProblemResponse(problem) = modkit::not_found(format!("No route for {}", uri.path()));
    problem.with_code("ROUTE_NOT_FOUND").into()
}

/// Serve a pre-rendered OpenAPI document.
pub fn openapi_handler(
    doc: Arc<Value>,
) -> impl Fn() -> std::future::Ready<Response> + Clone + Send + Sync + 'static {
    move || {
        let json = Json((*doc).clone());
        std::future::ready(([(header::CACHE_CONTROL, "no-store")], json).into_response())
    }
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Leaderboard API Docs</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
