//! Decorates Problem+JSON responses with request context.
//!
//! Handlers build problems without access to the request; this middleware fills in
//! `instance` (the request path) and `requestId` (the `x-request-id` header) on the way out.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::api::problem::{Problem, APPLICATION_PROBLEM_JSON};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Problem bodies are small; anything bigger is passed through untouched.
const MAX_PROBLEM_BYTES: usize = 64 * 1024;

pub async fn error_mapping_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let request_id = extract_request_id(request.headers());

    let response = next.run(request).await;

    if response.status().is_success() || !is_problem_response(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_PROBLEM_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "failed to buffer problem body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(mut problem) = serde_json::from_slice::<Problem>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    if problem.instance.is_empty() {
        problem.instance = path;
    }
    if problem.request_id.is_none() {
        problem.request_id = request_id;
    }

    match serde_json::to_vec(&problem) {
        Ok(rendered) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
            );
            Response::from_parts(parts, Body::from(rendered))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

fn is_problem_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains(APPLICATION_PROBLEM_JSON))
        .unwrap_or(false)
}

pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::problem::not_found;
    use axum::{http::StatusCode, middleware, response::IntoResponse, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/missing", get(|| async { not_found("gone").into_response() }))
            .route("/plain", get(|| async { (StatusCode::BAD_REQUEST, "nope") }))
            .layer(middleware::from_fn(error_mapping_middleware))
    }

    #[tokio::test]
    async fn problem_gets_instance_and_request_id() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header(REQUEST_ID_HEADER, "abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let p: Problem = serde_json::from_slice(&body).unwrap();
        assert_eq!(p.instance, "/missing");
        assert_eq!(p.request_id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn non_problem_errors_pass_through() {
        let resp = app()
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"nope");
    }
}
