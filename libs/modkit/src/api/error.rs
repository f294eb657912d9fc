use crate::api::problem::{Problem, ProblemResponse};
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error type returned by REST handlers.
///
/// Handlers accept `Result<Json<T>, JsonRejection>` (and the `Path` equivalent) and use `?`,
/// so malformed input and domain failures all end up as RFC 9457 Problem+json responses.
#[derive(thiserror::Error, Debug)]
pub enum ApiError<D> {
    /// The request body could not be read or deserialized.
    #[error(transparent)]
    Body(JsonRejection),

    /// A path segment could not be parsed into the expected type.
    #[error(transparent)]
    Path(PathRejection),

    /// Domain business logic errors
    #[error(transparent)]
    Domain(D),
}

impl<D> ApiError<D> {
    pub fn from_domain(e: D) -> Self {
        ApiError::Domain(e)
    }
}

impl<D> From<JsonRejection> for ApiError<D> {
    fn from(e: JsonRejection) -> Self {
        ApiError::Body(e)
    }
}

impl<D> From<PathRejection> for ApiError<D> {
    fn from(e: PathRejection) -> Self {
        ApiError::Path(e)
    }
}

/// Every body rejection is reported as 400, including the 415/422 axum would pick.
pub fn rejection_to_problem(e: &JsonRejection) -> ProblemResponse {
    Problem::new(StatusCode::BAD_REQUEST, "Malformed request body", e.body_text())
        .with_type("https://errors.example.com/MALFORMED_BODY")
        .with_code("MALFORMED_BODY")
        .into()
}

pub fn path_rejection_to_problem(e: &PathRejection) -> ProblemResponse {
    Problem::new(StatusCode::BAD_REQUEST, "Invalid path parameter", e.body_text())
        .with_type("https://errors.example.com/INVALID_PATH")
        .with_code("INVALID_PATH")
        .into()
}

impl<D> IntoResponse for ApiError<D>
where
    D: Into<ProblemResponse>,
{
    fn into_response(self) -> Response {
        match self {
            ApiError::Body(e) => rejection_to_problem(&e).into_response(),
            ApiError::Path(e) => path_rejection_to_problem(&e).into_response(),
            ApiError::Domain(e) => e.into().into_response(),
        }
    }
}

/// Generic Result type for API handlers.
pub type ApiResult<T, D> = Result<T, ApiError<D>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::problem::not_found;
    use axum::{body::Body, http::Request, routing::post, Json, Router};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct Missing;

    impl From<Missing> for ProblemResponse {
        fn from(_: Missing) -> Self {
            not_found("missing")
        }
    }

    async fn echo(
        body: Result<Json<serde_json::Value>, JsonRejection>,
    ) -> ApiResult<Json<serde_json::Value>, Missing> {
        let Json(v) = body?;
        if v.get("missing").is_some() {
            return Err(ApiError::from_domain(Missing));
        }
        Ok(Json(v))
    }

    async fn call(body: &'static str) -> StatusCode {
        Router::new()
            .route("/echo", post(echo))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        assert_eq!(call("{not json").await, StatusCode::BAD_REQUEST);
        assert_eq!(call("{\"ok\": 1}").await, StatusCode::OK);
        assert_eq!(call("{\"missing\": 1}").await, StatusCode::NOT_FOUND);
    }
}
