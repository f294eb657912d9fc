use axum::http::StatusCode;
use modkit::api::{ApiError, Problem, ProblemResponse};

use crate::domain::error::DomainError;

/// Helper to create a Problem with less boilerplate; `instance` and `requestId` are
/// filled in by the error mapping middleware.
fn from_parts(status: StatusCode, code: &str, title: &str, detail: impl Into<String>) -> Problem {
    Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{code}"))
        .with_code(code)
}

/// Map domain error to RFC9457 ProblemResponse
impl From<DomainError> for ProblemResponse {
    fn from(e: DomainError) -> Self {
        let problem = match e {
            DomainError::UserNotFound { id } => from_parts(
                StatusCode::NOT_FOUND,
                "LEADERBOARD_USER_NOT_FOUND",
                "User not found",
                format!("User with id {id} was not found"),
            ),
            DomainError::DisplayNameTaken { display_name } => from_parts(
                StatusCode::BAD_REQUEST,
                "LEADERBOARD_DISPLAY_NAME_TAKEN",
                "Validation error",
                "One or more validation errors occurred.",
            )
            .with_field_error(
                "displayName",
                format!("displayName '{display_name}' is already in use."),
            ),
            DomainError::Validation { field, message } => from_parts(
                StatusCode::BAD_REQUEST,
                "LEADERBOARD_VALIDATION",
                "Validation error",
                "One or more validation errors occurred.",
            )
            .with_field_error(field, message),
            DomainError::Database { message } => {
                // Log the internal error details but don't expose them to the client
                tracing::error!(error = %message, "Database error occurred");
                from_parts(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_DB",
                    "Internal error",
                    "An internal database error occurred",
                )
            }
        };
        ProblemResponse(problem)
    }
}

impl From<DomainError> for ApiError<DomainError> {
    fn from(e: DomainError) -> Self {
        ApiError::from_domain(e)
    }
}
