//! HTTP-facing building blocks shared by module REST layers.

pub mod error;
pub mod error_layer;
pub mod problem;
pub mod response;

pub use error::{path_rejection_to_problem, rejection_to_problem, ApiError, ApiResult};
pub use error_layer::{error_mapping_middleware, REQUEST_ID_HEADER};
pub use problem::{FieldErrors, Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
