//! # ModKit
//!
//! Shared plumbing for the server's modules:
//!
//! - **Contracts**: `DbModule` (migrations) and `RestfulModule` (routes + OpenAPI)
//! - **API helpers**: RFC 9457 problems, handler error type, response shortcuts
//! - **Runtime**: signal/cancellation aware shutdown

pub use anyhow::Result;
pub use async_trait::async_trait;

// Core module contracts and traits
pub mod contracts;
pub use contracts::{DbModule, RestfulModule};

pub mod api;
pub use api::problem::{not_found, Problem, ProblemResponse};
pub use api::{error_mapping_middleware, ApiError, ApiResult};

pub mod runtime;
pub use runtime::wait_for_shutdown;
