//! HTTP host: owns the listener, the global middleware stack and the operational
//! endpoints (`/health`, `/openapi.json`, `/docs`). Domain modules contribute their
//! routes through [`modkit::RestfulModule`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use axum::{http::StatusCode, middleware::from_fn, routing::get, Router};
use modkit::RestfulModule;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

pub struct ApiIngress {
    config: ApiIngressConfig,
    // Actual address after bind (port 0 resolves here).
    local_addr: ArcSwapOption<SocketAddr>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            local_addr: ArcSwapOption::empty(),
        }
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        self.config.clone()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.load().as_deref().copied()
    }

    fn base_openapi() -> OpenApi {
        OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("Leaderboard API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .description(Some("Users, points and ranks")),
            )
            .build()
    }

    /// Build the full HTTP router: module routes, operational endpoints and middleware.
    pub fn build_router(&self, modules: &[&dyn RestfulModule]) -> Result<Router> {
        let config = self.get_config();
        let mut openapi = Self::base_openapi();

        let mut router = Router::new().route("/health", get(web::health_check));
        for module in modules {
            router = module.register_rest(router, &mut openapi)?;
        }

        let op_count: usize = openapi
            .paths
            .paths
            .values()
            .map(|item| {
                [
                    &item.get, &item.put, &item.post, &item.delete, &item.patch,
                ]
                .into_iter()
                .filter(|op| op.is_some())
                .count()
            })
            .sum();

        if config.enable_docs {
            tracing::info!(operations = op_count, "serving OpenAPI document and docs UI");
            let doc = Arc::new(serde_json::to_value(&openapi)?);
            router = router
                .route("/openapi.json", get(web::openapi_handler(doc)))
                .route("/docs", get(web::serve_docs));
        }

        router = router.fallback(web::not_found_fallback);

        // Layers are listed innermost first; the last one added sees the request first.
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id -> problem decoration
        // -> Timeout -> CORS -> BodyLimit -> handler
        router = router.layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));
        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        let timeout = match config.timeout_sec {
            0 => DEFAULT_TIMEOUT,
            s => Duration::from_secs(s),
        };
        router = router.layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout));
        router = router.layer(from_fn(modkit::error_mapping_middleware));
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(request_id::create_trace_layer());

        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Bind the configured address and serve until `cancel` fires.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        self.serve_on(listener, router, cancel).await
    }

    /// Serve on an already-bound listener (tests bind port 0).
    pub async fn serve_on(
        &self,
        listener: TcpListener,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<()> {
        let bound = listener.local_addr()?;
        self.local_addr.store(Some(Arc::new(bound)));
        tracing::info!("HTTP server bound on {}", bound);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
