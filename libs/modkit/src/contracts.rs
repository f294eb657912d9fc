use async_trait::async_trait;
use axum::Router;
use utoipa::openapi::OpenApi;

/// Schema owner: runs migrations before any traffic is served.
#[async_trait]
pub trait DbModule: Send + Sync {
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER DB migrations.
pub trait RestfulModule: Send + Sync {
    /// Attach the module routes to `router` and merge its operations into `openapi`.
    fn register_rest(&self, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router>;
}
