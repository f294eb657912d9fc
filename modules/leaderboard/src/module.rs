use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{DbModule, RestfulModule};
use modkit_db::DbHandle;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::LeaderboardConfig;
use crate::contract::client::LeaderboardApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::LeaderboardLocalClient;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

/// Leaderboard module: wires storage, the ranking service and the REST surface.
#[derive(Default)]
pub struct Leaderboard {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service on top of `db`. Migrations must have run.
    pub async fn init(&self, db: &DbHandle, cfg: LeaderboardConfig) -> anyhow::Result<()> {
        info!("Initializing leaderboard module");
        cfg.validate()?;
        debug!(
            "Loaded leaderboard config: ranking_policy={:?}, display_name_length={}..={}",
            cfg.ranking_policy, cfg.min_display_name_length, cfg.max_display_name_length
        );

        // Wire repository (infra) to domain service (port)
        let repo = SeaOrmUsersRepository::new(db.sea());
        let service_config = ServiceConfig {
            policy: cfg.ranking_policy,
            min_display_name_length: cfg.min_display_name_length,
            max_display_name_length: cfg.max_display_name_length,
        };
        let service = Arc::new(Service::new(Arc::new(repo), service_config));

        // Rows written under the on-demand policy carry no stored rank.
        service.reconcile_ranks().await?;

        self.service.store(Some(service));
        info!("Leaderboard module initialized");
        Ok(())
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other components.
    pub fn client(&self) -> anyhow::Result<Arc<dyn LeaderboardApi>> {
        Ok(Arc::new(LeaderboardLocalClient::new(self.service()?)))
    }
}

#[async_trait]
impl DbModule for Leaderboard {
    async fn migrate(&self, db: &DbHandle) -> anyhow::Result<()> {
        info!("Running leaderboard database migrations");
        let conn = db.sea();
        crate::infra::storage::migrations::Migrator::up(&conn, None).await?;
        info!("Leaderboard database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for Leaderboard {
    fn register_rest(
        &self,
        router: axum::Router,
        openapi: &mut utoipa::openapi::OpenApi,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering leaderboard REST routes");
        let router = routes::register_routes(router, openapi, self.service()?)?;
        info!("Leaderboard REST routes registered successfully");
        Ok(router)
    }
}
