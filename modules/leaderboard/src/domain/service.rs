use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{NewUser, RankedUser};
use crate::domain::error::DomainError;
use crate::domain::ranking::{compute_ranks, Ranked, RankingPolicy};
use crate::domain::repo::{StoredUser, UsersRepository, UsersStore, UsersTransaction};

/// Domain service: owns the ranking policy and orchestrates the store and the engine.
/// Depends only on the storage port, not on infra types.
pub struct Service {
    store: Arc<dyn UsersStore>,
    config: ServiceConfig,
    // Single writer for recompute-and-persist under `OnWrite`.
    write_lock: Mutex<()>,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub policy: RankingPolicy,
    pub min_display_name_length: usize,
    pub max_display_name_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            policy: RankingPolicy::OnDemand,
            min_display_name_length: 3,
            max_display_name_length: 30,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(store: Arc<dyn UsersStore>, config: ServiceConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    #[instrument(name = "leaderboard.service.list_ranked", skip(self))]
    pub async fn list_ranked(&self) -> Result<Vec<RankedUser>, DomainError> {
        debug!("Listing ranked users");
        let rows = self.store.list_all().await?;
        let users = self.project(rows);
        debug!("Successfully listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "leaderboard.service.get_ranked", skip(self), fields(user_id = id))]
    pub async fn get_ranked(&self, id: i64) -> Result<RankedUser, DomainError> {
        debug!("Getting ranked user by id");

        if self.config.policy == RankingPolicy::OnWrite {
            let row = self
                .store
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::user_not_found(id))?;
            if let Some(rank) = row.rank {
                return Ok(RankedUser::new(row.user, rank));
            }
        }

        // Rank is a property of the whole population: rank first, then filter.
        let rows = self.store.list_all().await?;
        self.project(rows)
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(
        name = "leaderboard.service.create_user",
        skip(self),
        fields(display_name = %new_user.display_name)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<RankedUser, DomainError> {
        info!("Creating new user");
        self.validate_new_user(&new_user)?;

        let _writer = self.writer().await;
        let tx = self.store.begin().await?;
        let result = async {
            let user = tx.insert(new_user).await?;
            let ranked = self.rerank(&*tx).await?;
            ranked
                .into_iter()
                .find(|r| r.item.user.id == user.id)
                .map(|r| RankedUser::new(r.item.user, r.rank))
                .ok_or_else(|| DomainError::database("inserted user is not visible"))
        }
        .await;
        let created = finish(tx, result).await?;

        info!("Successfully created user with id={}", created.id);
        Ok(created)
    }

    #[instrument(name = "leaderboard.service.update_points", skip(self), fields(user_id = id))]
    pub async fn update_points(&self, id: i64, points: i64) -> Result<(), DomainError> {
        info!("Updating points");

        let _writer = self.writer().await;
        let tx = self.store.begin().await?;
        let result = async {
            if !tx.update_points(id, points).await? {
                return Err(DomainError::user_not_found(id));
            }
            self.rerank_on_write(&*tx).await
        }
        .await;
        finish(tx, result).await?;

        info!("Successfully updated points to {}", points);
        Ok(())
    }

    #[instrument(name = "leaderboard.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting user");

        let _writer = self.writer().await;
        let tx = self.store.begin().await?;
        let result = async {
            if !tx.delete(id).await? {
                return Err(DomainError::user_not_found(id));
            }
            self.rerank_on_write(&*tx).await
        }
        .await;
        finish(tx, result).await?;

        info!("Successfully deleted user");
        Ok(())
    }

    #[instrument(name = "leaderboard.service.delete_all", skip(self))]
    pub async fn delete_all(&self) -> Result<u64, DomainError> {
        info!("Deleting all users");

        let _writer = self.writer().await;
        let tx = self.store.begin().await?;
        let result = tx.delete_all().await.map_err(DomainError::from);
        let removed = finish(tx, result).await?;

        info!("Successfully deleted {} users", removed);
        Ok(removed)
    }

    /// Bring stored ranks in line with the current population. No-op under `OnDemand`.
    #[instrument(name = "leaderboard.service.reconcile_ranks", skip(self))]
    pub async fn reconcile_ranks(&self) -> Result<(), DomainError> {
        if self.config.policy != RankingPolicy::OnWrite {
            return Ok(());
        }

        let _writer = self.writer().await;
        let tx = self.store.begin().await?;
        let result = self.rerank(&*tx).await.map(|ranked| ranked.len());
        let total = finish(tx, result).await?;

        info!("Reconciled ranks for {} users", total);
        Ok(())
    }

    fn validate_new_user(&self, new_user: &NewUser) -> Result<(), DomainError> {
        let min = self.config.min_display_name_length;
        let max = self.config.max_display_name_length;
        let len = new_user.display_name.chars().count();
        if len < min || len > max {
            return Err(DomainError::validation(
                "displayName",
                format!("displayName must be between {min} and {max} characters."),
            ));
        }
        Ok(())
    }

    async fn writer(&self) -> Option<MutexGuard<'_, ()>> {
        match self.config.policy {
            RankingPolicy::OnWrite => Some(self.write_lock.lock().await),
            RankingPolicy::OnDemand => None,
        }
    }

    /// Rank the population seen by `repo`; under `OnWrite` also store the ranks that changed.
    async fn rerank<R>(&self, repo: &R) -> Result<Vec<Ranked<StoredUser>>, DomainError>
    where
        R: UsersRepository + ?Sized,
    {
        let ranked = compute_ranks(repo.list_all().await?);
        if self.config.policy == RankingPolicy::OnWrite {
            let changed: Vec<(i64, u32)> = ranked
                .iter()
                .filter(|r| r.item.rank != Some(r.rank))
                .map(|r| (r.item.user.id, r.rank))
                .collect();
            if !changed.is_empty() {
                debug!("Persisting {} changed ranks", changed.len());
                repo.save_ranks(&changed).await?;
            }
        }
        Ok(ranked)
    }

    async fn rerank_on_write<R>(&self, repo: &R) -> Result<(), DomainError>
    where
        R: UsersRepository + ?Sized,
    {
        if self.config.policy == RankingPolicy::OnWrite {
            self.rerank(repo).await?;
        }
        Ok(())
    }

    /// Rows in store order → users in rank order.
    fn project(&self, rows: Vec<StoredUser>) -> Vec<RankedUser> {
        if self.config.policy == RankingPolicy::OnWrite {
            match rows.iter().map(|r| r.rank).collect::<Option<Vec<u32>>>() {
                Some(ranks) => {
                    let mut users: Vec<RankedUser> = rows
                        .into_iter()
                        .zip(ranks)
                        .map(|(row, rank)| RankedUser::new(row.user, rank))
                        .collect();
                    users.sort_by_key(|u| u.rank);
                    return users;
                }
                None => warn!("Stored ranks are incomplete; computing ranks for this read"),
            }
        }

        compute_ranks(rows)
            .into_iter()
            .map(|r| RankedUser::new(r.item.user, r.rank))
            .collect()
    }
}

/// Commit on success, roll back on failure; the operation's own error wins.
async fn finish<T>(
    tx: Box<dyn UsersTransaction>,
    result: Result<T, DomainError>,
) -> Result<T, DomainError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
