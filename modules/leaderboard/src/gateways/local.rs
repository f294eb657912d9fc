use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::LeaderboardApi,
    error::LeaderboardError,
    model::{NewUser, RankedUser},
};
use crate::domain::service::Service;

/// Local implementation of the LeaderboardApi trait that delegates to the domain service
pub struct LeaderboardLocalClient {
    service: Arc<Service>,
}

impl LeaderboardLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl LeaderboardApi for LeaderboardLocalClient {
    async fn list_ranked(&self) -> Result<Vec<RankedUser>, LeaderboardError> {
        self.service.list_ranked().await.map_err(Into::into)
    }

    async fn get_ranked(&self, id: i64) -> Result<RankedUser, LeaderboardError> {
        self.service.get_ranked(id).await.map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<RankedUser, LeaderboardError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn update_points(&self, id: i64, points: i64) -> Result<(), LeaderboardError> {
        self.service
            .update_points(id, points)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: i64) -> Result<(), LeaderboardError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }

    async fn delete_all(&self) -> Result<u64, LeaderboardError> {
        self.service.delete_all().await.map_err(Into::into)
    }
}
