use async_trait::async_trait;

use crate::contract::{
    error::LeaderboardError,
    model::{NewUser, RankedUser},
};

/// Public API trait for the leaderboard module that other modules can use
#[async_trait]
pub trait LeaderboardApi: Send + Sync {
    /// All users ordered by rank ascending
    async fn list_ranked(&self) -> Result<Vec<RankedUser>, LeaderboardError>;

    /// A single user with the same rank it has in the full list
    async fn get_ranked(&self, id: i64) -> Result<RankedUser, LeaderboardError>;

    /// Create a user with zero points
    async fn create_user(&self, new_user: NewUser) -> Result<RankedUser, LeaderboardError>;

    /// Replace the point total of a user
    async fn update_points(&self, id: i64, points: i64) -> Result<(), LeaderboardError>;

    /// Delete a user by ID
    async fn delete_user(&self, id: i64) -> Result<(), LeaderboardError>;

    /// Delete every user; returns how many were removed
    async fn delete_all(&self) -> Result<u64, LeaderboardError>;
}
