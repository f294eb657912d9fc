use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{NewUser, User};
use crate::domain::ranking::Scored;

/// Storage failures the domain distinguishes.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The unique index on `display_name` rejected the write.
    #[error("displayName '{display_name}' is already in use")]
    DisplayNameTaken { display_name: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// A persisted user with the rank last written for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub rank: Option<u32>,
}

impl Scored for StoredUser {
    fn points(&self) -> i64 {
        self.user.points
    }
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Every user in store order (ascending id).
    async fn list_all(&self) -> RepoResult<Vec<StoredUser>>;
    /// Load a user by id.
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<StoredUser>>;
    /// Insert a user with zero points; the store assigns the id.
    async fn insert(&self, new_user: NewUser) -> RepoResult<User>;
    /// Returns false when no user has this id.
    async fn update_points(&self, id: i64, points: i64) -> RepoResult<bool>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i64) -> RepoResult<bool>;
    /// Delete every user; returns the number of rows removed.
    async fn delete_all(&self) -> RepoResult<u64>;
    /// Persist `(id, rank)` pairs.
    async fn save_ranks(&self, ranks: &[(i64, u32)]) -> RepoResult<()>;
}

/// Entry point to storage: plain repository calls plus transactions.
#[async_trait]
pub trait UsersStore: UsersRepository {
    async fn begin(&self) -> RepoResult<Box<dyn UsersTransaction>>;
}

/// Repository bound to an open transaction. Dropping it without committing rolls back.
#[async_trait]
pub trait UsersTransaction: UsersRepository {
    async fn commit(self: Box<Self>) -> RepoResult<()>;
    async fn rollback(self: Box<Self>) -> RepoResult<()>;
}
