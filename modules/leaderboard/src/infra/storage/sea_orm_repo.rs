//! SeaORM-backed repository implementation for the domain port.
//!
//! This struct is generic over `C: ConnectionTrait`, so the same code runs against a
//! `DatabaseConnection` (the store) and a `DatabaseTransaction` (what `begin` hands out).

use anyhow::Context;
use async_trait::async_trait;
use modkit_db::is_unique_violation;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::contract::model::{NewUser, User};
use crate::domain::repo::{
    RepoError, RepoResult, StoredUser, UsersRepository, UsersStore, UsersTransaction,
};
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn list_all(&self) -> RepoResult<Vec<StoredUser>> {
        let rows = UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("list_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<StoredUser>> {
        let found = UserEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, new_user: NewUser) -> RepoResult<User> {
        let m = UserAM {
            id: NotSet,
            display_name: Set(new_user.display_name.clone()),
            points: Set(0),
            rank: Set(None),
        };
        match m.insert(&self.conn).await {
            Ok(model) => Ok(StoredUser::from(model).user),
            Err(e) if is_unique_violation(&e) => Err(RepoError::DisplayNameTaken {
                display_name: new_user.display_name,
            }),
            Err(e) => Err(anyhow::Error::new(e).context("insert failed").into()),
        }
    }

    async fn update_points(&self, id: i64, points: i64) -> RepoResult<bool> {
        let res = UserEntity::update_many()
            .col_expr(Column::Points, Expr::value(points))
            .filter(Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("update_points failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let res = UserEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_all(&self) -> RepoResult<u64> {
        let res = UserEntity::delete_many()
            .exec(&self.conn)
            .await
            .context("delete_all failed")?;
        Ok(res.rows_affected)
    }

    async fn save_ranks(&self, ranks: &[(i64, u32)]) -> RepoResult<()> {
        for &(id, rank) in ranks {
            UserEntity::update_many()
                .col_expr(Column::Rank, Expr::value(i64::from(rank)))
                .filter(Column::Id.eq(id))
                .exec(&self.conn)
                .await
                .with_context(|| format!("save_ranks failed for id={id}"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl UsersStore for SeaOrmUsersRepository<DatabaseConnection> {
    async fn begin(&self) -> RepoResult<Box<dyn UsersTransaction>> {
        let txn = self.conn.begin().await.context("begin failed")?;
        Ok(Box::new(SeaOrmUsersRepository::new(txn)))
    }
}

#[async_trait]
impl UsersTransaction for SeaOrmUsersRepository<DatabaseTransaction> {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let SeaOrmUsersRepository { conn } = *self;
        conn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        let SeaOrmUsersRepository { conn } = *self;
        conn.rollback().await.context("rollback failed")?;
        Ok(())
    }
}
