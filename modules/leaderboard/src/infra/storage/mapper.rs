use crate::contract::model::User;
use crate::domain::repo::StoredUser;
use crate::infra::storage::entity::Model as UserEntity;

/// Convert a database entity to the domain row; a rank that does not fit `u32` reads as unset.
impl From<UserEntity> for StoredUser {
    fn from(entity: UserEntity) -> Self {
        StoredUser {
            user: User {
                id: entity.id,
                display_name: entity.display_name,
                points: entity.points,
            },
            rank: entity.rank.and_then(|r| u32::try_from(r).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_rank_is_carried_over() {
        let row = StoredUser::from(UserEntity {
            id: 4,
            display_name: "abc".into(),
            points: -7,
            rank: Some(2),
        });
        assert_eq!(row.user.id, 4);
        assert_eq!(row.user.points, -7);
        assert_eq!(row.rank, Some(2));
    }

    #[test]
    fn out_of_range_rank_is_unset() {
        for rank in [None, Some(-1), Some(i64::from(u32::MAX) + 1)] {
            let row = StoredUser::from(UserEntity {
                id: 1,
                display_name: "abc".into(),
                points: 0,
                rank,
            });
            assert_eq!(row.rank, None);
        }
    }
}
