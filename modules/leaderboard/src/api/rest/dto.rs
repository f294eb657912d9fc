use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::RankedUser;

/// REST DTO for a user and its current rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub display_name: String,
    pub points: i64,
    /// 1-based position on the leaderboard
    pub rank: u32,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserReq {
    /// 3 to 30 characters, unique across users. `username` and `nickName` are accepted too.
    #[serde(default, alias = "username", alias = "nickName")]
    pub display_name: Option<String>,
}

/// REST DTO for replacing a user's point total; a missing value means 0
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePointsReq {
    #[serde(default)]
    pub points: i64,
}

impl From<RankedUser> for UserDto {
    fn from(user: RankedUser) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            points: user.points,
            rank: user.rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_dto_uses_camel_case() {
        let json = serde_json::to_value(UserDto {
            id: 1,
            display_name: "abc".into(),
            points: 10,
            rank: 1,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 1, "displayName": "abc", "points": 10, "rank": 1 })
        );
    }

    #[test]
    fn create_request_accepts_historical_names() {
        for body in [
            r#"{"displayName":"abc"}"#,
            r#"{"username":"abc"}"#,
            r#"{"nickName":"abc"}"#,
        ] {
            let req: CreateUserReq = serde_json::from_str(body).unwrap();
            assert_eq!(req.display_name.as_deref(), Some("abc"), "{body}");
        }
        let empty: CreateUserReq = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.display_name, None);
    }

    #[test]
    fn missing_points_default_to_zero() {
        let req: UpdatePointsReq = serde_json::from_str("{}").unwrap();
        assert_eq!(req.points, 0);
        let req: UpdatePointsReq = serde_json::from_str(r#"{"points":-42}"#).unwrap();
        assert_eq!(req.points, -42);
        assert!(serde_json::from_str::<UpdatePointsReq>(r#"{"points":"x"}"#).is_err());
    }
}
