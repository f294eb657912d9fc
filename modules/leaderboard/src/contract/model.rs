/// Pure user model for inter-module communication (no serde/schemars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub points: i64,
}

/// A user together with its position on the leaderboard (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedUser {
    pub id: i64,
    pub display_name: String,
    pub points: i64,
    pub rank: u32,
}

impl RankedUser {
    pub fn new(user: User, rank: u32) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            points: user.points,
            rank,
        }
    }
}

/// Data for creating a new user; points always start at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub display_name: String,
}
