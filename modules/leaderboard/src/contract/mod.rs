pub mod client;
pub mod error;
pub mod model;

pub use client::LeaderboardApi;
pub use error::LeaderboardError;
pub use model::{NewUser, RankedUser, User};
