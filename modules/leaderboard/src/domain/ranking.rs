//! Ranking engine: a pure function from a sequence of scored items to the same items in
//! leaderboard order, each paired with its 1-based rank.
//!
//! Ordering is a stable sort by points descending, so equal scores keep their input order.
//! Callers feed items in store order (ascending id), which makes arrival order the
//! tie-breaker.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::contract::model::User;

/// When ranks are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Every read fetches the population and ranks it; ranks are never stored.
    #[default]
    OnDemand,
    /// Every write recomputes and stores ranks in the same transaction; reads use them.
    OnWrite,
}

/// Anything that carries a point total.
pub trait Scored {
    fn points(&self) -> i64;
}

impl Scored for User {
    fn points(&self) -> i64 {
        self.points
    }
}

impl<T: Scored + ?Sized> Scored for &T {
    fn points(&self) -> i64 {
        (**self).points()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<T> {
    pub item: T,
    pub rank: u32,
}

/// Sort `items` by points descending (stable) and number them from 1.
pub fn compute_ranks<T, I>(items: I) -> Vec<Ranked<T>>
where
    T: Scored,
    I: IntoIterator<Item = T>,
{
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort_by_key(|item| Reverse(item.points()));
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Ranked {
            item,
            rank: u32::try_from(i + 1).unwrap_or(u32::MAX),
        })
        .collect()
}
