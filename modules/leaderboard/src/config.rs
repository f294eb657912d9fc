use serde::{Deserialize, Serialize};

use crate::domain::ranking::RankingPolicy;

/// Configuration for the leaderboard module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeaderboardConfig {
    #[serde(default)]
    pub ranking_policy: RankingPolicy,
    #[serde(default = "default_min_display_name_length")]
    pub min_display_name_length: usize,
    #[serde(default = "default_max_display_name_length")]
    pub max_display_name_length: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            ranking_policy: RankingPolicy::default(),
            min_display_name_length: default_min_display_name_length(),
            max_display_name_length: default_max_display_name_length(),
        }
    }
}

impl LeaderboardConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_display_name_length == 0 {
            anyhow::bail!("min_display_name_length must be at least 1");
        }
        if self.min_display_name_length > self.max_display_name_length {
            anyhow::bail!(
                "min_display_name_length ({}) exceeds max_display_name_length ({})",
                self.min_display_name_length,
                self.max_display_name_length
            );
        }
        Ok(())
    }
}

fn default_min_display_name_length() -> usize {
    3
}

fn default_max_display_name_length() -> usize {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: LeaderboardConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg, LeaderboardConfig::default());
        assert_eq!(cfg.ranking_policy, RankingPolicy::OnDemand);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn policy_and_bounds_are_read() {
        let cfg: LeaderboardConfig = serde_json::from_value(serde_json::json!({
            "ranking_policy": "on_write",
            "min_display_name_length": 2,
            "max_display_name_length": 10
        }))
        .unwrap();
        assert_eq!(cfg.ranking_policy, RankingPolicy::OnWrite);
        assert_eq!(cfg.min_display_name_length, 2);
        assert_eq!(cfg.max_display_name_length, 10);
    }

    #[test]
    fn unknown_keys_and_bad_bounds_are_rejected() {
        assert!(serde_json::from_value::<LeaderboardConfig>(serde_json::json!({ "page_size": 5 })).is_err());

        let inverted = LeaderboardConfig {
            min_display_name_length: 10,
            max_display_name_length: 3,
            ..LeaderboardConfig::default()
        };
        assert!(inverted.validate().is_err());

        let zero = LeaderboardConfig {
            min_display_name_length: 0,
            ..LeaderboardConfig::default()
        };
        assert!(zero.validate().is_err());
    }
}
