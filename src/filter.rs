//! Eligibility rules deciding which bounties the bridge tracks

use crate::config::Config;
use crate::types::Bounty;
use rust_decimal::Decimal;

/// Tag and minimum-reward filter. An empty tag set or a zero threshold always passes.
#[derive(Debug, Clone, Default)]
pub struct BountyFilter {
    /// Lower-cased tags
    tags: Vec<String>,
    min_reward: Decimal,
}

impl BountyFilter {
    pub fn new(tags: Vec<String>, min_reward: Decimal) -> Self {
        Self {
            tags: tags.into_iter().map(|t| t.to_lowercase()).collect(),
            min_reward,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.filter_tags.clone(), config.min_reward)
    }

    pub fn matches(&self, bounty: &Bounty) -> bool {
        self.matches_tags(bounty) && self.matches_reward(bounty)
    }

    fn matches_tags(&self, bounty: &Bounty) -> bool {
        if self.tags.is_empty() {
            return true;
        }

        bounty
            .tags
            .iter()
            .any(|tag| self.tags.contains(&tag.to_lowercase()))
    }

    fn matches_reward(&self, bounty: &Bounty) -> bool {
        if self.min_reward <= Decimal::ZERO {
            return true;
        }

        // Non-numeric rewards never clear a positive threshold
        bounty
            .reward_units()
            .map(|reward| reward >= self.min_reward)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn bounty(tags: &[&str], reward: &str) -> Bounty {
        serde_json::from_value(json!({
            "id": "b-1",
            "title": "Write docs",
            "tags": tags,
            "reward": reward,
            "status": "open"
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = BountyFilter::default();
        assert!(filter.matches(&bounty(&[], "0")));
        assert!(filter.matches(&bounty(&["anything"], "garbage")));
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        let filter = BountyFilter::new(vec!["Rust".to_string(), "defi".to_string()], Decimal::ZERO);
        assert!(filter.matches(&bounty(&["RUST"], "1")));
        assert!(filter.matches(&bounty(&["frontend", "DeFi"], "1")));
        assert!(!filter.matches(&bounty(&["frontend"], "1")));
        assert!(!filter.matches(&bounty(&[], "1")));
    }

    #[test]
    fn test_min_reward_uses_six_decimals() {
        let filter = BountyFilter::new(Vec::new(), dec!(5));
        assert!(filter.matches(&bounty(&[], "5000000")));
        assert!(filter.matches(&bounty(&[], "12000000")));
        assert!(!filter.matches(&bounty(&[], "4999999")));
        assert!(!filter.matches(&bounty(&[], "five")));
    }

    #[test]
    fn test_both_checks_must_pass() {
        let filter = BountyFilter::new(vec!["rust".to_string()], dec!(1));
        assert!(filter.matches(&bounty(&["rust"], "1000000")));
        assert!(!filter.matches(&bounty(&["rust"], "999999")));
        assert!(!filter.matches(&bounty(&["go"], "9000000")));
    }
}
