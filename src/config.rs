//! Configuration management for the bounty bridge

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_STATE_FILE: &str = "bounty-state.json";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Bridge configuration loaded from environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream bounty API (no trailing slash)
    pub api_url: String,

    /// Destination URLs receiving webhook events
    pub webhook_urls: Vec<String>,

    /// Poll interval in seconds
    pub poll_interval_seconds: u64,

    /// Lower-cased tags; empty means every tag passes
    pub filter_tags: Vec<String>,

    /// Minimum reward in human units (reward / 1_000_000); zero disables the check
    pub min_reward: Decimal,

    /// Port the HTTP front door listens on
    pub port: u16,

    /// Path of the persisted state file
    pub state_file: String,

    /// Timeout applied to every outbound HTTP request
    pub http_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Malformed numbers fall back to their defaults instead of failing startup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("BOUNTY_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let webhook_urls = lookup("WEBHOOK_URLS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let poll_interval_seconds = lookup("POLL_INTERVAL_SECONDS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECONDS);

        let filter_tags = lookup("FILTER_TAGS")
            .map(|v| {
                split_list(&v)
                    .into_iter()
                    .map(|t| t.to_lowercase())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let min_reward = lookup("MIN_REWARD")
            .and_then(|v| Decimal::from_str(v.trim()).ok())
            .unwrap_or(Decimal::ZERO);

        let port = lookup("PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let state_file = lookup("STATE_FILE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());

        let http_timeout_seconds = lookup("HTTP_TIMEOUT_SECONDS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS);

        Self {
            api_url,
            webhook_urls,
            poll_interval_seconds,
            filter_tags,
            min_reward,
            port,
            state_file,
            http_timeout_seconds,
        }
    }

    /// Check if at least one webhook destination is configured
    pub fn webhooks_enabled(&self) -> bool {
        !self.webhook_urls.is_empty()
    }

    /// Upstream listing/creation endpoint
    pub fn bounties_url(&self) -> String {
        format!("{}/bounties", self.api_url)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
