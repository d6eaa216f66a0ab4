//! Rules and client configuration.
//!
//! - `RulesConfig`: numbers the offline simulation plays by (AP, limits,
//!   draw counts, search pool)
//! - `ClientConfig`: where the authority lives and how the client paces
//!   itself (polling, log/notification retention)
//!
//! Both deserialize from JSON with every field optional, and both offer
//! `with_*` builders for tests and embedding code.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "DUEL_TOWER_API";

/// Environment variable overriding [`ClientConfig::storage_dir`].
pub const ENV_STORAGE_DIR: &str = "DUEL_TOWER_STORAGE";

/// Configuration could not be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document was malformed or had the wrong shape.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Numbers the local rules simulation plays by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesConfig {
    /// AP granted at the start of each of a player's turns.
    pub ap_per_turn: u32,
    /// Cards drawn when combat starts.
    pub opening_hand: usize,
    /// Soft hand limit; exceeding it raises a discard decision.
    pub hand_limit: usize,
    /// Hard field limit for installs.
    pub field_limit: usize,
    /// Hands strictly below this size draw `low_hand_draw` at turn start.
    pub low_hand_threshold: usize,
    /// Turn-start draw for a short hand.
    pub low_hand_draw: usize,
    /// Turn-start draw otherwise.
    pub normal_draw: usize,
    /// Maximum number of candidates a search presents.
    pub search_pool: usize,
    /// Cost a search prefers when filtering the deck.
    pub search_preferred_cost: u32,
    /// Owner turn-starts an EX stays blocked after use.
    pub ex_cooldown_turns: u32,
    /// Keyword marking cards that can never be discarded from hand.
    pub immovable_keyword: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            ap_per_turn: 3,
            opening_hand: 4,
            hand_limit: 6,
            field_limit: 5,
            low_hand_threshold: 4,
            low_hand_draw: 2,
            normal_draw: 1,
            search_pool: 12,
            search_preferred_cost: 1,
            ex_cooldown_turns: 2,
            immovable_keyword: "IMMOVABLE".to_string(),
        }
    }
}

impl RulesConfig {
    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json_str(body: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Set AP per turn.
    #[must_use]
    pub fn with_ap_per_turn(mut self, ap: u32) -> Self {
        self.ap_per_turn = ap;
        self
    }

    /// Set the soft hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the hard field limit.
    #[must_use]
    pub fn with_field_limit(mut self, limit: usize) -> Self {
        self.field_limit = limit;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_opening_hand(mut self, size: usize) -> Self {
        self.opening_hand = size;
        self
    }

    /// Number of cards to draw at the start of a turn for a given hand size.
    #[must_use]
    pub fn turn_start_draw(&self, hand_size: usize) -> usize {
        if hand_size < self.low_hand_threshold {
            self.low_hand_draw
        } else {
            self.normal_draw
        }
    }
}

/// Client-side pacing and endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the authority API, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Interval between state polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Per-request timeout, in milliseconds.
    pub request_timeout_ms: u64,
    /// Log entries retained (oldest evicted first).
    pub log_capacity: usize,
    /// Notifications retained at once.
    pub notification_capacity: usize,
    /// Notification lifetime, in milliseconds.
    pub notification_ttl_ms: u64,
    /// Directory for the file-backed store, if any.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            poll_interval_ms: 1000,
            request_timeout_ms: 10_000,
            log_capacity: 200,
            notification_capacity: 6,
            notification_ttl_ms: 3500,
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json_str(body: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Defaults overridden by `DUEL_TOWER_API` / `DUEL_TOWER_STORAGE`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        if let Some(dir) = std::env::var_os(ENV_STORAGE_DIR) {
            config.storage_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the log capacity.
    #[must_use]
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    /// Set the storage directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Poll interval as a `Duration`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
