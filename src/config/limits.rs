use serde::{Deserialize, Serialize};

/// Rate limit settings. All limiter state lives in memory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Rolling window in which a client may cast one vote.
    /// TOML: `limits.vote_period_secs`. Default: `86400`.
    #[serde(default = "default_vote_period_secs")]
    pub vote_period_secs: u64,

    /// Requests per minute per client, all endpoints.
    /// TOML: `limits.requests_per_minute`. Default: `30`.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Requests per second per client, all endpoints.
    /// TOML: `limits.requests_per_second`. Default: `6`.
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Upper bound of the random delay before a 429 is sent. `0` disables it.
    /// TOML: `limits.max_penalty_secs`. Default: `15`.
    #[serde(default = "default_max_penalty_secs")]
    pub max_penalty_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            vote_period_secs: default_vote_period_secs(),
            requests_per_minute: default_requests_per_minute(),
            requests_per_second: default_requests_per_second(),
            max_penalty_secs: default_max_penalty_secs(),
        }
    }
}

fn default_vote_period_secs() -> u64 {
    24 * 60 * 60
}

fn default_requests_per_minute() -> u32 {
    30
}

fn default_requests_per_second() -> u32 {
    6
}

fn default_max_penalty_secs() -> u64 {
    15
}
