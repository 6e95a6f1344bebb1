use serde::Deserialize;

use yamdb_core::config::Config;

/// Reviews service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsConfig {
    /// Database connection URL (`postgres://…` or `sqlite::memory:`).
    pub database_url: String,
    /// HMAC key for confirmation codes. Env var: `SECRET_KEY`.
    pub secret_key: String,
    /// Maximum slug length (default 50). Env var: `SLUG_MAX_LEN`.
    #[serde(default = "default_slug_max_len")]
    pub slug_max_len: usize,
    /// Confirmation code lifetime in seconds (default 3 days).
    #[serde(default = "default_confirmation_code_ttl_secs")]
    pub confirmation_code_ttl_secs: i64,
}

fn default_slug_max_len() -> usize {
    50
}

fn default_confirmation_code_ttl_secs() -> i64 {
    3 * 24 * 60 * 60
}

impl Config for ReviewsConfig {}

impl ReviewsConfig {
    pub fn confirmation_code_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.confirmation_code_ttl_secs)
    }
}
