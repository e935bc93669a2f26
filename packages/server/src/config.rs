use common::TieBreak;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret of the identity service that issues bearer tokens.
    pub jwt_secret: String,
}

/// Leaderboard recomputation settings.
#[derive(Debug, Deserialize, Clone)]
pub struct LeaderboardConfig {
    /// Run both scorers periodically inside the server process.
    #[serde(default = "default_scheduler_enabled")]
    pub scheduler_enabled: bool,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Order of directors with equal scores.
    #[serde(default)]
    pub creator_tie_break: TieBreak,
    /// Rows per INSERT when writing a snapshot.
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,
}

fn default_scheduler_enabled() -> bool {
    true
}
fn default_refresh_interval_secs() -> u64 {
    15 * 60
}
fn default_insert_batch_size() -> usize {
    100
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            scheduler_enabled: default_scheduler_enabled(),
            refresh_interval_secs: default_refresh_interval_secs(),
            creator_tie_break: TieBreak::default(),
            insert_batch_size: default_insert_batch_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SPOTLIGHT__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("SPOTLIGHT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
