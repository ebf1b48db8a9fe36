use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub scraper: ScraperConfig,
    pub schedule: ScheduleConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseConfig {
    pub name: String,
    pub version: String,
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Identity header sent with every outbound request.
    pub user_agent: String,
    /// Paginated listing URL; the page number is appended as-is.
    pub listing_url: String,
    pub start_page: u32,
    pub end_page: u32,
    /// Bounds for the random delay applied before each page fetch.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression with seconds field, e.g. "0 0 18 * * *".
    pub cron: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub busy_timeout_secs: u64,
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::new("Settings.toml", config::FileFormat::Toml))
        .add_source(Environment::with_prefix("APP"))
        .build()?;

    settings.try_deserialize::<AppConfig>()
}
