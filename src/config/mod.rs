pub mod config;

pub use config::{
    load_config, AppConfig, BaseConfig, DatabaseConfig, ScheduleConfig, ScraperConfig,
};
