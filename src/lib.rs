pub mod config;
pub mod crawler;
pub mod db;
pub mod errors;
pub mod models;
pub mod scheduler;
pub mod scrape_and_store;
pub mod scraping;
