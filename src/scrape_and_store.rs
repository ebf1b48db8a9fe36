use colored::Colorize;
use futures::stream::{self, StreamExt};
use futures::pin_mut;
use url::Url;

use crate::config::AppConfig;
use crate::crawler::{crawl, scrape_catalog_page};
use crate::db::medicine_store::{insert_medicine, upsert_medicine};
use crate::db::Database;
use crate::errors::ScrapeError;
use crate::models::{CrawlSummary, DetailRecord, MedicineDocument};
use crate::scraping::{extract_detail, PageFetcher};

/// Runs one full crawl over the configured page range and upserts every
/// discovered entry, keyed by URL.
///
/// Page fetches run concurrently up to the configured bound; writes happen as
/// results arrive, so stored order across pages is not defined. A store fault
/// drops the affected item and the pass continues; per-page faults are
/// already contained inside the crawl.
pub async fn run_scheduled_scrape<F>(db: &Database, fetcher: &F, config: &AppConfig) -> CrawlSummary
where
    F: PageFetcher + ?Sized,
{
    let scraper = &config.scraper;
    println!(
        "{}",
        format!(
            "Starting crawl of pages {} to {}",
            scraper.start_page, scraper.end_page
        )
        .green()
    );

    let mut summary = CrawlSummary::default();

    let pages = stream::iter(scraper.start_page..scraper.end_page)
        .map(|page| async move { (page, scrape_catalog_page(fetcher, scraper, page).await) })
        .buffer_unordered(config.base.max_concurrency.max(1));
    pin_mut!(pages);

    while let Some((page, result)) = pages.next().await {
        let entries = match result {
            Ok(entries) => {
                summary.pages_scraped += 1;
                entries
            }
            Err(e) => {
                eprintln!("{}", format!("Failed to scrape page {}: {}", page, e).red());
                summary.pages_failed += 1;
                continue;
            }
        };

        for entry in entries {
            summary.items_discovered += 1;

            let Some(document) = MedicineDocument::from_catalog_entry(entry) else {
                summary.items_dropped += 1;
                continue;
            };

            match upsert_medicine(db, &document).await {
                Ok(()) => summary.items_stored += 1,
                Err(e) => {
                    eprintln!(
                        "{}",
                        format!("Failed to store document for {}: {}", document.url, e).red()
                    );
                    summary.items_dropped += 1;
                }
            }
        }
    }

    println!("{}", format!("Crawl finished: {}", summary).green());
    summary
}

/// One-time seeding pass: crawls the configured range and appends every
/// discovered entry without any upsert check. Meant to run against an empty
/// store; a duplicate URL is rejected by the store, logged and dropped.
pub async fn run_seed<F>(db: &Database, fetcher: &F, config: &AppConfig) -> CrawlSummary
where
    F: PageFetcher + ?Sized,
{
    let scraper = &config.scraper;
    let mut summary = CrawlSummary::default();

    let entries = crawl(
        fetcher,
        scraper,
        scraper.start_page,
        scraper.end_page,
        config.base.max_concurrency,
    );
    pin_mut!(entries);

    while let Some(entry) = entries.next().await {
        summary.items_discovered += 1;

        let Some(document) = MedicineDocument::from_catalog_entry(entry) else {
            summary.items_dropped += 1;
            continue;
        };

        match insert_medicine(db, &document).await {
            Ok(()) => summary.items_stored += 1,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Failed to seed URL {}: {}", document.url, e).red()
                );
                summary.items_dropped += 1;
            }
        }
    }

    println!("{}", format!("Seeding finished: {}", summary).green());
    summary
}

/// On-demand extraction of a single detail page. Nothing is persisted; the
/// record goes straight back to the caller, and unlike the multi-page crawl
/// every fault propagates since there is no next page to fall back to.
pub async fn extract_medicine_detail<F>(fetcher: &F, url: &str) -> Result<DetailRecord, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    let parsed = Url::parse(url).map_err(|_| ScrapeError::InvalidUrl(url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScrapeError::InvalidUrl(url.to_string()));
    }

    let html = fetcher.fetch(url).await?;
    let record = extract_detail(&html)?;

    Ok(record)
}
