use colored::Colorize;
use futures::stream::{self, Stream, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{sleep, Duration};

use crate::config::ScraperConfig;
use crate::errors::ScrapeError;
use crate::models::CatalogEntry;
use crate::scraping::{extract_catalog_entries, PageFetcher};

/// Builds the canonical paginated listing URL for a page number.
pub fn catalog_page_url(listing_url: &str, page: u32) -> String {
    format!("{listing_url}{page}")
}

/// Fetches and extracts one catalog page.
pub async fn scrape_catalog_page<F>(
    fetcher: &F,
    config: &ScraperConfig,
    page: u32,
) -> Result<Vec<CatalogEntry>, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    if config.max_delay_ms > 0 {
        let delay = StdRng::from_entropy().gen_range(config.min_delay_ms..=config.max_delay_ms);
        sleep(Duration::from_millis(delay)).await;
    }

    let url = catalog_page_url(&config.listing_url, page);
    let html = fetcher.fetch(&url).await?;
    let entries = extract_catalog_entries(&html)?;

    Ok(entries)
}

/// Crawls page numbers from `start_page` inclusive to `end_page` exclusive,
/// yielding discovered catalog entries as a lazy, single-pass stream.
///
/// Up to `max_concurrency` pages are in flight at once; entry order across
/// pages is not guaranteed. A failed page is logged with its page number and
/// contributes zero items; a single bad page never aborts the range. The
/// stream is finite and not restartable mid-range.
pub fn crawl<'a, F>(
    fetcher: &'a F,
    config: &'a ScraperConfig,
    start_page: u32,
    end_page: u32,
    max_concurrency: usize,
) -> impl Stream<Item = CatalogEntry> + 'a
where
    F: PageFetcher + ?Sized,
{
    stream::iter(start_page..end_page)
        .map(move |page| async move {
            match scrape_catalog_page(fetcher, config, page).await {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("{}", format!("Failed to scrape page {}: {}", page, e).red());
                    Vec::new()
                }
            }
        })
        .buffer_unordered(max_concurrency.max(1))
        .flat_map(stream::iter)
}
