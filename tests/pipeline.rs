use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::tempdir;

use med_scrape::config::{AppConfig, BaseConfig, DatabaseConfig, ScheduleConfig, ScraperConfig};
use med_scrape::db::medicine_store::list_medicines;
use med_scrape::db::Database;
use med_scrape::errors::{FetchError, ScrapeError};
use med_scrape::scrape_and_store::{extract_medicine_detail, run_scheduled_scrape, run_seed};
use med_scrape::scraping::PageFetcher;

/// Serves canned pages from memory and counts fetches.
struct ScriptedFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    fn new(pages: HashMap<String, String>) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn test_config(start_page: u32, end_page: u32) -> AppConfig {
    AppConfig {
        base: BaseConfig {
            name: "med_scrape".to_string(),
            version: "0.1.0".to_string(),
            max_concurrency: 2,
        },
        scraper: ScraperConfig {
            user_agent: "test-agent".to_string(),
            listing_url: "https://x/all?page=".to_string(),
            start_page,
            end_page,
            min_delay_ms: 0,
            max_delay_ms: 0,
            fetch_timeout_secs: 5,
        },
        schedule: ScheduleConfig {
            cron: "0 0 18 * * *".to_string(),
        },
        database: DatabaseConfig {
            path: "medicines.sqlite".to_string(),
            busy_timeout_secs: 5,
        },
    }
}

fn listing_page(items: &str) -> String {
    format!(
        "<html><script>window.__INITIAL_STATE__ = {{\"shellReducer\":{{\"schema\":{{\"schema\":{{\"itemListElement\":{items}}}}}}}}};\n</script></html>"
    )
}

fn open_store(dir: &tempfile::TempDir) -> Database {
    Database::open(&dir.path().join("medicines.sqlite"), 5).unwrap()
}

#[tokio::test]
async fn crawl_upserts_each_discovered_url_exactly_once() {
    let dir = tempdir().unwrap();
    let db = open_store(&dir);
    let config = test_config(1, 2);

    let mut pages = HashMap::new();
    pages.insert(
        "https://x/all?page=1".to_string(),
        listing_page(
            r#"[{"name":"Paracetamol","url":"https://x/p1"},{"name":"Aspirin","url":"https://x/p2"}]"#,
        ),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let summary = run_scheduled_scrape(&db, &fetcher, &config).await;
    assert_eq!(summary.pages_scraped, 1);
    assert_eq!(summary.items_stored, 2);

    // A second identical run must leave exactly two documents, not four.
    let summary = run_scheduled_scrape(&db, &fetcher, &config).await;
    assert_eq!(summary.items_stored, 2);

    let stored = list_medicines(&db, 10).await.unwrap();
    assert_eq!(stored.len(), 2);
    let mut urls: Vec<_> = stored.iter().map(|d| d.url.as_str()).collect();
    urls.sort_unstable();
    assert_eq!(urls, vec!["https://x/p1", "https://x/p2"]);
}

#[tokio::test]
async fn crawl_tolerates_a_marker_less_page_mid_range() {
    let dir = tempdir().unwrap();
    let db = open_store(&dir);
    let config = test_config(1, 5);

    let mut pages = HashMap::new();
    for page in [1u32, 2, 4] {
        pages.insert(
            format!("https://x/all?page={page}"),
            listing_page(&format!(
                r#"[{{"name":"Medicine {page}","url":"https://x/p{page}"}}]"#
            )),
        );
    }
    pages.insert(
        "https://x/all?page=3".to_string(),
        "<html><body>no hydration state on this page</body></html>".to_string(),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let summary = run_scheduled_scrape(&db, &fetcher, &config).await;

    assert_eq!(summary.pages_scraped, 3);
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.items_stored, 3);
    assert_eq!(list_medicines(&db, 10).await.unwrap().len(), 3);
}

#[tokio::test]
async fn entries_without_a_url_are_dropped_not_fatal() {
    let dir = tempdir().unwrap();
    let db = open_store(&dir);
    let config = test_config(1, 2);

    let mut pages = HashMap::new();
    pages.insert(
        "https://x/all?page=1".to_string(),
        listing_page(r#"[{"name":"Unlinked"},{"name":"Aspirin","url":"https://x/p2"}]"#),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let summary = run_scheduled_scrape(&db, &fetcher, &config).await;

    assert_eq!(summary.items_discovered, 2);
    assert_eq!(summary.items_stored, 1);
    assert_eq!(summary.items_dropped, 1);
}

#[tokio::test]
async fn seeding_twice_drops_duplicates_loudly() {
    let dir = tempdir().unwrap();
    let db = open_store(&dir);
    let config = test_config(1, 2);

    let mut pages = HashMap::new();
    pages.insert(
        "https://x/all?page=1".to_string(),
        listing_page(r#"[{"name":"Paracetamol","url":"https://x/p1"}]"#),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let first = run_seed(&db, &fetcher, &config).await;
    assert_eq!(first.items_stored, 1);

    // The append-only path never upserts; the unique key rejects the rerun.
    let second = run_seed(&db, &fetcher, &config).await;
    assert_eq!(second.items_stored, 0);
    assert_eq!(second.items_dropped, 1);

    assert_eq!(list_medicines(&db, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_url_is_rejected_before_any_fetch() {
    let fetcher = ScriptedFetcher::new(HashMap::new());

    let err = extract_medicine_detail(&fetcher, "not a url").await.unwrap_err();
    assert!(matches!(err, ScrapeError::InvalidUrl(_)));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn on_demand_extraction_returns_the_detail_record() {
    let mut pages = HashMap::new();
    pages.insert(
        "https://x/p1".to_string(),
        "<html><body><h1>Paracetamol 500mg</h1><script>window.__INITIAL_STATE__ = {\"drugPageReducer\":{\"dynamicData\":{\"priceBox\":{\"priceList\":[{\"mrp\":{\"price\":30.5},\"discount\":{\"price\":25.0}}]}}}};\n</script></body></html>"
            .to_string(),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let record = extract_medicine_detail(&fetcher, "https://x/p1").await.unwrap();
    assert_eq!(record.medicine_name, "Paracetamol 500mg");
    assert_eq!(record.retail_price, Some(30.5));
    assert_eq!(record.discounted_price, Some(25.0));
}

#[tokio::test]
async fn on_demand_extraction_propagates_fetch_failures() {
    let fetcher = ScriptedFetcher::new(HashMap::new());

    let err = extract_medicine_detail(&fetcher, "https://x/missing").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Fetch(FetchError::Status { status: 404, .. })));
}
