use std::fmt;

use serde::{Deserialize, Serialize};

/// One item from a paginated catalog page. Either field may be missing when
/// the source page omits it; nothing is deduplicated at extraction time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub medicine_name: Option<String>,
    pub url: Option<String>,
}

/// Pricing data from a single detail page. Prices are absent when the page
/// carries no active price list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailRecord {
    pub medicine_name: String,
    pub retail_price: Option<f64>,
    pub discounted_price: Option<f64>,
}

/// Persisted form of a catalog entry, uniquely keyed by `url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineDocument {
    pub url: String,
    pub medicine_name: Option<String>,
    pub retail_price: Option<f64>,
    pub discounted_price: Option<f64>,
}

impl MedicineDocument {
    /// Entries without a URL cannot be keyed and are not persistable.
    pub fn from_catalog_entry(entry: CatalogEntry) -> Option<Self> {
        let url = entry.url?;
        Some(Self {
            url,
            medicine_name: entry.medicine_name,
            retail_price: None,
            discounted_price: None,
        })
    }
}

/// Outcome of one crawl-and-store pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlSummary {
    pub pages_scraped: u32,
    pub pages_failed: u32,
    pub items_discovered: usize,
    pub items_stored: usize,
    pub items_dropped: usize,
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages scraped ({} failed), {} items discovered, {} stored, {} dropped",
            self.pages_scraped,
            self.pages_failed,
            self.items_discovered,
            self.items_stored,
            self.items_dropped
        )
    }
}
