use scraper::{Html, Selector};
use serde_json::Value;

use crate::errors::ExtractionError;
use crate::models::DetailRecord;
use crate::scraping::extract_state::{extract_initial_state, walk};

/// Nested path to the price list inside the hydration state.
const PRICE_LIST_PATH: [&str; 4] = ["drugPageReducer", "dynamicData", "priceBox", "priceList"];

/// Extracts the detail record from a single medicine page.
///
/// The name comes from the page's first `<h1>`, not the JSON blob; the two
/// can disagree and the heading is authoritative. An empty price list yields
/// absent prices rather than a failure.
pub fn extract_detail(html: &str) -> Result<DetailRecord, ExtractionError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h1").unwrap();

    let medicine_name = document
        .select(&selector)
        .next()
        .map(|heading| heading.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ExtractionError::SchemaMismatch("h1".to_string()))?;

    let state = extract_initial_state(html)?;
    let price_list = walk(&state, &PRICE_LIST_PATH)?;
    let prices = price_list
        .as_array()
        .ok_or_else(|| ExtractionError::SchemaMismatch("priceList".to_string()))?;

    let (retail_price, discounted_price) = match prices.first() {
        Some(entry) => (
            entry.get("mrp").and_then(|v| v.get("price")).and_then(Value::as_f64),
            entry.get("discount").and_then(|v| v.get("price")).and_then(Value::as_f64),
        ),
        None => (None, None),
    };

    Ok(DetailRecord {
        medicine_name,
        retail_price,
        discounted_price,
    })
}
