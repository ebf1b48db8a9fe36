use serde_json::Value;

use crate::errors::ExtractionError;
use crate::models::CatalogEntry;
use crate::scraping::extract_state::{extract_initial_state, walk};

/// Nested path to the catalog item list inside the hydration state.
const ITEM_LIST_PATH: [&str; 4] = ["shellReducer", "schema", "schema", "itemListElement"];

/// Extracts the catalog entries from a paginated listing page.
///
/// An item missing its `name` or `url` still yields an entry with the field
/// absent; only a missing or non-list item list fails the extraction.
pub fn extract_catalog_entries(html: &str) -> Result<Vec<CatalogEntry>, ExtractionError> {
    let state = extract_initial_state(html)?;

    let links = walk(&state, &ITEM_LIST_PATH)?;
    let items = links
        .as_array()
        .ok_or_else(|| ExtractionError::SchemaMismatch("itemListElement".to_string()))?;

    Ok(items
        .iter()
        .map(|item| CatalogEntry {
            medicine_name: item.get("name").and_then(Value::as_str).map(str::to_string),
            url: item.get("url").and_then(Value::as_str).map(str::to_string),
        })
        .collect())
}
