pub mod extract_catalog;
pub mod extract_detail;
pub mod extract_state;
pub mod fetch_page;

pub use extract_catalog::extract_catalog_entries;
pub use extract_detail::extract_detail;
pub use fetch_page::{HttpFetcher, PageFetcher};
