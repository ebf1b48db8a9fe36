use thiserror::Error;

/// Network/HTTP layer failure. No retries happen at this level; the caller
/// decides whether a failed page is fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Structural drift in the source document. Each variant names the extraction
/// step that failed so a broken page is diagnosable from the log line alone.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("embedded state marker not found in document")]
    MarkerNotFound,

    #[error("embedded state is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("unexpected page structure at '{0}'")]
    SchemaMismatch(String),
}

/// Persistence-layer fault.
#[derive(Debug, Error)]
#[error("store operation failed: {0}")]
pub struct StoreError(#[from] pub rusqlite::Error);

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("the URL '{0}' is not acceptable, please verify its format")]
    InvalidUrl(String),
}
