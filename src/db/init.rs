use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rusqlite::Connection;
use tokio::sync::Mutex;

/// Handle to the medicine store, passed by reference to every component that
/// persists or reads documents. There is no ambient global connection; the
/// handle is constructed once at startup and torn down on drop.
#[derive(Clone)]
pub struct Database {
    pub conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Opens the SQLite database at `path` and creates the "medicines" table
    /// if it does not exist yet.
    ///
    /// The `url` column carries the UNIQUE constraint that enforces the
    /// one-document-per-URL invariant; the autoincrement id stays internal
    /// and is never returned by the read path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the busy timeout
    /// cannot be set, or the table creation fails.
    pub fn open(path: &Path, busy_timeout_secs: u64) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("Failed to open SQLite database")?;

        conn.busy_timeout(Duration::from_secs(busy_timeout_secs))
            .context("Failed to set busy timeout")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS medicines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                medicine_name TEXT,
                retail_price REAL,
                discounted_price REAL,
                date_modified TEXT
            )",
            [],
        )
        .context("Failed to create medicines table")?;

        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }
}
