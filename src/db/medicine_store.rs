use chrono::Utc;
use rusqlite::params;

use crate::db::Database;
use crate::errors::StoreError;
use crate::models::MedicineDocument;

/// Inserts the document, or replaces the stored fields wholesale when a
/// document with the same `url` already exists. Fields are replaced, not
/// merged, so re-crawling a URL always leaves the latest scrape.
///
/// A single statement, so the write is atomic and repeating the same call is
/// idempotent.
pub async fn upsert_medicine(db: &Database, document: &MedicineDocument) -> Result<(), StoreError> {
    let conn = db.conn.lock().await;
    let date_modified = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO medicines (url, medicine_name, retail_price, discounted_price, date_modified)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(url) DO UPDATE SET
            medicine_name = excluded.medicine_name,
            retail_price = excluded.retail_price,
            discounted_price = excluded.discounted_price,
            date_modified = excluded.date_modified",
        params![
            document.url,
            document.medicine_name,
            document.retail_price,
            document.discounted_price,
            date_modified
        ],
    )?;

    Ok(())
}

/// Append-only insert used when seeding URLs for later detail scraping.
///
/// This path deliberately performs no upsert; it is meant to run against an
/// empty collection. The UNIQUE constraint on `url` rejects a duplicate seed
/// loudly instead of silently deduplicating it.
pub async fn insert_medicine(db: &Database, document: &MedicineDocument) -> Result<(), StoreError> {
    let conn = db.conn.lock().await;
    let date_modified = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO medicines (url, medicine_name, retail_price, discounted_price, date_modified)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            document.url,
            document.medicine_name,
            document.retail_price,
            document.discounted_price,
            date_modified
        ],
    )?;

    Ok(())
}

/// Returns up to `limit` stored documents. The internal row id is excluded;
/// callers must not rely on any particular ordering.
pub async fn list_medicines(db: &Database, limit: u32) -> Result<Vec<MedicineDocument>, StoreError> {
    let conn = db.conn.lock().await;
    let mut stmt = conn.prepare(
        "SELECT url, medicine_name, retail_price, discounted_price FROM medicines LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok(MedicineDocument {
            url: row.get(0)?,
            medicine_name: row.get(1)?,
            retail_price: row.get(2)?,
            discounted_price: row.get(3)?,
        })
    })?;

    let mut documents = Vec::new();
    for document in rows {
        documents.push(document?);
    }

    Ok(documents)
}
