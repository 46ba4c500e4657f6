/// Persistence for decoded precipitation records.
///
/// Inserting is idempotent on the natural key (x, y, month, year): a record
/// whose key is already stored is skipped, otherwise every field is stored.
///
/// Both stores check for the key before inserting. That is only safe
/// because a run is single-threaded with one writer; concurrent writers
/// would need `INSERT ... ON CONFLICT DO NOTHING` against the primary key.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use postgres::{Client, NoTls};

use crate::error::Result;
use crate::logging::{self, Stage};
use crate::model::{NaturalKey, PrecipitationRecord};

/// What one `insert_records` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct InsertSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl InsertSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.skipped
    }
}

/// Destination for decoded records.
pub trait PrecipitationSink {
    fn insert_records(&mut self, records: &[PrecipitationRecord]) -> Result<InsertSummary>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS precipitation (
        x           INTEGER NOT NULL,
        y           INTEGER NOT NULL,
        month       INTEGER NOT NULL,
        year        INTEGER NOT NULL,
        value       INTEGER NOT NULL,
        ingested_at TIMESTAMPTZ NOT NULL,
        PRIMARY KEY (x, y, month, year)
    )";

const SELECT_BY_KEY: &str =
    "SELECT 1 FROM precipitation WHERE x = $1 AND y = $2 AND month = $3 AND year = $4";

const INSERT_RECORD: &str =
    "INSERT INTO precipitation (x, y, month, year, value, ingested_at)
     VALUES ($1, $2, $3, $4, $5, $6)";

/// Records stored in the `precipitation` table.
pub struct PgStore {
    client: Client,
}

impl PgStore {
    /// Connect and make sure the table exists.
    pub fn connect(database_url: &str) -> Result<Self> {
        let mut client = Client::connect(database_url, NoTls)?;
        client.batch_execute(CREATE_TABLE)?;
        logging::debug(Stage::Store, None, "precipitation table ready");
        Ok(Self { client })
    }

    /// Number of stored rows.
    pub fn count(&mut self) -> Result<i64> {
        let row = self.client.query_one("SELECT COUNT(*) FROM precipitation", &[])?;
        Ok(row.get(0))
    }

    /// Stored value for one key, if any.
    pub fn value_at(&mut self, key: NaturalKey) -> Result<Option<i32>> {
        let row = self.client.query_opt(
            "SELECT value FROM precipitation WHERE x = $1 AND y = $2 AND month = $3 AND year = $4",
            &[&key.x, &key.y, &key.month, &key.year],
        )?;
        Ok(row.map(|r| r.get(0)))
    }
}

impl PrecipitationSink for PgStore {
    /// All records go in one transaction; nothing is committed on error.
    fn insert_records(&mut self, records: &[PrecipitationRecord]) -> Result<InsertSummary> {
        let ingested_at: DateTime<Utc> = Utc::now();
        let mut summary = InsertSummary::default();
        let mut tx = self.client.transaction()?;

        for record in records {
            let existing = tx.query_opt(
                SELECT_BY_KEY,
                &[&record.x, &record.y, &record.month, &record.year],
            )?;
            if existing.is_some() {
                summary.skipped += 1;
                continue;
            }

            tx.execute(
                INSERT_RECORD,
                &[&record.x, &record.y, &record.month, &record.year, &record.value, &ingested_at],
            )?;
            summary.inserted += 1;
        }

        tx.commit()?;
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Store kept for the life of the process. Used when no database is
/// configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: HashMap<NaturalKey, i32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value_at(&self, key: NaturalKey) -> Option<i32> {
        self.rows.get(&key).copied()
    }
}

impl PrecipitationSink for MemoryStore {
    fn insert_records(&mut self, records: &[PrecipitationRecord]) -> Result<InsertSummary> {
        let mut summary = InsertSummary::default();
        for record in records {
            let key = record.natural_key();
            if self.rows.contains_key(&key) {
                summary.skipped += 1;
                continue;
            }
            self.rows.insert(key, record.value);
            summary.inserted += 1;
        }
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: i32, value: i32) -> PrecipitationRecord {
        PrecipitationRecord { x: 1, y: 2, month, year: 2000, value }
    }

    #[test]
    fn test_memory_store_inserts_new_records() {
        let mut store = MemoryStore::new();
        let summary = store.insert_records(&[record(1, 100), record(2, 200)]).unwrap();

        assert_eq!(summary, InsertSummary { inserted: 2, skipped: 0 });
        assert_eq!(store.len(), 2);
        assert_eq!(store.value_at(record(2, 0).natural_key()), Some(200));
    }

    #[test]
    fn test_memory_store_skips_existing_keys() {
        let mut store = MemoryStore::new();
        store.insert_records(&[record(1, 100)]).unwrap();

        // same key with a different value is still a duplicate
        let summary = store.insert_records(&[record(1, 999), record(2, 200)]).unwrap();

        assert_eq!(summary, InsertSummary { inserted: 1, skipped: 1 });
        assert_eq!(summary.total(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.value_at(record(1, 0).natural_key()), Some(100));
    }

    #[test]
    fn test_memory_store_dedupes_within_one_batch() {
        let mut store = MemoryStore::new();
        let summary = store.insert_records(&[record(3, 1), record(3, 2)]).unwrap();
        assert_eq!(summary, InsertSummary { inserted: 1, skipped: 1 });
    }

    #[test]
    fn test_key_includes_year() {
        let mut store = MemoryStore::new();
        let next_year = PrecipitationRecord { year: 2001, ..record(1, 100) };
        store.insert_records(&[record(1, 100), next_year]).unwrap();
        assert_eq!(store.len(), 2);
    }
}
