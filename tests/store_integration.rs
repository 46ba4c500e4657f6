/// PostgreSQL store integration tests
///
/// Prerequisites:
/// - PostgreSQL running and reachable
/// - DATABASE_URL set (a .env file is read)
///
/// The tests use grid cells with negative coordinates, which a grim file
/// never produces, and delete them before and after.
///
/// Run with: cargo test --test store_integration -- --ignored --test-threads=1

use std::env;

use postgres::{Client, NoTls};
use precip_grid::model::{NaturalKey, PrecipitationRecord};
use precip_grid::store::{InsertSummary, PgStore, PrecipitationSink};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn database_url() -> String {
    dotenv::dotenv().ok();
    env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

fn cleanup_test_rows(url: &str) {
    let mut client = Client::connect(url, NoTls).expect("Failed to connect to test database");
    let _ = client.execute("DELETE FROM precipitation WHERE x < 0", &[]);
}

fn test_record(month: i32, value: i32) -> PrecipitationRecord {
    PrecipitationRecord { x: -1, y: -148, month, year: 1991, value }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore] // needs a live database
fn test_pg_store_insert_is_idempotent() {
    let url = database_url();
    let mut store = PgStore::connect(&url).expect("connect and create table");
    cleanup_test_rows(&url);

    let first = store.insert_records(&[test_record(1, 100), test_record(2, 200)]).unwrap();
    assert_eq!(first, InsertSummary { inserted: 2, skipped: 0 });

    // overlapping batch: one existing key (different value), one new
    let second = store.insert_records(&[test_record(2, 999), test_record(3, 300)]).unwrap();
    assert_eq!(second, InsertSummary { inserted: 1, skipped: 1 });

    let key = NaturalKey { x: -1, y: -148, year: 1991, month: 2 };
    assert_eq!(store.value_at(key).unwrap(), Some(200));

    cleanup_test_rows(&url);
}

#[test]
#[ignore] // needs a live database
fn test_pg_store_counts_rows() {
    let url = database_url();
    let mut store = PgStore::connect(&url).expect("connect and create table");
    cleanup_test_rows(&url);

    let before = store.count().unwrap();
    store.insert_records(&[test_record(4, 1), test_record(5, 2)]).unwrap();
    assert_eq!(store.count().unwrap(), before + 2);

    cleanup_test_rows(&url);
}
