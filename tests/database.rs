//! PostgreSQL backend tests. Run with `DATABASE_URL` pointing at a server
//! where the test user may create databases:
//! `cargo test --test database -- --ignored`

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;

use ais_watch::{
    database::Database,
    models::Mmsi,
    store::{SeenVesselBackend, SightingStore},
};
use std::sync::Arc;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
}

fn mmsi(value: u32) -> Mmsi {
    Mmsi::try_from(value).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_upsert_keeps_latest(pool: PgPool) {
    let db = Database::new(pool.clone()).await.unwrap();

    db.upsert(mmsi(257_000_001), at(10)).await.unwrap();
    db.upsert(mmsi(257_000_001), at(12)).await.unwrap();
    // An older sighting arriving late does not move last_seen back
    db.upsert(mmsi(257_000_001), at(11)).await.unwrap();

    let stored: DateTime<Utc> =
        sqlx::query_scalar("SELECT last_seen FROM seen_vessels WHERE mmsi = $1")
            .bind(257_000_001i32)
            .fetch_one(&pool)
            .await
            .expect("Failed to retrieve row");
    assert_eq!(stored, at(12));
    assert_eq!(db.count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_delete_older_than(pool: PgPool) {
    let db = Database::new(pool).await.unwrap();

    db.upsert(mmsi(999), at(1)).await.unwrap();
    db.upsert(mmsi(123), at(10)).await.unwrap();
    db.upsert(mmsi(230_123_456), at(12)).await.unwrap();

    let deleted = db.delete_older_than(at(10)).await.unwrap();
    assert_eq!(deleted, 1);

    let rows = db.load_all().await.unwrap();
    let remaining: Vec<u32> = rows.iter().map(|row| row.mmsi.value()).collect();
    assert_eq!(remaining, vec![123, 230_123_456]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_missing_table_is_recreated(pool: PgPool) {
    let db = Database::new(pool.clone()).await.unwrap();

    sqlx::query("DROP TABLE seen_vessels")
        .execute(&pool)
        .await
        .unwrap();

    // Reads report an empty table and recreate it
    assert!(db.load_all().await.unwrap().is_empty());
    let exists: bool = sqlx::query_scalar("SELECT to_regclass('seen_vessels') IS NOT NULL")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(exists);

    // Writes retry once after recreating it
    sqlx::query("DROP TABLE seen_vessels")
        .execute(&pool)
        .await
        .unwrap();
    db.upsert(mmsi(123), at(10)).await.unwrap();
    assert_eq!(db.count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_store_survives_restart(pool: PgPool) {
    let db = Arc::new(Database::new(pool.clone()).await.unwrap());

    let store = SightingStore::open(db.clone()).await;
    assert!(store.observe(mmsi(123), at(10)).await);
    drop(store);

    let reopened = SightingStore::open(Arc::new(Database::new(pool).await.unwrap())).await;
    assert!(reopened.is_known(mmsi(123)).await);
    assert!(!reopened.observe(mmsi(123), at(11)).await);

    assert_eq!(reopened.clear_all().await.unwrap(), 1);
    assert!(!reopened.is_known(mmsi(123)).await);
    assert_eq!(db.count().await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_upserts_keep_one_row(pool: PgPool) {
    let db = Arc::new(Database::new(pool).await.unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                db.upsert(mmsi(123), at(10) + Duration::minutes(i)).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let rows = db.load_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].last_seen, at(10) + Duration::minutes(7));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_upsert_reports_insert(pool: PgPool) {
    let db = Database::new(pool).await.unwrap();

    assert!(db.upsert(mmsi(123), at(10)).await.unwrap());
    assert!(!db.upsert(mmsi(123), at(11)).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_stores_sharing_a_table_announce_once(pool: PgPool) {
    let first = SightingStore::open(Arc::new(Database::new(pool.clone()).await.unwrap())).await;
    let second = SightingStore::open(Arc::new(Database::new(pool).await.unwrap())).await;

    // Both caches start empty; the table decides
    let (a, b) = tokio::join!(
        first.observe(mmsi(123), at(10)),
        second.observe(mmsi(123), at(10))
    );
    assert!(a ^ b, "exactly one store may announce the arrival");
    assert!(first.is_known(mmsi(123)).await);
    assert!(second.is_known(mmsi(123)).await);
}
