// src/database.rs
mod models;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{
    errors::AisWatchError,
    models::{Mmsi, SeenVessel},
    store::SeenVesselBackend,
};
use models::SeenVesselRow;

/// PostgreSQL error code for "undefined_table"
const UNDEFINED_TABLE: &str = "42P01";

/// PostgreSQL-backed store of seen vessels
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to the database and run migrations
    pub async fn from_url(url: &str, max_connections: u32) -> Result<Self, AisWatchError> {
        info!("Connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Self::new(pool).await
    }

    /// Wrap an existing pool, running migrations
    pub async fn new(pool: PgPool) -> Result<Self, AisWatchError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Create table `seen_vessels` and its index if missing
    async fn ensure_table(&self) -> Result<(), AisWatchError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS seen_vessels (
                mmsi INTEGER PRIMARY KEY,
                last_seen TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_seen_vessels_last_seen ON seen_vessels (last_seen)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Recreate the table if `err` says it is missing, otherwise hand the
    /// error back.
    async fn recover_missing_table(&self, err: sqlx::Error) -> Result<(), AisWatchError> {
        if !is_missing_table(&err) {
            return Err(err.into());
        }
        warn!("Table seen_vessels is missing, recreating it");
        self.ensure_table().await
    }

    /// Upsert in one statement, returning true when the row was inserted.
    /// `xmax` is zero only for a tuple this statement created.
    async fn try_upsert(&self, mmsi: Mmsi, at: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "INSERT INTO seen_vessels (mmsi, last_seen) VALUES ($1, $2)
             ON CONFLICT (mmsi) DO UPDATE
             SET last_seen = GREATEST(seen_vessels.last_seen, EXCLUDED.last_seen)
             RETURNING (xmax = 0) AS inserted",
        )
        .bind(mmsi.value() as i32)
        .bind(at)
        .fetch_one(&self.pool)
        .await
    }
}

fn is_missing_table(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNDEFINED_TABLE),
        _ => false,
    }
}

#[async_trait]
impl SeenVesselBackend for Database {
    async fn load_all(&self) -> Result<Vec<SeenVessel>, AisWatchError> {
        let rows = match sqlx::query_as::<_, SeenVesselRow>(
            "SELECT mmsi, last_seen FROM seen_vessels ORDER BY mmsi",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(rows) => rows,
            Err(e) => {
                self.recover_missing_table(e).await?;
                return Ok(Vec::new());
            }
        };

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let raw = row.mmsi;
                SeenVessel::try_from(row)
                    .map_err(|e| warn!("Skipping stored row with MMSI {}: {}", raw, e))
                    .ok()
            })
            .collect())
    }

    async fn upsert(&self, mmsi: Mmsi, at: DateTime<Utc>) -> Result<bool, AisWatchError> {
        match self.try_upsert(mmsi, at).await {
            Ok(inserted) => Ok(inserted),
            Err(e) => {
                self.recover_missing_table(e).await?;
                Ok(self.try_upsert(mmsi, at).await?)
            }
        }
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AisWatchError> {
        match sqlx::query("DELETE FROM seen_vessels WHERE last_seen < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
        {
            Ok(result) => Ok(result.rows_affected()),
            Err(e) => {
                self.recover_missing_table(e).await?;
                Ok(0)
            }
        }
    }

    async fn delete_all(&self) -> Result<u64, AisWatchError> {
        match sqlx::query("DELETE FROM seen_vessels")
            .execute(&self.pool)
            .await
        {
            Ok(result) => Ok(result.rows_affected()),
            Err(e) => {
                self.recover_missing_table(e).await?;
                Ok(0)
            }
        }
    }

    async fn count(&self) -> Result<i64, AisWatchError> {
        match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM seen_vessels")
            .fetch_one(&self.pool)
            .await
        {
            Ok(count) => Ok(count),
            Err(e) => {
                self.recover_missing_table(e).await?;
                Ok(0)
            }
        }
    }
}
