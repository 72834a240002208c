//! On-disk transaction-history store backed by SQLite.
//!
//! One row per cache key. Entries carry no TTL: a completed block range's
//! history is append-only, so rows live until explicitly invalidated. A
//! present row with an empty history is distinct from an absent row.

use crate::cache::keys::TxCacheKey;
use crate::models::TransactionHistory;
use sqlx::{migrate::MigrateDatabase, Pool, Row, Sqlite, SqlitePool};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use thiserror::Error;

const INIT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tx_history (
    address TEXT NOT NULL,
    start_block INTEGER NOT NULL,
    end_block INTEGER NOT NULL,
    fetched_at INTEGER NOT NULL,
    history TEXT NOT NULL,
    PRIMARY KEY (address, start_block, end_block)
);
"#;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct CacheStore {
    pool: Pool<Sqlite>,
}

impl CacheStore {
    /// Open (or create) the store under the cache directory. The directory
    /// is created on demand.
    pub async fn connect(cache_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(cache_dir)?;
        let database_url = format!("sqlite:{}", cache_dir.join("transactions.db").display());

        if !Sqlite::database_exists(&database_url).await.unwrap_or(false) {
            Sqlite::create_database(&database_url).await?;
        }

        let pool = SqlitePool::connect(&database_url).await?;

        // WAL keeps concurrent readers off the writers' backs
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        sqlx::query(INIT_SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// In-memory store; a single connection so every query sees one database.
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        sqlx::query(INIT_SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn get(&self, key: &TxCacheKey) -> Result<Option<TransactionHistory>, StoreError> {
        let row = sqlx::query(
            r#"SELECT history FROM tx_history
               WHERE address = ? AND start_block = ? AND end_block = ?"#,
        )
        .bind(key.address())
        .bind(key.start_block() as i64)
        .bind(key.end_block() as i64)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let json: String = row.get("history");
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    pub async fn insert(
        &self,
        key: &TxCacheKey,
        history: &TransactionHistory,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(history)?;
        let fetched_at = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"INSERT INTO tx_history (address, start_block, end_block, fetched_at, history)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(address, start_block, end_block) DO UPDATE SET
                   fetched_at = excluded.fetched_at,
                   history = excluded.history"#,
        )
        .bind(key.address())
        .bind(key.start_block() as i64)
        .bind(key.end_block() as i64)
        .bind(fetched_at)
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop every stored range for an address. Returns the number of rows
    /// removed.
    pub async fn invalidate_address(&self, address: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tx_history WHERE address = ?")
            .bind(address.to_lowercase())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
