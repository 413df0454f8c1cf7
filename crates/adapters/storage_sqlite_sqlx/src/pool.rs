//! `SQLite` connection pool setup, schema bootstrap, and startup retry.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

const CREATE_INVENTORY_TABLE: &str = "CREATE TABLE IF NOT EXISTS inventory (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    inventory_name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    photo TEXT
)";

/// Configuration for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:stockroom.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and creates the `inventory` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or table creation fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self.database_url).await
    }

    /// Like [`build`](Self::build), but keeps trying every `interval` until
    /// the database is reachable. There is no attempt limit.
    pub async fn build_with_retry(self, interval: Duration) -> Database {
        let mut attempt: u32 = 1;
        loop {
            match Database::initialize(&self.database_url).await {
                Ok(db) => {
                    tracing::info!(attempt, "database ready");
                    return db;
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        attempt,
                        retry_in = ?interval,
                        "database unavailable, retrying"
                    );
                    attempt = attempt.saturating_add(1);
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and make sure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or table creation fails.
    async fn initialize(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to `:memory:` opens its own empty database, so the
        // pool must hold on to exactly one connection.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options.connect_with(options).await?;

        sqlx::query(CREATE_INVENTORY_TABLE).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
