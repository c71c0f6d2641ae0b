use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::model::DatabaseConfig;
use crate::error::ProbeError;
use crate::summary::result::TestResult;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS test_results (
    id BIGSERIAL PRIMARY KEY,
    timestamp_of_test TIMESTAMPTZ NOT NULL,
    load_time BIGINT NOT NULL,
    time_to_first_byte BIGINT NOT NULL,
    csv_url TEXT NOT NULL
)";

/// Postgres-backed store for summarized test results.
pub struct ResultStore {
    pool: PgPool,
}

impl ResultStore {
    /// Connect to the configured database and verify the connection with a
    /// round trip.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ProbeError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .connect(&config.connection_string())
            .await?;

        sqlx::query("SELECT 1").fetch_one(&pool).await?;

        log::info!(
            "Connected to PostgreSQL at {}:{}/{}",
            config.host,
            config.port,
            config.database
        );

        Ok(Self { pool })
    }

    /// Create the results table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), ProbeError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert one result row. Every call inserts; rerunning with the same
    /// remote test produces a second, distinct row.
    pub async fn insert_result(&self, result: &TestResult) -> Result<(), ProbeError> {
        sqlx::query(
            "INSERT INTO test_results (timestamp_of_test, load_time, time_to_first_byte, csv_url) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(result.timestamp_of_test)
        .bind(result.load_time)
        .bind(result.time_to_first_byte)
        .bind(&result.csv_url)
        .execute(&self.pool)
        .await?;

        log::debug!("Recorded result for {}", result.csv_url);

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
