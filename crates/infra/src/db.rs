//! Database adapters (connection pools).

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::repository::RepositoryError;

/// Open a Postgres pool shared by every repository in the process.
///
/// Connects eagerly so a bad URL or unreachable server fails startup instead
/// of the first request.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, RepositoryError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| RepositoryError::Backend(format!("failed to connect to database: {e}")))
}
