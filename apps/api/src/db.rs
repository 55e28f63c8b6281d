use anyhow::{Context, Result};
use redis::aio::MultiplexedConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Opens a multiplexed Redis connection used for session records.
/// The connection is cheap to clone and safe to share across tasks.
pub async fn create_redis(redis_url: &str) -> Result<MultiplexedConnection> {
    let client = redis::Client::open(redis_url).context("Invalid REDIS_URL")?;
    let conn = client
        .get_multiplexed_async_connection()
        .await
        .context("Failed to connect to Redis")?;

    info!("Redis connection established");
    Ok(conn)
}
