//! Connection pool for a clone run.
//!
//! A run issues one statement at a time, so the pool stays at a couple of
//! connections.

use std::time::{Duration, Instant};

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

use msclone_core::defaults::{
    POOL_CONNECT_TIMEOUT_SECS, POOL_IDLE_TIMEOUT_SECS, POOL_MAX_CONNECTIONS,
};
use msclone_core::{Error, Result};

/// Pool options used for every run.
pub fn pool_options() -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(POOL_CONNECT_TIMEOUT_SECS))
        .idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
}

/// Connect to the network database.
pub async fn create_pool(database_url: &str) -> Result<MySqlPool> {
    let start = Instant::now();
    let pool = pool_options()
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections = POOL_MAX_CONNECTIONS,
        duration_ms = start.elapsed().as_millis() as u64,
        "Connected to database"
    );
    Ok(pool)
}

/// Log pool size and idle connections at debug level.
pub fn log_pool_metrics(pool: &MySqlPool) {
    debug!(
        subsystem = "db",
        component = "pool",
        op = "metrics",
        pool_size = pool.size(),
        pool_idle = pool.num_idle(),
        "Pool state"
    );
}
