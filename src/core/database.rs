use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Connect to Postgres, retrying with exponential backoff (1s, 2s, 4s, ...)
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 1;

    loop {
        match connect(config).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < config.connect_max_retries => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {:?}...",
                    attempt,
                    config.connect_max_retries,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

fn backoff_delay(attempt: u32) -> Duration {
    // Capped so a large retry count cannot overflow the shift
    Duration::from_secs(1 << (attempt - 1).min(6))
}
