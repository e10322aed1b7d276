//! Example: running a migration once across processes with Redis
//!
//! Run with: `cargo run --example redis_lock`
//!
//! Requires a Redis server. Set REDIS_URL environment variable
//! or modify the URL below. Start several copies at once: only one
//! runs the migration, the others time out.

use mutex_strategy::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get Redis URL from environment or use default
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

    let strategy = RedisLockStrategy::builder()
        .connection_string(&redis_url)
        .release_mode(ReleaseMode::CompareAndDelete)
        .build()?;
    strategy.wait_for_connect().await?;
    tracing::info!(instance = strategy.instance_id(), "connected to Redis");

    let options = AcquireOptions::new()
        .max_wait(Duration::from_secs(2))
        .lock_duration(Duration::from_secs(30));

    let outcome = strategy
        .with_lock("job:migrate", options, |lock| async move {
            tracing::info!(token = %lock.ownership_token, "lock acquired, migrating");
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, LockError>(())
        })
        .await;

    match outcome {
        Ok(()) => tracing::info!("migration finished, lock released"),
        Err(LockError::Timeout(waited)) => {
            tracing::info!(?waited, "another process is migrating, skipping")
        }
        Err(err) => return Err(err.into()),
    }

    // Wait for the connection to shut down before exiting
    strategy.close().await?;
    Ok(())
}
