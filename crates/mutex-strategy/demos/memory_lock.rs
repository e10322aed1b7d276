//! Example: strategy-agnostic code running on the in-process store
//!
//! Run with: `cargo run --example memory_lock`

use mutex_strategy::*;
use std::sync::Arc;
use std::time::Duration;

/// Works with any strategy.
async fn run_once<S: LockStrategy>(strategy: &S, worker: usize) -> LockResult<()> {
    let options = AcquireOptions::new()
        .max_wait(Duration::from_millis(700))
        .lock_duration(Duration::from_secs(2));

    match strategy.acquire("report:nightly", options).await {
        Ok(lock) => {
            println!("worker {worker}: building report as {}", lock.ownership_token);
            tokio::time::sleep(Duration::from_secs(1)).await;
            strategy.release(&lock.key, &lock.ownership_token).await?;
            println!("worker {worker}: done");
            Ok(())
        }
        Err(LockError::Timeout(_)) => {
            println!("worker {worker}: someone else is on it");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryLockStore::new();

    let mut workers = Vec::new();
    for worker in 0..3 {
        let strategy = Arc::new(MemoryLockStrategy::new(store.clone()));
        workers.push(tokio::spawn(async move { run_once(strategy.as_ref(), worker).await }));
    }

    for worker in workers {
        worker.await??;
    }
    Ok(())
}
