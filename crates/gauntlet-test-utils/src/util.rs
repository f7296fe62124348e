//! Small helpers shared by steps and runners.

use std::time::Duration;

use tokio::time::sleep;

/// Retry an async operation with exponential backoff.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation: F,
    retries: usize,
    initial_delay_ms: u64,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut delay_ms = initial_delay_ms;
    let mut remaining_retries = retries;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                if remaining_retries == 0 {
                    return Err(err);
                }

                // Add jitter to avoid thundering herd
                let jitter = rand::random::<u64>() % 20;
                sleep(Duration::from_millis(delay_ms + jitter)).await;

                // Exponential backoff
                delay_ms *= 2;
                remaining_retries -= 1;
            }
        }
    }
}
