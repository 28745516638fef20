//! Bounded retry: run an async operation up to a fixed attempt budget,
//! returning the first success or the last error once the budget is spent.

use std::future::Future;

use tracing::warn;

/// The operation always runs at least once; intermediate failures are
/// logged at `warn` with the attempt count.
pub async fn bounded<T, E, F, Fut>(max_attempts: u32, mut op: F) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, "attempt failed: {e}; retrying");
            }
            Err(e) => return Err(e),
        }
    }
}
