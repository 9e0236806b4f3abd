use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

/// Polls until `check` yields a value or `max_wait` elapses.
///
/// # Arguments
/// * `check` - Closure returning `Ok(Some(value))` when done, `Ok(None)` to keep polling
/// * `max_wait` - Maximum time to wait before giving up
/// * `poll_interval` - Time to sleep between polls
/// * `operation_name` - Name of the operation for logging
///
/// # Returns
/// * `Some(value)` - Condition was met within the timeout
/// * `None` - Timeout reached (errors are logged and polling continues)
pub async fn poll_until_some<T, E, F, Fut>(
    check: F,
    max_wait: Duration,
    poll_interval: Duration,
    operation_name: &str,
) -> Option<T>
where
    E: Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let start = tokio::time::Instant::now();

    loop {
        match check().await {
            Ok(Some(value)) => {
                debug!("{} completed", operation_name);
                return Some(value);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Error checking {} status while waiting: {}", operation_name, e);
            }
        }

        if start.elapsed() >= max_wait {
            warn!("Timed out waiting for {} to complete", operation_name);
            return None;
        }

        tokio::time::sleep(poll_interval).await;
    }
}
