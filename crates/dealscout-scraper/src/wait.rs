//! Bounded polling primitives.
//!
//! Every suspension point in the pipeline goes through an explicit
//! timeout + poll interval and yields a value on success or `None` on
//! expiry; nothing blocks unconditionally.

use std::future::Future;
use std::time::Duration;

use dealscout_browser::BrowserError;

/// Polls `probe` until it yields a value or `timeout` expires.
///
/// The probe is invoked immediately, then once per `poll` interval. A probe
/// returning `Ok(None)` means "not there yet"; `Ok(Some(v))` ends the wait.
///
/// # Errors
///
/// A probe error ends the wait and is propagated: stale handles and broken
/// sessions do not become silent timeouts.
pub async fn poll_until<T, F, Fut>(
    timeout: Duration,
    poll: Duration,
    mut probe: F,
) -> Result<Option<T>, BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(poll).await;
    }
}
