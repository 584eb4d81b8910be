//! Polling assertions
//!
//! An expectation re-evaluates its probe until it passes or the timeout
//! elapses. Engine errors during a poll count as a failed probe, so an
//! element that is still detaching or re-rendering does not abort the wait.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::error::{E2eError, E2eResult};

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Pass,
    /// Not yet satisfied; carries the observed value
    Fail(String),
}

impl Probe {
    pub fn check(ok: bool, actual: impl Into<String>) -> Self {
        if ok {
            Probe::Pass
        } else {
            Probe::Fail(actual.into())
        }
    }
}

/// Poll `probe` every `poll` until it passes or `timeout` elapses
///
/// On expiry fails with `AssertionFailed` carrying `expectation` and the
/// last observed value. The probe always runs at least once.
pub async fn satisfy<F, Fut>(
    expectation: &str,
    timeout: Duration,
    poll: Duration,
    mut probe: F,
) -> E2eResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<Probe>>,
{
    let start = Instant::now();
    let mut polls = 0u32;

    loop {
        polls += 1;
        let actual = match probe().await {
            Ok(Probe::Pass) => {
                trace!("satisfied after {} poll(s): {}", polls, expectation);
                return Ok(());
            }
            Ok(Probe::Fail(actual)) => actual,
            Err(e) => e.to_string(),
        };

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(E2eError::assertion(expectation, actual));
        }
        tokio::time::sleep(poll.min(timeout - elapsed)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_passes_once_probe_succeeds() {
        let calls = AtomicU32::new(0);
        satisfy("third call", Duration::from_secs(2), Duration::from_millis(5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(Probe::check(n >= 3, n.to_string())) }
        })
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_reports_last_value() {
        let err = satisfy("'.title' to be 'Products'", Duration::from_millis(30), Duration::from_millis(5), || async {
            Ok(Probe::Fail("Your Cart".to_string()))
        })
        .await
        .unwrap_err();

        match err {
            E2eError::AssertionFailed { expectation, actual } => {
                assert_eq!(expectation, "'.title' to be 'Products'");
                assert_eq!(actual, "Your Cart");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_engine_errors_keep_polling() {
        let calls = AtomicU32::new(0);
        satisfy("recovers", Duration::from_secs(2), Duration::from_millis(5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(E2eError::Engine("detached".to_string()))
                } else {
                    Ok(Probe::Pass)
                }
            }
        })
        .await
        .unwrap();
    }
}
