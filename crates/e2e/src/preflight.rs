//! Reachability probe for the storefront
//!
//! Run before a browser-backed suite so an unreachable target fails once,
//! up front, instead of as a timeout in every scenario.

use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Probe settings
#[derive(Debug, Clone)]
pub struct Preflight {
    pub url: String,
    /// Give up after this long
    pub deadline: Duration,
    pub request_timeout: Duration,
    pub interval: Duration,
}

impl Preflight {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            deadline: Duration::from_secs(30),
            request_timeout: Duration::from_secs(5),
            interval: Duration::from_millis(500),
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// GET the URL until it answers with a success status
    ///
    /// Returns the number of attempts taken.
    pub async fn wait_until_reachable(&self) -> E2eResult<usize> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        loop {
            attempts += 1;

            match client.get(&self.url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("{} reachable after {} attempt(s)", self.url, attempts);
                    return Ok(attempts);
                }
                Ok(resp) => {
                    warn!("Preflight {} returned {}", self.url, resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for {} ...", self.url);
                    }
                    if !e.is_connect() {
                        warn!("Preflight error: {}", e);
                    }
                }
            }

            if start.elapsed() >= self.deadline {
                return Err(E2eError::TargetUnreachable {
                    url: self.url.clone(),
                    attempts,
                });
            }
            sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_target() {
        // Port 9 (discard) on loopback is closed on any sane test host
        let probe = Preflight::new("http://127.0.0.1:9/")
            .with_deadline(Duration::from_millis(50))
            .with_interval(Duration::from_millis(10));

        let err = probe.wait_until_reachable().await.unwrap_err();
        match err {
            E2eError::TargetUnreachable { url, attempts } => {
                assert_eq!(url, "http://127.0.0.1:9/");
                assert!(attempts >= 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
