//! Scenario runner: selection, worker pool, retries and reporting

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use swaglabs_common::{EngineKind, SuiteConfig};
use tracing::{debug, error, info, warn};

use crate::engine::PlaywrightEngine;
use crate::error::E2eResult;
use crate::preflight::Preflight;
use crate::retry::retry;
use crate::scenarios::{self, Scenario};
use crate::session::Session;

/// Pause between attempts of a failing scenario
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub tags: Vec<String>,
    pub success: bool,
    /// Passed, but not on the first attempt
    pub flaky: bool,
    pub attempts: usize,
    pub duration_ms: u64,
    /// Last error when the scenario failed
    pub error: Option<String>,
    /// Screenshots taken after failed attempts
    pub screenshots: Vec<String>,
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub engine: EngineKind,
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub flaky: usize,
    /// Scenarios excluded by the filter
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Which scenarios to run; empty lists select everything
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub tags: Vec<String>,
    pub names: Vec<String>,
}

impl Filter {
    pub fn matches(&self, scenario: &Scenario) -> bool {
        let tag_ok = self.tags.is_empty() || self.tags.iter().any(|t| scenario.has_tag(t));
        let name_ok = self.names.is_empty() || self.names.iter().any(|n| n == scenario.name);
        tag_ok && name_ok
    }
}

/// Runs scenarios against fresh sessions built from one configuration
pub struct TestRunner {
    config: SuiteConfig,
}

impl TestRunner {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Catalog scenarios selected by `filter`
    pub fn select(&self, filter: &Filter) -> Vec<Scenario> {
        scenarios::catalog()
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect()
    }

    /// Make sure Playwright is installed and the storefront answers,
    /// once per run rather than per session
    pub async fn preflight(&self) -> E2eResult<()> {
        if self.config.engine != EngineKind::Playwright {
            debug!("Simulated engine, skipping preflight");
            return Ok(());
        }
        PlaywrightEngine::check_installed(&self.config).await?;
        Preflight::new(self.config.url_for("/"))
            .with_deadline(self.config.timeouts.navigation_timeout())
            .wait_until_reachable()
            .await?;
        Ok(())
    }

    /// Preflight, then run everything `filter` selects
    pub async fn run(&self, filter: &Filter) -> E2eResult<TestSuiteResult> {
        let selected = self.select(filter);
        let skipped = scenarios::catalog().len() - selected.len();
        self.preflight().await?;
        Ok(self.run_scenarios(&selected, skipped).await)
    }

    /// Run `scenarios` with up to `workers` at a time; results keep input order
    pub async fn run_scenarios(&self, scenarios: &[Scenario], skipped: usize) -> TestSuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let workers = self.config.workers.max(1);

        info!(
            "Running {} scenario(s) on {} with {} worker(s)",
            scenarios.len(),
            self.config.engine,
            workers
        );

        let results: Vec<TestResult> = stream::iter(scenarios)
            .map(|scenario| self.run_scenario(scenario))
            .buffered(workers)
            .collect()
            .await;

        let passed = results.iter().filter(|r| r.success).count();
        let flaky = results.iter().filter(|r| r.flaky).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed ({} flaky), {} failed, {} skipped ({} ms)",
            passed, flaky, failed, skipped, duration_ms
        );

        TestSuiteResult {
            started_at,
            engine: self.config.engine,
            base_url: self.config.base_url.clone(),
            total: results.len(),
            passed,
            failed,
            flaky,
            skipped,
            duration_ms,
            results,
        }
    }

    /// Run one scenario, retrying up to `retries` extra times
    pub async fn run_scenario(&self, scenario: &Scenario) -> TestResult {
        let start = Instant::now();
        let attempts = AtomicUsize::new(0);
        let screenshots = Mutex::new(Vec::new());

        let outcome = retry(self.config.retries + 1, RETRY_DELAY, |attempt| {
            attempts.store(attempt, Ordering::SeqCst);
            self.attempt(scenario, attempt, &screenshots)
        })
        .await;

        let attempts = attempts.load(Ordering::SeqCst);
        let duration_ms = start.elapsed().as_millis() as u64;
        let success = outcome.is_ok();

        match &outcome {
            Ok(()) if attempts > 1 => {
                warn!("~ {} passed on attempt {} ({} ms)", scenario.name, attempts, duration_ms)
            }
            Ok(()) => info!("✓ {} ({} ms)", scenario.name, duration_ms),
            Err(e) => error!("✗ {} - {}", scenario.name, e),
        }

        TestResult {
            name: scenario.name.to_string(),
            tags: scenario.tags.iter().map(|t| t.to_string()).collect(),
            success,
            flaky: success && attempts > 1,
            attempts,
            duration_ms,
            error: outcome.err().map(|e| e.to_string()),
            screenshots: screenshots.into_inner(),
        }
    }

    /// One attempt on a fresh session; a failure leaves a screenshot behind
    async fn attempt(
        &self,
        scenario: &Scenario,
        attempt: usize,
        screenshots: &Mutex<Vec<String>>,
    ) -> E2eResult<()> {
        debug!("Running scenario: {} (attempt {})", scenario.name, attempt);
        let session = Session::launch(&self.config).await?;
        let outcome = scenario.execute(session.clone()).await;

        if outcome.is_err() {
            let name = format!("{}-attempt-{}", scenario.name, attempt);
            match session.screenshot(&name).await {
                Ok(path) => screenshots.lock().push(path.display().to_string()),
                Err(e) => warn!("Failure screenshot for {} not taken: {}", scenario.name, e),
            }
        }

        if let Err(e) = session.close().await {
            debug!("Closing session for {}: {}", scenario.name, e);
        }
        outcome
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::E2eError;
    use futures::future::BoxFuture;

    fn passes(session: Session) -> BoxFuture<'static, E2eResult<()>> {
        Box::pin(async move {
            session.sign_in_standard().await?;
            Ok(())
        })
    }

    fn fails(session: Session) -> BoxFuture<'static, E2eResult<()>> {
        Box::pin(async move {
            session.login_page().open().await?;
            Err(E2eError::assertion("anything", "nothing"))
        })
    }

    static FLAKY_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn flaky(session: Session) -> BoxFuture<'static, E2eResult<()>> {
        Box::pin(async move {
            session.login_page().open().await?;
            if FLAKY_CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(E2eError::Engine("first attempt".to_string()))
            } else {
                Ok(())
            }
        })
    }

    fn runner_in(dir: &std::path::Path, retries: usize) -> TestRunner {
        let mut config = SuiteConfig::default();
        config.retries = retries;
        config.workers = 2;
        config.screenshot_dir = dir.join("screenshots");
        config.output_dir = dir.to_path_buf();
        TestRunner::new(config)
    }

    #[test]
    fn test_filter() {
        let runner = TestRunner::new(SuiteConfig::default());
        let all = runner.select(&Filter::default());
        assert_eq!(all.len(), scenarios::catalog().len());

        let smoke = runner.select(&Filter {
            tags: vec!["smoke".to_string()],
            names: vec![],
        });
        assert!(!smoke.is_empty());
        assert!(smoke.iter().all(|s| s.has_tag("smoke")));

        let named = runner.select(&Filter {
            tags: vec!["checkout".to_string()],
            names: vec!["end_to_end_purchase".to_string(), "sort_by_name".to_string()],
        });
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].name, "end_to_end_purchase");
    }

    #[tokio::test]
    async fn test_suite_counts_and_screenshots() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_in(dir.path(), 1);
        let scenarios = [
            Scenario { name: "passes", tags: &["unit"], run: passes },
            Scenario { name: "fails", tags: &["unit"], run: fails },
            Scenario { name: "flaky", tags: &["unit"], run: flaky },
        ];

        let suite = runner.run_scenarios(&scenarios, 4).await;
        assert_eq!(suite.total, 3);
        assert_eq!(suite.passed, 2);
        assert_eq!(suite.failed, 1);
        assert_eq!(suite.flaky, 1);
        assert_eq!(suite.skipped, 4);
        assert!(!suite.success());

        let names: Vec<_> = suite.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["passes", "fails", "flaky"]);

        let failed = &suite.results[1];
        assert_eq!(failed.attempts, 2);
        assert_eq!(failed.screenshots.len(), 2);
        assert!(failed.error.as_deref().unwrap().contains("anything"));
        assert!(PathBuf::from(&failed.screenshots[0]).exists());

        let flaky = &suite.results[2];
        assert!(flaky.success && flaky.flaky);
        assert_eq!(flaky.attempts, 2);

        let path = runner.write_results(&suite).unwrap();
        let written: TestSuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.failed, 1);
        assert_eq!(written.engine, EngineKind::Simulated);
    }
}
