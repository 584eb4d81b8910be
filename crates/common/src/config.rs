//! Suite configuration
//!
//! Defaults are overlaid by an optional TOML file, then by environment
//! variables. CLI flags are applied last by the runner binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fixtures::constants::{timeouts, DEFAULT_BASE_URL};

/// Which engine drives the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// In-memory storefront model, no browser required
    #[default]
    Simulated,
    /// Real browser through the Playwright bridge
    Playwright,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Simulated => write!(f, "simulated"),
            EngineKind::Playwright => write!(f, "playwright"),
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" | "offline" => Ok(EngineKind::Simulated),
            "playwright" | "browser" => Ok(EngineKind::Playwright),
            other => Err(Error::InvalidConfig(format!("unknown engine '{}'", other))),
        }
    }
}

/// Browser family launched by Playwright
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(Error::InvalidConfig(format!("unknown browser '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Timing knobs, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub default_ms: u64,
    pub action_ms: u64,
    pub navigation_ms: u64,
    pub sort_settle_ms: u64,
    pub cart_removal_settle_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default_ms: timeouts::DEFAULT_MS,
            action_ms: timeouts::ACTION_MS,
            navigation_ms: timeouts::NAVIGATION_MS,
            sort_settle_ms: timeouts::SORT_SETTLE_MS,
            cart_removal_settle_ms: timeouts::CART_REMOVAL_SETTLE_MS,
            poll_interval_ms: timeouts::POLL_INTERVAL_MS,
        }
    }
}

impl Timeouts {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn sort_settle(&self) -> Duration {
        Duration::from_millis(self.sort_settle_ms)
    }

    pub fn cart_removal_settle(&self) -> Duration {
        Duration::from_millis(self.cart_removal_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Complete suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront root, without trailing slash
    pub base_url: String,

    pub engine: EngineKind,

    pub browser: BrowserKind,

    pub headless: bool,

    pub viewport: Viewport,

    /// Scenarios run concurrently by the runner
    pub workers: usize,

    /// Extra attempts for a failing scenario
    pub retries: usize,

    pub timeouts: Timeouts,

    /// Where failure screenshots go
    pub screenshot_dir: PathBuf,

    /// Where `test-results.json` goes
    pub output_dir: PathBuf,

    /// Directory whose `node_modules` provides `playwright`
    pub node_project_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            engine: EngineKind::default(),
            browser: BrowserKind::default(),
            headless: true,
            viewport: Viewport::default(),
            workers: 1,
            retries: 0,
            timeouts: Timeouts::default(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            output_dir: PathBuf::from("test-results"),
            node_project_dir: PathBuf::from("."),
        }
    }
}

impl SuiteConfig {
    /// Load configuration from file, falling back to defaults when absent
    ///
    /// Not validated here; later sources may still override file values.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Defaults overlaid with the process environment, validated
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values found through `lookup` (normally `std::env::var`)
    ///
    /// Only parses; callers run [`SuiteConfig::validate`] once every source
    /// has been applied. The browser comes from `SWAGLABS_BROWSER`; plain
    /// `BROWSER` belongs to the desktop's default-browser convention.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL") {
            self.base_url = url;
        }
        if let Some(engine) = lookup("SAUCE_ENGINE") {
            self.engine = engine.parse()?;
        }
        if let Some(browser) = lookup("SWAGLABS_BROWSER") {
            self.browser = browser.parse()?;
        }
        if let Some(headless) = lookup("HEADLESS") {
            self.headless = parse_bool("HEADLESS", &headless)?;
        }
        if let Some(workers) = lookup("WORKERS") {
            self.workers = parse_number("WORKERS", &workers)?;
        }
        if let Some(retries) = lookup("RETRIES") {
            self.retries = parse_number("RETRIES", &retries)?;
        }
        if let Some(ms) = lookup("DEFAULT_TIMEOUT") {
            self.timeouts.default_ms = parse_number("DEFAULT_TIMEOUT", &ms)?;
        }
        if let Some(ms) = lookup("ACTION_TIMEOUT") {
            self.timeouts.action_ms = parse_number("ACTION_TIMEOUT", &ms)?;
        }
        if let Some(ms) = lookup("NAVIGATION_TIMEOUT") {
            self.timeouts.navigation_ms = parse_number("NAVIGATION_TIMEOUT", &ms)?;
        }
        if let Some(dir) = lookup("SCREENSHOT_DIR") {
            self.screenshot_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PLAYWRIGHT_NODE_DIR") {
            self.node_project_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Reject values the runner cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".to_string()));
        }
        if self.timeouts.default_ms == 0 || self.timeouts.action_ms == 0 {
            return Err(Error::InvalidConfig("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Absolute URL for a storefront path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::InvalidConfig(format!("{} must be a boolean, got '{}'", key, other))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.base_url, "https://www.saucedemo.com");
        assert_eq!(config.timeouts.default_ms, 30_000);
        assert_eq!(config.timeouts.action_ms, 10_000);
        assert_eq!(config.engine, EngineKind::Simulated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overlay() {
        let mut config = SuiteConfig::default();
        config
            .apply_env(lookup(&[
                ("BASE_URL", "http://localhost:3000"),
                ("SAUCE_ENGINE", "playwright"),
                ("SWAGLABS_BROWSER", "firefox"),
                ("HEADLESS", "false"),
                ("WORKERS", "4"),
                ("RETRIES", "2"),
                ("ACTION_TIMEOUT", "5000"),
            ]))
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.engine, EngineKind::Playwright);
        assert_eq!(config.browser, BrowserKind::Firefox);
        assert!(!config.headless);
        assert_eq!(config.workers, 4);
        assert_eq!(config.retries, 2);
        assert_eq!(config.timeouts.action_ms, 5000);
        assert_eq!(config.url_for("/cart.html"), "http://localhost:3000/cart.html");
    }

    #[test_case("WORKERS", "many" ; "non numeric workers")]
    #[test_case("HEADLESS", "maybe" ; "bad boolean")]
    #[test_case("SWAGLABS_BROWSER", "lynx" ; "unknown browser")]
    fn test_env_rejects_unparseable_values(key: &str, value: &str) {
        let mut config = SuiteConfig::default();
        let result = config.apply_env(lookup(&[(key, value)]));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test_case("WORKERS", "0" ; "zero workers")]
    #[test_case("BASE_URL", "saucedemo.com" ; "url without scheme")]
    fn test_out_of_range_values_fail_validation(key: &str, value: &str) {
        let mut config = SuiteConfig::default();
        config.apply_env(lookup(&[(key, value)])).unwrap();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_later_source_repairs_env_value() {
        let mut config = SuiteConfig::default();
        config.apply_env(lookup(&[("WORKERS", "0")])).unwrap();
        config.apply_env(lookup(&[("WORKERS", "3")])).unwrap();
        assert_eq!(config.workers, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_desktop_browser_variable_is_ignored() {
        let mut config = SuiteConfig::default();
        config
            .apply_env(lookup(&[("BROWSER", "xdg-open")]))
            .unwrap();
        assert_eq!(config.browser, BrowserKind::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.toml");
        std::fs::write(
            &path,
            r#"
base_url = "http://127.0.0.1:8080"
workers = 3

[timeouts]
sort_settle_ms = 50
"#,
        )
        .unwrap();

        let config = SuiteConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.workers, 3);
        assert_eq!(config.timeouts.sort_settle_ms, 50);
        assert_eq!(config.timeouts.default_ms, 30_000);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = SuiteConfig::load(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.workers, 1);
    }
}
