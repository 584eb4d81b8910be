//! Swag Labs scenario runner
//!
//! Exit status: 0 when every selected scenario passes, 1 when any fails,
//! 2 when the run itself could not happen (bad config, unreachable target).

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use swaglabs_common::{BrowserKind, EngineKind, SuiteConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swaglabs_e2e::runner::{Filter, TestRunner};
use swaglabs_e2e::scenarios;

#[derive(Parser, Debug)]
#[command(name = "swaglabs-e2e")]
#[command(about = "End-to-end scenarios for the Swag Labs storefront")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "swaglabs-e2e.toml")]
    config: PathBuf,

    /// Run only scenarios with this tag (repeatable)
    #[arg(short, long)]
    tag: Vec<String>,

    /// Run only the named scenario (repeatable)
    #[arg(short, long)]
    name: Vec<String>,

    /// List the selected scenarios and exit
    #[arg(long)]
    list: bool,

    /// Engine: simulated or playwright
    #[arg(long)]
    engine: Option<EngineKind>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<BrowserKind>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Scenarios run concurrently
    #[arg(short, long)]
    workers: Option<usize>,

    /// Extra attempts for a failing scenario
    #[arg(long)]
    retries: Option<usize>,

    /// Storefront root URL
    #[arg(long)]
    base_url: Option<String>,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn suite_config(&self) -> anyhow::Result<SuiteConfig> {
        self.suite_config_with(|key| std::env::var(key).ok())
    }

    /// File, then environment, then these flags; validated once at the end
    fn suite_config_with<F>(&self, env: F) -> anyhow::Result<SuiteConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SuiteConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        config
            .apply_env(|key| self.flag(key).or_else(|| env(key)))
            .context("reading settings from flags and environment")?;
        config.validate()?;
        Ok(config)
    }

    /// Flag value under the environment key it overrides
    fn flag(&self, key: &str) -> Option<String> {
        match key {
            "BASE_URL" => self
                .base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            "SAUCE_ENGINE" => self.engine.map(|engine| engine.to_string()),
            "SWAGLABS_BROWSER" => self.browser.map(|browser| browser.as_str().to_string()),
            "HEADLESS" if self.headed => Some("false".to_string()),
            "WORKERS" => self.workers.map(|n| n.to_string()),
            "RETRIES" => self.retries.map(|n| n.to_string()),
            "OUTPUT_DIR" => self.output.as_ref().map(|dir| dir.display().to_string()),
            "SCREENSHOT_DIR" => self
                .output
                .as_ref()
                .map(|dir| dir.join("screenshots").display().to_string()),
            _ => None,
        }
    }

    fn filter(&self) -> Filter {
        Filter {
            tags: self.tag.clone(),
            names: self.name.clone(),
        }
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let result = tokio::runtime::Runtime::new()
        .context("creating tokio runtime")
        .and_then(|rt| rt.block_on(async_main(args)));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> anyhow::Result<bool> {
    let config = args.suite_config()?;
    let runner = TestRunner::new(config);
    let filter = args.filter();

    if args.list {
        for scenario in runner.select(&filter) {
            println!("{:<36} [{}]", scenario.name, scenario.tags.join(", "));
        }
        return Ok(true);
    }

    info!(
        "swaglabs-e2e v{} against {} ({} engine, {} scenario(s) known)",
        env!("CARGO_PKG_VERSION"),
        runner.config().base_url,
        runner.config().engine,
        scenarios::catalog().len()
    );

    let results = runner.run(&filter).await?;
    runner.write_results(&results)?;

    Ok(results.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(flags: &[&str]) -> Args {
        let mut argv = vec!["swaglabs-e2e", "--config", "/nonexistent/swaglabs-e2e.toml"];
        argv.extend_from_slice(flags);
        Args::parse_from(argv)
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_flags_override_environment() {
        let config = args(&["--workers", "2", "--engine", "playwright", "--headed"])
            .suite_config_with(env(&[("WORKERS", "6"), ("HEADLESS", "true")]))
            .unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.engine, EngineKind::Playwright);
        assert!(!config.headless);
    }

    #[test]
    fn test_flag_replaces_bad_env_value() {
        let config = args(&["--workers", "3", "--base-url", "http://localhost:3000/"])
            .suite_config_with(env(&[("WORKERS", "many"), ("BASE_URL", "saucedemo.com")]))
            .unwrap();
        assert_eq!(config.workers, 3);
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_bad_env_value_without_flag_fails() {
        let result = args(&[]).suite_config_with(env(&[("WORKERS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_output_flag_sets_both_dirs() {
        let config = args(&["--output", "out", "--browser", "webkit"])
            .suite_config_with(env(&[("BROWSER", "xdg-open")]))
            .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.screenshot_dir, PathBuf::from("out").join("screenshots"));
        assert_eq!(config.browser, BrowserKind::Webkit);
    }
}
