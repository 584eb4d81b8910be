//! Every catalog scenario through the runner

use swaglabs_common::SuiteConfig;
use swaglabs_e2e::scenarios;
use swaglabs_e2e::{Filter, TestRunner};

#[tokio::test]
async fn catalog_passes() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SuiteConfig::from_env().unwrap();
    config.output_dir = dir.path().to_path_buf();
    config.screenshot_dir = dir.path().join("screenshots");
    config.retries = 0;
    let runner = TestRunner::new(config);

    let suite = runner.run(&Filter::default()).await.unwrap();

    let failures: Vec<_> = suite
        .results
        .iter()
        .filter(|r| !r.success)
        .map(|r| format!("{}: {}", r.name, r.error.as_deref().unwrap_or("?")))
        .collect();
    assert!(failures.is_empty(), "failed scenarios:\n{}", failures.join("\n"));
    assert_eq!(suite.total, scenarios::catalog().len());
    assert_eq!(suite.skipped, 0);

    let written = runner.write_results(&suite).unwrap();
    assert!(written.exists());
}

#[tokio::test]
async fn smoke_tag_selects_a_subset() {
    let runner = TestRunner::new(SuiteConfig::from_env().unwrap());
    let filter = Filter {
        tags: vec!["smoke".to_string()],
        names: vec![],
    };

    let selected = runner.select(&filter);

    assert!(!selected.is_empty());
    assert!(selected.len() < scenarios::catalog().len());
}
