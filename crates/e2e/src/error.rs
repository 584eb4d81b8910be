//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm install playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Bridge protocol error: {0}")]
    BridgeProtocol(String),

    #[error("No {kind} named '{name}'")]
    NotFound { kind: String, name: String },

    #[error("Timeout after {timeout_ms} ms waiting for: {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("Assertion failed: expected {expectation}, actual: {actual}")]
    AssertionFailed { expectation: String, actual: String },

    #[error("Unexpected text in {selector}: '{text}'")]
    UnexpectedText { selector: String, text: String },

    #[error("Target application unreachable at {url} after {attempts} attempts")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] swaglabs_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl E2eError {
    pub fn not_found(kind: &str, name: impl Into<String>) -> Self {
        E2eError::NotFound {
            kind: kind.to_string(),
            name: name.into(),
        }
    }

    pub fn timeout(what: impl Into<String>, timeout_ms: u64) -> Self {
        E2eError::Timeout {
            what: what.into(),
            timeout_ms,
        }
    }

    pub fn assertion(expectation: impl Into<String>, actual: impl Into<String>) -> Self {
        E2eError::AssertionFailed {
            expectation: expectation.into(),
            actual: actual.into(),
        }
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
