//! Browser engine seam
//!
//! Everything the page objects need from a browser goes through
//! [`BrowserEngine`]. Selectors use Playwright syntax, including `>>`
//! chaining and `nth=N`. Element-scoped calls are strict: a selector that
//! resolves to more than one element is an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::E2eResult;

pub mod playwright;
pub mod simulated;

pub use playwright::PlaywrightEngine;
pub use simulated::SimulatedStore;

/// Element state to wait for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

/// Page lifecycle milestone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    #[serde(rename = "load")]
    Load,
    #[default]
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Options for a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOptions {
    pub button: MouseButton,
    pub click_count: u32,
    /// Overrides the session's action timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            button: MouseButton::Left,
            click_count: 1,
            timeout_ms: None,
        }
    }
}

impl ClickOptions {
    pub fn double() -> Self {
        Self {
            click_count: 2,
            ..Default::default()
        }
    }

    pub fn right() -> Self {
        Self {
            button: MouseButton::Right,
            ..Default::default()
        }
    }
}

/// One isolated browser page
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Navigate and wait for `wait_until`
    async fn goto(&self, url: &str, wait_until: LoadState) -> E2eResult<()>;

    async fn reload(&self) -> E2eResult<()>;

    async fn go_back(&self) -> E2eResult<()>;

    async fn current_url(&self) -> E2eResult<String>;

    /// Document title
    async fn title(&self) -> E2eResult<String>;

    async fn click(&self, selector: &str, options: ClickOptions) -> E2eResult<()>;

    /// Replace an input's value
    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()>;

    /// Select by option value; returns the values now selected
    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<Vec<String>>;

    async fn hover(&self, selector: &str) -> E2eResult<()>;

    async fn focus(&self, selector: &str) -> E2eResult<()>;

    async fn press(&self, selector: &str, key: &str) -> E2eResult<()>;

    /// Type character by character with `delay` between keystrokes
    async fn type_text(&self, selector: &str, text: &str, delay: Duration) -> E2eResult<()>;

    async fn inner_text(&self, selector: &str) -> E2eResult<String>;

    /// Text of every match, in document order
    async fn all_inner_texts(&self, selector: &str) -> E2eResult<Vec<String>>;

    async fn get_attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>>;

    async fn input_value(&self, selector: &str) -> E2eResult<String>;

    async fn count(&self, selector: &str) -> E2eResult<usize>;

    async fn wait_for_selector(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Duration,
    ) -> E2eResult<()>;

    async fn wait_for_load_state(&self, state: LoadState) -> E2eResult<()>;

    async fn is_visible(&self, selector: &str) -> E2eResult<bool>;

    async fn is_enabled(&self, selector: &str) -> E2eResult<bool>;

    async fn is_checked(&self, selector: &str) -> E2eResult<bool>;

    /// Write a PNG of the page to `path`
    async fn screenshot(&self, path: &Path, full_page: bool) -> E2eResult<()>;

    async fn scroll_into_view(&self, selector: &str) -> E2eResult<()>;

    /// Run `script` in the page and return its JSON result
    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value>;

    /// Release the browser; later calls fail
    async fn close(&self) -> E2eResult<()>;
}
