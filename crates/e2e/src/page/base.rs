//! Shared interaction, waiting and assertion primitives
//!
//! `BasePage` owns no selectors. Every screen object wraps one and builds its
//! workflows from these calls. Interaction and assertion failures propagate;
//! the `is_*` state checks turn any engine error into `false`.

use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use swaglabs_common::{SuiteConfig, Timeouts};
use tracing::{debug, info};

use crate::engine::{BrowserEngine, ClickOptions, LoadState, WaitState};
use crate::error::E2eResult;
use crate::expect::{satisfy, Probe};

/// Engine handle plus the settings every screen needs; cheap to clone
#[derive(Clone)]
pub struct BasePage {
    engine: Arc<dyn BrowserEngine>,
    base_url: String,
    timeouts: Timeouts,
    screenshot_dir: PathBuf,
}

impl BasePage {
    pub fn new(engine: Arc<dyn BrowserEngine>, config: &SuiteConfig) -> Self {
        Self {
            engine,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeouts: config.timeouts,
            screenshot_dir: config.screenshot_dir.clone(),
        }
    }

    pub fn engine(&self) -> &Arc<dyn BrowserEngine> {
        &self.engine
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL; storefront paths are joined to the base URL
    pub fn url_for(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else if path_or_url.starts_with('/') {
            format!("{}{}", self.base_url, path_or_url)
        } else {
            format!("{}/{}", self.base_url, path_or_url)
        }
    }

    // ---- navigation ----

    /// Navigate and wait for DOM readiness
    pub async fn goto(&self, path_or_url: &str) -> E2eResult<()> {
        let url = self.url_for(path_or_url);
        info!("Navigating to {}", url);
        self.engine.goto(&url, LoadState::DomContentLoaded).await
    }

    pub async fn reload(&self) -> E2eResult<()> {
        debug!("reload");
        self.engine.reload().await
    }

    pub async fn go_back(&self) -> E2eResult<()> {
        debug!("go back");
        self.engine.go_back().await
    }

    pub async fn current_url(&self) -> E2eResult<String> {
        self.engine.current_url().await
    }

    pub async fn title(&self) -> E2eResult<String> {
        self.engine.title().await
    }

    // ---- interaction ----

    pub async fn click(&self, selector: &str) -> E2eResult<()> {
        debug!("click {}", selector);
        self.engine.click(selector, ClickOptions::default()).await
    }

    pub async fn double_click(&self, selector: &str) -> E2eResult<()> {
        debug!("double click {}", selector);
        self.engine.click(selector, ClickOptions::double()).await
    }

    pub async fn right_click(&self, selector: &str) -> E2eResult<()> {
        debug!("right click {}", selector);
        self.engine.click(selector, ClickOptions::right()).await
    }

    pub async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        debug!("fill {} ({} chars)", selector, value.len());
        self.engine.fill(selector, value).await
    }

    pub async fn clear(&self, selector: &str) -> E2eResult<()> {
        debug!("clear {}", selector);
        self.engine.fill(selector, "").await
    }

    /// Select a dropdown option by its `value`
    pub async fn select_option(&self, selector: &str, value: &str) -> E2eResult<Vec<String>> {
        debug!("select '{}' in {}", value, selector);
        self.engine.select_option(selector, value).await
    }

    pub async fn hover(&self, selector: &str) -> E2eResult<()> {
        debug!("hover {}", selector);
        self.engine.hover(selector).await
    }

    pub async fn focus(&self, selector: &str) -> E2eResult<()> {
        debug!("focus {}", selector);
        self.engine.focus(selector).await
    }

    pub async fn press_key(&self, selector: &str, key: &str) -> E2eResult<()> {
        debug!("press {} in {}", key, selector);
        self.engine.press(selector, key).await
    }

    /// Type keystroke by keystroke; `delay` between characters, none by default
    pub async fn type_text(
        &self,
        selector: &str,
        text: &str,
        delay: Option<Duration>,
    ) -> E2eResult<()> {
        debug!("type into {}", selector);
        self.engine
            .type_text(selector, text, delay.unwrap_or(Duration::ZERO))
            .await
    }

    // ---- reading state ----

    /// Trimmed inner text of one element
    pub async fn text(&self, selector: &str) -> E2eResult<String> {
        let text = self.engine.inner_text(selector).await?;
        Ok(text.trim().to_string())
    }

    /// Trimmed inner text of every match, in document order
    pub async fn all_texts(&self, selector: &str) -> E2eResult<Vec<String>> {
        let texts = self.engine.all_inner_texts(selector).await?;
        Ok(texts.into_iter().map(|t| t.trim().to_string()).collect())
    }

    pub async fn attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>> {
        self.engine.get_attribute(selector, name).await
    }

    pub async fn input_value(&self, selector: &str) -> E2eResult<String> {
        self.engine.input_value(selector).await
    }

    pub async fn count(&self, selector: &str) -> E2eResult<usize> {
        self.engine.count(selector).await
    }

    // ---- waiting ----

    fn wait_timeout(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or_else(|| self.timeouts.default_timeout())
    }

    pub async fn wait_for_attached(&self, selector: &str, timeout: Option<Duration>) -> E2eResult<()> {
        self.wait_for(selector, WaitState::Attached, timeout).await
    }

    pub async fn wait_for_visible(&self, selector: &str, timeout: Option<Duration>) -> E2eResult<()> {
        self.wait_for(selector, WaitState::Visible, timeout).await
    }

    pub async fn wait_for_hidden(&self, selector: &str, timeout: Option<Duration>) -> E2eResult<()> {
        self.wait_for(selector, WaitState::Hidden, timeout).await
    }

    async fn wait_for(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Option<Duration>,
    ) -> E2eResult<()> {
        let timeout = self.wait_timeout(timeout);
        debug!("wait for {} {} ({:?})", selector, state.as_str(), timeout);
        self.engine.wait_for_selector(selector, state, timeout).await
    }

    /// Wait for the `load` event
    pub async fn wait_for_load(&self) -> E2eResult<()> {
        self.engine.wait_for_load_state(LoadState::Load).await
    }

    pub async fn wait_for_network_idle(&self) -> E2eResult<()> {
        self.engine.wait_for_load_state(LoadState::NetworkIdle).await
    }

    /// Fixed wait
    pub async fn pause(&self, duration: Duration) {
        debug!("pause {:?}", duration);
        tokio::time::sleep(duration).await;
    }

    // ---- soft state checks ----

    pub async fn is_visible(&self, selector: &str) -> bool {
        soft(selector, "visible", self.engine.is_visible(selector).await)
    }

    pub async fn is_enabled(&self, selector: &str) -> bool {
        soft(selector, "enabled", self.engine.is_enabled(selector).await)
    }

    /// False when the element is missing, like every soft check
    pub async fn is_disabled(&self, selector: &str) -> bool {
        match self.engine.is_enabled(selector).await {
            Ok(enabled) => !enabled,
            Err(e) => {
                debug!("is_disabled {} -> false ({})", selector, e);
                false
            }
        }
    }

    pub async fn is_checked(&self, selector: &str) -> bool {
        soft(selector, "checked", self.engine.is_checked(selector).await)
    }

    /// At least one element matches
    pub async fn is_present(&self, selector: &str) -> bool {
        soft(selector, "present", self.engine.count(selector).await.map(|n| n > 0))
    }

    // ---- assertions ----

    async fn expect<F, Fut>(&self, expectation: String, probe: F) -> E2eResult<()>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = E2eResult<Probe>>,
    {
        debug!("expect {}", expectation);
        satisfy(
            &expectation,
            self.timeouts.default_timeout(),
            self.timeouts.poll_interval(),
            probe,
        )
        .await
    }

    pub async fn assert_visible(&self, selector: &str) -> E2eResult<()> {
        self.expect(format!("'{}' to be visible", selector), || async move {
            let visible = self.engine.is_visible(selector).await?;
            Ok(Probe::check(visible, "not visible"))
        })
        .await
    }

    pub async fn assert_hidden(&self, selector: &str) -> E2eResult<()> {
        self.expect(format!("'{}' to be hidden", selector), || async move {
            let visible = self.engine.is_visible(selector).await?;
            Ok(Probe::check(!visible, "visible"))
        })
        .await
    }

    pub async fn assert_text_contains(&self, selector: &str, expected: &str) -> E2eResult<()> {
        self.expect(format!("'{}' to contain '{}'", selector, expected), || async move {
            let text = self.text(selector).await?;
            Ok(Probe::check(text.contains(expected), text))
        })
        .await
    }

    pub async fn assert_text_equals(&self, selector: &str, expected: &str) -> E2eResult<()> {
        self.expect(format!("'{}' to have text '{}'", selector, expected), || async move {
            let text = self.text(selector).await?;
            Ok(Probe::check(text == expected, text))
        })
        .await
    }

    /// Exact URL; a path is joined to the base URL first
    pub async fn assert_url_equals(&self, path_or_url: &str) -> E2eResult<()> {
        let expected = self.url_for(path_or_url);
        let expected = expected.as_str();
        self.expect(format!("URL to be '{}'", expected), || async move {
            let url = self.engine.current_url().await?;
            Ok(Probe::check(url == expected, url))
        })
        .await
    }

    pub async fn assert_url_matches(&self, pattern: &str) -> E2eResult<()> {
        let re = Regex::new(pattern)?;
        let re = &re;
        self.expect(format!("URL to match /{}/", pattern), || async move {
            let url = self.engine.current_url().await?;
            Ok(Probe::check(re.is_match(&url), url))
        })
        .await
    }

    pub async fn assert_title_matches(&self, pattern: &str) -> E2eResult<()> {
        let re = Regex::new(pattern)?;
        let re = &re;
        self.expect(format!("title to match /{}/", pattern), || async move {
            let title = self.engine.title().await?;
            Ok(Probe::check(re.is_match(&title), title))
        })
        .await
    }

    pub async fn assert_enabled(&self, selector: &str) -> E2eResult<()> {
        self.expect(format!("'{}' to be enabled", selector), || async move {
            let enabled = self.engine.is_enabled(selector).await?;
            Ok(Probe::check(enabled, "disabled"))
        })
        .await
    }

    pub async fn assert_disabled(&self, selector: &str) -> E2eResult<()> {
        self.expect(format!("'{}' to be disabled", selector), || async move {
            let enabled = self.engine.is_enabled(selector).await?;
            Ok(Probe::check(!enabled, "enabled"))
        })
        .await
    }

    pub async fn assert_count(&self, selector: &str, expected: usize) -> E2eResult<()> {
        self.expect(format!("'{}' to match {} element(s)", selector, expected), || async move {
            let count = self.engine.count(selector).await?;
            Ok(Probe::check(count == expected, count.to_string()))
        })
        .await
    }

    // ---- utility ----

    /// Full-page PNG named `<name>.png` under the screenshot directory
    pub async fn screenshot(&self, name: &str) -> E2eResult<PathBuf> {
        let file: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let path = self.screenshot_dir.join(format!("{}.png", file));
        self.engine.screenshot(&path, true).await?;
        info!("Screenshot saved to {}", path.display());
        Ok(path)
    }

    pub async fn scroll_into_view(&self, selector: &str) -> E2eResult<()> {
        self.engine.scroll_into_view(selector).await
    }

    pub async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
        self.engine.evaluate(script).await
    }
}

impl std::fmt::Debug for BasePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasePage")
            .field("base_url", &self.base_url)
            .field("screenshot_dir", &self.screenshot_dir)
            .finish_non_exhaustive()
    }
}

fn soft(selector: &str, check: &str, result: E2eResult<bool>) -> bool {
    match result {
        Ok(value) => value,
        Err(e) => {
            debug!("is_{} {} -> false ({})", check, selector, e);
            false
        }
    }
}
