//! Playwright browser automation
//!
//! Drives a real browser through a small Node bridge: the bridge script is
//! written to a temp dir, `node` runs it, and the two sides exchange one
//! JSON object per line. Requests carry an id; the bridge answers each with
//! `{id, ok, value}` or `{id, ok: false, error: {name, message}}`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use swaglabs_common::{SuiteConfig, Viewport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use super::{BrowserEngine, ClickOptions, LoadState, MouseButton, WaitState};
use crate::error::{E2eError, E2eResult};

const BRIDGE_SCRIPT: &str = r#"
const readline = require('readline');
const playwright = require('playwright');

const options = JSON.parse(process.argv[2] || '{}');

function send(message) {
  process.stdout.write(JSON.stringify(message) + '\n');
}

(async () => {
  const browser = await playwright[options.browser].launch({ headless: options.headless });
  const context = await browser.newContext({ viewport: options.viewport });
  context.setDefaultTimeout(options.actionTimeout);
  context.setDefaultNavigationTimeout(options.navigationTimeout);
  const page = await context.newPage();
  const loc = (a) => page.locator(a.selector);

  const handlers = {
    goto: (a) => page.goto(a.url, { waitUntil: a.waitUntil }).then(() => null),
    reload: () => page.reload({ waitUntil: 'domcontentloaded' }).then(() => null),
    goBack: () => page.goBack({ waitUntil: 'domcontentloaded' }).then(() => null),
    url: async () => page.url(),
    title: () => page.title(),
    click: (a) => loc(a).click({ button: a.button, clickCount: a.clickCount, timeout: a.timeout }),
    fill: (a) => loc(a).fill(a.value),
    selectOption: (a) => loc(a).selectOption(a.value),
    hover: (a) => loc(a).hover(),
    focus: (a) => loc(a).focus(),
    press: (a) => loc(a).press(a.key),
    type: (a) => loc(a).pressSequentially(a.text, { delay: a.delay }),
    innerText: (a) => loc(a).innerText(),
    allInnerTexts: (a) => loc(a).allInnerTexts(),
    getAttribute: (a) => loc(a).getAttribute(a.name),
    inputValue: (a) => loc(a).inputValue(),
    count: (a) => loc(a).count(),
    waitForSelector: (a) => page.waitForSelector(a.selector, { state: a.state, timeout: a.timeout }).then(() => null),
    waitForLoadState: (a) => page.waitForLoadState(a.state),
    isVisible: (a) => loc(a).isVisible(),
    isEnabled: (a) => loc(a).isEnabled(),
    isChecked: (a) => loc(a).isChecked(),
    screenshot: (a) => page.screenshot({ path: a.path, fullPage: a.fullPage }).then(() => null),
    scrollIntoView: (a) => loc(a).scrollIntoViewIfNeeded(),
    evaluate: (a) => page.evaluate(a.script),
    close: () => browser.close(),
  };

  const rl = readline.createInterface({ input: process.stdin });
  send({ ready: true });

  for await (const line of rl) {
    if (!line.trim()) continue;
    let request;
    try {
      request = JSON.parse(line);
    } catch (error) {
      send({ id: null, ok: false, error: { name: 'ProtocolError', message: error.message } });
      continue;
    }
    const handler = handlers[request.op];
    if (!handler) {
      send({ id: request.id, ok: false, error: { name: 'ProtocolError', message: 'unknown op ' + request.op } });
      continue;
    }
    try {
      const value = await handler(request.args || {});
      send({ id: request.id, ok: true, value: value === undefined ? null : value });
    } catch (error) {
      send({ id: request.id, ok: false, error: { name: error.name || 'Error', message: error.message } });
    }
    if (request.op === 'close') break;
  }
  process.exit(0);
})().catch((error) => {
  send({ ready: false, error: { name: error.name || 'Error', message: error.message } });
  process.exit(1);
});
"#;

/// Options handed to the bridge on its command line
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchOptions {
    browser: &'static str,
    headless: bool,
    viewport: Viewport,
    action_timeout: u64,
    navigation_timeout: u64,
}

#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    id: u64,
    op: &'a str,
    args: Value,
}

#[derive(Debug, Deserialize)]
struct BridgeResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<BridgeFailure>,
}

#[derive(Debug, Deserialize)]
struct BridgeFailure {
    name: String,
    message: String,
}

struct BridgeIo {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Playwright-backed engine; one browser, one context, one page
pub struct PlaywrightEngine {
    io: Mutex<Option<BridgeIo>>,
    next_id: AtomicU64,
    action_timeout_ms: u64,
    /// Keeps the bridge script on disk while the process runs
    _script_dir: tempfile::TempDir,
}

impl PlaywrightEngine {
    /// Launch a browser as described by `config`
    ///
    /// Does not repeat the installation check; runs call
    /// [`PlaywrightEngine::check_installed`] once up front.
    pub async fn launch(config: &SuiteConfig) -> E2eResult<Self> {
        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("bridge.js");
        std::fs::write(&script_path, BRIDGE_SCRIPT)?;

        let options = LaunchOptions {
            browser: config.browser.as_str(),
            headless: config.headless,
            viewport: config.viewport,
            action_timeout: config.timeouts.action_ms,
            navigation_timeout: config.timeouts.navigation_ms,
        };

        info!(
            "Launching {} (headless: {}) via Playwright bridge",
            config.browser.as_str(),
            config.headless
        );

        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .arg(serde_json::to_string(&options)?)
            .current_dir(&config.node_project_dir)
            .env("NODE_PATH", node_modules_dir(&config.node_project_dir))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| E2eError::Engine(format!("Failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::BridgeProtocol("bridge stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::BridgeProtocol("bridge stdout unavailable".to_string()))?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "playwright_bridge", "{}", line);
                }
            });
        }

        let mut io = BridgeIo {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        };

        let startup = Duration::from_millis(config.timeouts.navigation_ms);
        let greeting = tokio::time::timeout(startup, read_response(&mut io.stdout))
            .await
            .map_err(|_| E2eError::timeout("browser launch", config.timeouts.navigation_ms))??;

        if !greeting.ready {
            let reason = greeting
                .error
                .map(|e| format!("{}: {}", e.name, e.message))
                .unwrap_or_else(|| "bridge did not report ready".to_string());
            return Err(E2eError::Engine(format!("Browser launch failed: {}", reason)));
        }

        debug!("Playwright bridge ready");

        Ok(Self {
            io: Mutex::new(Some(io)),
            next_id: AtomicU64::new(1),
            action_timeout_ms: config.timeouts.action_ms,
            _script_dir: script_dir,
        })
    }

    /// Check that `npx playwright` answers, within the navigation timeout
    pub async fn check_installed(config: &SuiteConfig) -> E2eResult<()> {
        let limit = config.timeouts.navigation_timeout();
        let status = TokioCommand::new("npx")
            .args(["playwright", "--version"])
            .current_dir(&config.node_project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(limit, status).await {
            Ok(Ok(status)) if status.success() => {
                debug!("Playwright found in {}", config.node_project_dir.display());
                Ok(())
            }
            Ok(Ok(status)) => {
                debug!("npx playwright --version exited with {}", status);
                Err(E2eError::PlaywrightNotFound)
            }
            Ok(Err(e)) => {
                debug!("npx not runnable: {}", e);
                Err(E2eError::PlaywrightNotFound)
            }
            Err(_) => {
                warn!(
                    "npx playwright --version gave no answer within {} ms",
                    config.timeouts.navigation_ms
                );
                Err(E2eError::PlaywrightNotFound)
            }
        }
    }

    /// Send one request and wait for its response
    async fn execute<R: DeserializeOwned>(&self, op: &str, args: Value) -> E2eResult<R> {
        let mut guard = self.io.lock().await;
        let io = guard
            .as_mut()
            .ok_or_else(|| E2eError::Engine("browser already closed".to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let timeout_ms = args
            .get("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(self.action_timeout_ms);
        let what = describe(op, &args);

        let request = serde_json::to_string(&BridgeRequest { id, op, args })?;
        trace!("bridge request: {}", request);

        io.stdin.write_all(request.as_bytes()).await?;
        io.stdin.write_all(b"\n").await?;
        io.stdin.flush().await?;

        loop {
            let response = read_response(&mut io.stdout).await?;

            // Stale answers belong to a request whose caller gave up
            if response.id != Some(id) {
                warn!("Discarding bridge response for id {:?}", response.id);
                continue;
            }

            if response.ok {
                return serde_json::from_value(response.value).map_err(E2eError::from);
            }

            let failure = response.error.unwrap_or(BridgeFailure {
                name: "Error".to_string(),
                message: "unknown bridge failure".to_string(),
            });

            return Err(match failure.name.as_str() {
                "TimeoutError" => E2eError::timeout(what, timeout_ms),
                "ProtocolError" => E2eError::BridgeProtocol(failure.message),
                _ => E2eError::Engine(format!("{}: {}", what, failure.message)),
            });
        }
    }

    async fn execute_void(&self, op: &str, args: Value) -> E2eResult<()> {
        let _: Value = self.execute(op, args).await?;
        Ok(())
    }

    /// Stop the bridge process
    async fn shutdown(io: &mut BridgeIo) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = io.child.id() {
                if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok()
                    && tokio::time::timeout(Duration::from_millis(500), io.child.wait())
                        .await
                        .is_ok()
                {
                    return;
                }
            }
        }

        // Force kill if still running
        if let Err(e) = io.child.kill().await {
            warn!("Failed to kill Playwright bridge: {}", e);
        }
    }
}

#[async_trait]
impl BrowserEngine for PlaywrightEngine {
    async fn goto(&self, url: &str, wait_until: LoadState) -> E2eResult<()> {
        self.execute_void("goto", json!({ "url": url, "waitUntil": wait_until.as_str() }))
            .await
    }

    async fn reload(&self) -> E2eResult<()> {
        self.execute_void("reload", json!({})).await
    }

    async fn go_back(&self) -> E2eResult<()> {
        self.execute_void("goBack", json!({})).await
    }

    async fn current_url(&self) -> E2eResult<String> {
        self.execute("url", json!({})).await
    }

    async fn title(&self) -> E2eResult<String> {
        self.execute("title", json!({})).await
    }

    async fn click(&self, selector: &str, options: ClickOptions) -> E2eResult<()> {
        let button = match options.button {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        };
        self.execute_void(
            "click",
            json!({
                "selector": selector,
                "button": button,
                "clickCount": options.click_count,
                "timeout": options.timeout_ms.unwrap_or(self.action_timeout_ms),
            }),
        )
        .await
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.execute_void("fill", json!({ "selector": selector, "value": value }))
            .await
    }

    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<Vec<String>> {
        self.execute("selectOption", json!({ "selector": selector, "value": value }))
            .await
    }

    async fn hover(&self, selector: &str) -> E2eResult<()> {
        self.execute_void("hover", json!({ "selector": selector })).await
    }

    async fn focus(&self, selector: &str) -> E2eResult<()> {
        self.execute_void("focus", json!({ "selector": selector })).await
    }

    async fn press(&self, selector: &str, key: &str) -> E2eResult<()> {
        self.execute_void("press", json!({ "selector": selector, "key": key }))
            .await
    }

    async fn type_text(&self, selector: &str, text: &str, delay: Duration) -> E2eResult<()> {
        self.execute_void(
            "type",
            json!({ "selector": selector, "text": text, "delay": delay.as_millis() as u64 }),
        )
        .await
    }

    async fn inner_text(&self, selector: &str) -> E2eResult<String> {
        self.execute("innerText", json!({ "selector": selector })).await
    }

    async fn all_inner_texts(&self, selector: &str) -> E2eResult<Vec<String>> {
        self.execute("allInnerTexts", json!({ "selector": selector })).await
    }

    async fn get_attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>> {
        self.execute("getAttribute", json!({ "selector": selector, "name": name }))
            .await
    }

    async fn input_value(&self, selector: &str) -> E2eResult<String> {
        self.execute("inputValue", json!({ "selector": selector })).await
    }

    async fn count(&self, selector: &str) -> E2eResult<usize> {
        self.execute("count", json!({ "selector": selector })).await
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Duration,
    ) -> E2eResult<()> {
        self.execute_void(
            "waitForSelector",
            json!({
                "selector": selector,
                "state": state.as_str(),
                "timeout": timeout.as_millis() as u64,
            }),
        )
        .await
    }

    async fn wait_for_load_state(&self, state: LoadState) -> E2eResult<()> {
        self.execute_void("waitForLoadState", json!({ "state": state.as_str() }))
            .await
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        self.execute("isVisible", json!({ "selector": selector })).await
    }

    async fn is_enabled(&self, selector: &str) -> E2eResult<bool> {
        self.execute("isEnabled", json!({ "selector": selector })).await
    }

    async fn is_checked(&self, selector: &str) -> E2eResult<bool> {
        self.execute("isChecked", json!({ "selector": selector })).await
    }

    async fn screenshot(&self, path: &Path, full_page: bool) -> E2eResult<()> {
        self.execute_void(
            "screenshot",
            json!({ "path": path.to_string_lossy(), "fullPage": full_page }),
        )
        .await
    }

    async fn scroll_into_view(&self, selector: &str) -> E2eResult<()> {
        self.execute_void("scrollIntoView", json!({ "selector": selector }))
            .await
    }

    async fn evaluate(&self, script: &str) -> E2eResult<Value> {
        self.execute("evaluate", json!({ "script": script })).await
    }

    async fn close(&self) -> E2eResult<()> {
        let result = self.execute_void("close", json!({})).await;

        if let Some(mut io) = self.io.lock().await.take() {
            Self::shutdown(&mut io).await;
            debug!("Playwright bridge stopped");
        }

        result
    }
}

/// Read one JSON line from the bridge
async fn read_response(stdout: &mut BufReader<ChildStdout>) -> E2eResult<BridgeResponse> {
    let mut line = String::new();
    loop {
        line.clear();
        let read = stdout.read_line(&mut line).await?;
        if read == 0 {
            return Err(E2eError::BridgeProtocol("bridge process exited".to_string()));
        }
        if line.trim().is_empty() {
            continue;
        }
        trace!("bridge response: {}", line.trim());
        return serde_json::from_str(&line)
            .map_err(|e| E2eError::BridgeProtocol(format!("invalid response '{}': {}", line.trim(), e)));
    }
}

fn node_modules_dir(project_dir: &Path) -> PathBuf {
    project_dir.join("node_modules")
}

/// Human-readable label for a request, used in timeout and failure messages
fn describe(op: &str, args: &Value) -> String {
    match args.get("selector").and_then(Value::as_str) {
        Some(selector) => format!("{} {}", op, selector),
        None => match args.get("url").and_then(Value::as_str) {
            Some(url) => format!("{} {}", op, url),
            None => op.to_string(),
        },
    }
}

impl std::fmt::Debug for PlaywrightEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaywrightEngine")
            .field("action_timeout_ms", &self.action_timeout_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = BridgeRequest {
            id: 7,
            op: "click",
            args: json!({ "selector": "#login-button" }),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"op\":\"click\""));
        assert!(json.contains("#login-button"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"id": 3, "ok": true, "value": ["Sauce Labs Backpack", "Sauce Labs Onesie"]}"#;
        let response: BridgeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, Some(3));
        let texts: Vec<String> = serde_json::from_value(response.value).unwrap();
        assert_eq!(texts.len(), 2);
    }

    #[test]
    fn test_error_parsing() {
        let json = r#"{"id": 4, "ok": false, "error": {"name": "TimeoutError", "message": "Timeout 10000ms exceeded."}}"#;
        let response: BridgeResponse = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().name, "TimeoutError");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_install_check_keeps_runtime_responsive() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SuiteConfig::default();
        config.node_project_dir = dir.path().to_path_buf();
        config.timeouts.navigation_ms = 300;

        let ticks = std::sync::Arc::new(AtomicU64::new(0));
        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    ticks.fetch_add(1, Ordering::Relaxed);
                }
            })
        };

        let start = std::time::Instant::now();
        let result = PlaywrightEngine::check_installed(&config).await;
        let elapsed = start.elapsed();
        ticker.abort();

        // No playwright in an empty dir: either npx is missing, fails, or is cut off
        assert!(matches!(result, Ok(()) | Err(E2eError::PlaywrightNotFound)));
        assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
        if elapsed >= Duration::from_millis(100) {
            assert!(ticks.load(Ordering::Relaxed) > 0, "runtime blocked for {:?}", elapsed);
        }
    }

    #[test]
    fn test_ready_greeting() {
        let response: BridgeResponse = serde_json::from_str(r#"{"ready": true}"#).unwrap();
        assert!(response.ready);
        assert_eq!(response.id, None);
    }

    #[test]
    fn test_launch_options_are_camel_case() {
        let options = LaunchOptions {
            browser: "webkit",
            headless: true,
            viewport: Viewport::default(),
            action_timeout: 10_000,
            navigation_timeout: 30_000,
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"actionTimeout\":10000"));
        assert!(json.contains("\"navigationTimeout\":30000"));
        assert!(json.contains("\"width\":1280"));
    }

    #[test]
    fn test_describe_prefers_selector() {
        assert_eq!(describe("click", &json!({ "selector": "#finish" })), "click #finish");
        assert_eq!(describe("goto", &json!({ "url": "https://x/" })), "goto https://x/");
        assert_eq!(describe("title", &json!({})), "title");
    }
}
