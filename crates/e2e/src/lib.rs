//! Swag Labs E2E Test Framework
//!
//! Page objects, scenarios and a runner for the Swag Labs storefront:
//! - Drives a real browser through a Playwright bridge process, or an
//!   in-memory model of the storefront for offline runs
//! - Wraps every screen in a typed page object over one shared `BasePage`
//! - Runs tagged scenarios on a worker pool with retries and a JSON report
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Scenario Runner (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── preflight()       -> target reachable?               │
//! │    ├── run(filter)       -> TestSuiteResult                 │
//! │    └── write_results()   -> test-results.json               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Session (one per attempt)                                  │
//! │    └── LoginPage -> InventoryPage <-> ProductDetailPage     │
//! │                     InventoryPage <-> CartPage              │
//! │                       -> CheckoutStepOnePage                │
//! │                       -> CheckoutStepTwoPage                │
//! │                       -> CheckoutCompletePage               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BasePage: navigate / act / read / wait / soft checks /     │
//! │            polling assertions                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  dyn BrowserEngine                                          │
//! │    ├── PlaywrightEngine  (node bridge, JSON lines)          │
//! │    └── SimulatedStore    (in-memory storefront)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod error;
pub mod expect;
pub mod page;
pub mod preflight;
pub mod retry;
pub mod runner;
pub mod scenarios;
pub mod selector;
pub mod session;

pub use engine::{BrowserEngine, PlaywrightEngine, SimulatedStore};
pub use error::{E2eError, E2eResult};
pub use page::{
    BasePage, CartPage, CheckoutCompletePage, CheckoutStepOnePage, CheckoutStepTwoPage, Header,
    InventoryPage, LoginPage, ProductDetailPage,
};
pub use runner::{Filter, TestResult, TestRunner, TestSuiteResult};
pub use session::Session;
