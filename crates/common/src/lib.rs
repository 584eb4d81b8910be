//! Swag Labs Common Library
//!
//! Data model, fixture tables, literal UI contract and suite configuration
//! shared by the page objects, scenarios and runner.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod types;

// Re-export commonly used types
pub use config::{BrowserKind, EngineKind, SuiteConfig, Timeouts, Viewport};
pub use error::{Error, Result};
pub use types::*;

/// Suite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
