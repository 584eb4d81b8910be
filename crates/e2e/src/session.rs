//! One isolated browser session per test
//!
//! A session owns its engine and hands out screen objects bound to it.
//! Sessions share nothing; every test starts from a fresh one.

use std::sync::Arc;
use swaglabs_common::fixtures::UserDirectory;
use swaglabs_common::{EngineKind, SuiteConfig, User};
use tracing::info;

use crate::engine::{BrowserEngine, PlaywrightEngine, SimulatedStore};
use crate::error::E2eResult;
use crate::page::{
    BasePage, CartPage, CheckoutCompletePage, CheckoutStepOnePage, CheckoutStepTwoPage, Header,
    InventoryPage, LoginPage, ProductDetailPage,
};

#[derive(Debug, Clone)]
pub struct Session {
    base: BasePage,
    config: SuiteConfig,
}

impl Session {
    /// Start an engine of the configured kind
    pub async fn launch(config: &SuiteConfig) -> E2eResult<Self> {
        let engine: Arc<dyn BrowserEngine> = match config.engine {
            EngineKind::Simulated => Arc::new(SimulatedStore::from_config(config)),
            EngineKind::Playwright => Arc::new(PlaywrightEngine::launch(config).await?),
        };
        info!("Session started ({} engine)", config.engine);
        Ok(Self::with_engine(engine, config))
    }

    /// Offline session on the simulated storefront with default settings
    pub fn simulated() -> Self {
        let config = SuiteConfig::default();
        Self::with_engine(Arc::new(SimulatedStore::from_config(&config)), &config)
    }

    pub fn with_engine(engine: Arc<dyn BrowserEngine>, config: &SuiteConfig) -> Self {
        Self {
            base: BasePage::new(engine, config),
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.base.clone())
    }

    pub fn inventory_page(&self) -> InventoryPage {
        InventoryPage::new(self.base.clone())
    }

    pub fn product_detail_page(&self) -> ProductDetailPage {
        ProductDetailPage::new(self.base.clone())
    }

    pub fn cart_page(&self) -> CartPage {
        CartPage::new(self.base.clone())
    }

    pub fn checkout_step_one_page(&self) -> CheckoutStepOnePage {
        CheckoutStepOnePage::new(self.base.clone())
    }

    pub fn checkout_step_two_page(&self) -> CheckoutStepTwoPage {
        CheckoutStepTwoPage::new(self.base.clone())
    }

    pub fn checkout_complete_page(&self) -> CheckoutCompletePage {
        CheckoutCompletePage::new(self.base.clone())
    }

    pub fn header(&self) -> Header {
        Header::new(self.base.clone())
    }

    /// Per-test setup: open the login screen and sign in as `user`
    pub async fn sign_in(&self, user: &User) -> E2eResult<InventoryPage> {
        let login = self.login_page();
        login.open().await?;
        login.login_as(user).await
    }

    /// `sign_in` with the standard account
    pub async fn sign_in_standard(&self) -> E2eResult<InventoryPage> {
        self.sign_in(&UserDirectory::standard()).await
    }

    /// Save a full-page screenshot under the configured directory
    pub async fn screenshot(&self, name: &str) -> E2eResult<std::path::PathBuf> {
        self.base.screenshot(name).await
    }

    pub async fn close(&self) -> E2eResult<()> {
        self.base.engine().close().await
    }
}
