//! Login screen

use swaglabs_common::fixtures::constants::{paths, APP_TITLE};
use swaglabs_common::User;
use tracing::{debug, info};

use super::{BasePage, InventoryPage};
use crate::error::E2eResult;

const USERNAME_INPUT: &str = "#user-name";
const PASSWORD_INPUT: &str = "#password";
const LOGIN_BUTTON: &str = "#login-button";
const ERROR_BANNER: &str = "[data-test=\"error\"]";
const ERROR_CLOSE: &str = ".error-button";
const LOGO: &str = ".login_logo";

#[derive(Debug, Clone)]
pub struct LoginPage {
    base: BasePage,
}

impl LoginPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.base.goto(paths::LOGIN).await
    }

    /// Fill both fields and submit
    ///
    /// Lands on the inventory for accepted credentials and stays here with
    /// an error banner otherwise; callers check which.
    pub async fn login(&self, username: &str, password: &str) -> E2eResult<()> {
        info!("Logging in as '{}'", username);
        self.base.fill(USERNAME_INPUT, username).await?;
        self.base.fill(PASSWORD_INPUT, password).await?;
        self.base.click(LOGIN_BUTTON).await
    }

    /// Log in and verify the inventory is shown
    pub async fn login_as(&self, user: &User) -> E2eResult<InventoryPage> {
        self.login(&user.username, &user.password).await?;
        let inventory = InventoryPage::new(self.base.clone());
        inventory.verify_on_inventory_page().await?;
        Ok(inventory)
    }

    /// Banner text, or an empty string when no banner is shown
    pub async fn error_message(&self) -> String {
        if !self.base.is_visible(ERROR_BANNER).await {
            return String::new();
        }
        match self.base.text(ERROR_BANNER).await {
            Ok(text) => text,
            Err(e) => {
                debug!("error banner vanished while reading: {}", e);
                String::new()
            }
        }
    }

    pub async fn is_error_displayed(&self) -> bool {
        self.base.is_visible(ERROR_BANNER).await
    }

    pub async fn close_error(&self) -> E2eResult<()> {
        self.base.click(ERROR_CLOSE).await?;
        self.base.wait_for_hidden(ERROR_BANNER, None).await
    }

    pub async fn username_value(&self) -> E2eResult<String> {
        self.base.input_value(USERNAME_INPUT).await
    }

    pub async fn verify_on_login_page(&self) -> E2eResult<()> {
        self.base.assert_url_equals(paths::LOGIN).await?;
        self.base.assert_text_equals(LOGO, APP_TITLE).await?;
        self.base.assert_visible(USERNAME_INPUT).await?;
        self.base.assert_visible(PASSWORD_INPUT).await?;
        self.base.assert_visible(LOGIN_BUTTON).await
    }
}
