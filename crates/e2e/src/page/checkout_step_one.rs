//! Checkout step one: buyer information

use swaglabs_common::fixtures::constants::{paths, titles};
use swaglabs_common::CheckoutInfo;
use tracing::{debug, info};

use super::{BasePage, CartPage, CheckoutStepTwoPage};
use crate::error::E2eResult;

const TITLE: &str = ".title";
const FIRST_NAME: &str = "#first-name";
const LAST_NAME: &str = "#last-name";
const POSTAL_CODE: &str = "#postal-code";
const CONTINUE_BUTTON: &str = "#continue";
const CANCEL_BUTTON: &str = "#cancel";
const ERROR_BANNER: &str = "[data-test=\"error\"]";
const ERROR_CLOSE: &str = ".error-button";

#[derive(Debug, Clone)]
pub struct CheckoutStepOnePage {
    base: BasePage,
}

impl CheckoutStepOnePage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub async fn verify_on_checkout_step_one(&self) -> E2eResult<()> {
        self.base.assert_url_equals(paths::CHECKOUT_STEP_ONE).await?;
        self.base.assert_text_equals(TITLE, titles::CHECKOUT_STEP_ONE).await?;
        self.base.assert_visible(FIRST_NAME).await
    }

    pub async fn fill_first_name(&self, value: &str) -> E2eResult<()> {
        self.base.fill(FIRST_NAME, value).await
    }

    pub async fn fill_last_name(&self, value: &str) -> E2eResult<()> {
        self.base.fill(LAST_NAME, value).await
    }

    pub async fn fill_postal_code(&self, value: &str) -> E2eResult<()> {
        self.base.fill(POSTAL_CODE, value).await
    }

    /// Fill all three fields; empty values are filled as empty
    pub async fn fill_information(&self, info: &CheckoutInfo) -> E2eResult<()> {
        self.fill_first_name(&info.first_name).await?;
        self.fill_last_name(&info.last_name).await?;
        self.fill_postal_code(&info.postal_code).await
    }

    /// Submit the form; stays here with an error banner when a field is empty
    pub async fn continue_checkout(&self) -> E2eResult<()> {
        self.base.click(CONTINUE_BUTTON).await
    }

    /// Fill everything, continue and verify the overview is shown
    pub async fn complete_step_one(&self, info: &CheckoutInfo) -> E2eResult<CheckoutStepTwoPage> {
        info!("Completing checkout information for {} {}", info.first_name, info.last_name);
        self.fill_information(info).await?;
        self.continue_checkout().await?;
        let overview = CheckoutStepTwoPage::new(self.base.clone());
        overview.verify_on_checkout_step_two().await?;
        Ok(overview)
    }

    pub async fn cancel(&self) -> E2eResult<CartPage> {
        self.base.click(CANCEL_BUTTON).await?;
        Ok(CartPage::new(self.base.clone()))
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

    /// Current contents of the three inputs
    pub async fn field_values(&self) -> E2eResult<CheckoutInfo> {
        Ok(CheckoutInfo {
            first_name: self.base.input_value(FIRST_NAME).await?,
            last_name: self.base.input_value(LAST_NAME).await?,
            postal_code: self.base.input_value(POSTAL_CODE).await?,
        })
    }
}
