//! Order confirmation

use swaglabs_common::fixtures::constants::{paths, titles};
use tracing::info;

use super::{BasePage, InventoryPage};
use crate::error::E2eResult;

const TITLE: &str = ".title";
const HEADER: &str = ".complete-header";
const BODY: &str = ".complete-text";
const PONY_IMAGE: &str = ".pony_express";
const BACK_HOME: &str = "#back-to-products";

#[derive(Debug, Clone)]
pub struct CheckoutCompletePage {
    base: BasePage,
}

impl CheckoutCompletePage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub async fn verify_on_checkout_complete(&self) -> E2eResult<()> {
        self.base.assert_url_equals(paths::CHECKOUT_COMPLETE).await?;
        self.base.assert_text_equals(TITLE, titles::CHECKOUT_COMPLETE).await?;
        self.base.assert_visible(HEADER).await?;
        self.base.assert_visible(PONY_IMAGE).await
    }

    pub async fn header_text(&self) -> E2eResult<String> {
        self.base.text(HEADER).await
    }

    pub async fn body_text(&self) -> E2eResult<String> {
        self.base.text(BODY).await
    }

    pub async fn is_order_complete(&self) -> bool {
        self.base.is_visible(HEADER).await
    }

    pub async fn back_home(&self) -> E2eResult<InventoryPage> {
        self.base.click(BACK_HOME).await?;
        Ok(InventoryPage::new(self.base.clone()))
    }

    /// Verify the confirmation, then return to the inventory
    pub async fn complete_post_order_flow(&self) -> E2eResult<InventoryPage> {
        self.verify_on_checkout_complete().await?;
        info!("Order confirmed: {}", self.header_text().await?);
        let inventory = self.back_home().await?;
        inventory.verify_on_inventory_page().await?;
        Ok(inventory)
    }
}
