//! Checkout step two: order overview

use swaglabs_common::fixtures::constants::{labels, paths, titles, TOTAL_TOLERANCE};
use swaglabs_common::OrderSummary;
use tracing::info;

use super::{price_from, BasePage, CheckoutCompletePage, InventoryPage};
use crate::error::{E2eError, E2eResult};
use crate::selector::within;

const TITLE: &str = ".title";
const CART_ITEM: &str = ".cart_item";
const ITEM_NAME: &str = ".inventory_item_name";
const SUBTOTAL: &str = ".summary_subtotal_label";
const TAX: &str = ".summary_tax_label";
const TOTAL: &str = ".summary_total_label";
const PAYMENT_INFO: &str = "[data-test=\"payment-info-value\"]";
const SHIPPING_INFO: &str = "[data-test=\"shipping-info-value\"]";
const FINISH_BUTTON: &str = "#finish";
const CANCEL_BUTTON: &str = "#cancel";

#[derive(Debug, Clone)]
pub struct CheckoutStepTwoPage {
    base: BasePage,
}

impl CheckoutStepTwoPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub async fn verify_on_checkout_step_two(&self) -> E2eResult<()> {
        self.base.assert_url_equals(paths::CHECKOUT_STEP_TWO).await?;
        self.base.assert_text_equals(TITLE, titles::CHECKOUT_STEP_TWO).await?;
        self.base.assert_visible(FINISH_BUTTON).await
    }

    pub async fn item_names(&self) -> E2eResult<Vec<String>> {
        self.base.all_texts(&within(CART_ITEM, ITEM_NAME)).await
    }

    /// Label text with its known prefix removed
    async fn labelled(&self, selector: &str, label: &str) -> E2eResult<String> {
        let text = self.base.text(selector).await?;
        match text.strip_prefix(label) {
            Some(value) => Ok(value.trim().to_string()),
            None => Err(E2eError::UnexpectedText {
                selector: selector.to_string(),
                text,
            }),
        }
    }

    /// e.g. `$39.98`
    pub async fn subtotal_text(&self) -> E2eResult<String> {
        self.labelled(SUBTOTAL, labels::SUBTOTAL).await
    }

    pub async fn tax_text(&self) -> E2eResult<String> {
        self.labelled(TAX, labels::TAX).await
    }

    pub async fn total_text(&self) -> E2eResult<String> {
        self.labelled(TOTAL, labels::TOTAL).await
    }

    pub async fn subtotal(&self) -> E2eResult<f64> {
        price_from(SUBTOTAL, &self.subtotal_text().await?)
    }

    pub async fn tax(&self) -> E2eResult<f64> {
        price_from(TAX, &self.tax_text().await?)
    }

    pub async fn total(&self) -> E2eResult<f64> {
        price_from(TOTAL, &self.total_text().await?)
    }

    pub async fn order_summary(&self) -> E2eResult<OrderSummary> {
        Ok(OrderSummary {
            subtotal: self.subtotal().await?,
            tax: self.tax().await?,
            total: self.total().await?,
        })
    }

    /// Check that total = subtotal + tax within one cent
    pub async fn verify_total_calculation(&self) -> E2eResult<OrderSummary> {
        let summary = self.order_summary().await?;
        if !summary.is_consistent(TOTAL_TOLERANCE) {
            return Err(E2eError::assertion(
                format!(
                    "total {:.2} = subtotal + tax (within {})",
                    summary.expected_total(),
                    TOTAL_TOLERANCE
                ),
                format!("{:.2}", summary.total),
            ));
        }
        info!(
            "Order total verified: {:.2} + {:.2} = {:.2}",
            summary.subtotal, summary.tax, summary.total
        );
        Ok(summary)
    }

    pub async fn payment_information(&self) -> E2eResult<String> {
        self.base.text(PAYMENT_INFO).await
    }

    pub async fn shipping_information(&self) -> E2eResult<String> {
        self.base.text(SHIPPING_INFO).await
    }

    pub async fn finish(&self) -> E2eResult<CheckoutCompletePage> {
        info!("Finishing order");
        self.base.click(FINISH_BUTTON).await?;
        Ok(CheckoutCompletePage::new(self.base.clone()))
    }

    pub async fn cancel(&self) -> E2eResult<InventoryPage> {
        self.base.click(CANCEL_BUTTON).await?;
        Ok(InventoryPage::new(self.base.clone()))
    }
}
