//! Cart screen

use std::time::Instant;
use swaglabs_common::fixtures::constants::{paths, titles};
use swaglabs_common::CartItem;
use tracing::{debug, info};

use super::{index_of, price_from, BasePage, CheckoutStepOnePage, Header, InventoryPage};
use crate::error::{E2eError, E2eResult};
use crate::selector::{nth_within, within};

const TITLE: &str = ".title";
const CART_ITEM: &str = ".cart_item";
const ITEM_NAME: &str = ".inventory_item_name";
const ITEM_PRICE: &str = ".inventory_item_price";
const ITEM_QUANTITY: &str = ".cart_quantity";
const REMOVE_BUTTON: &str = "button[id^=\"remove\"]";
const CONTINUE_SHOPPING: &str = "#continue-shopping";
const CHECKOUT_BUTTON: &str = "#checkout";

#[derive(Debug, Clone)]
pub struct CartPage {
    base: BasePage,
}

impl CartPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub fn header(&self) -> Header {
        Header::new(self.base.clone())
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.base.goto(paths::CART).await
    }

    pub async fn verify_on_cart_page(&self) -> E2eResult<()> {
        self.base.assert_url_equals(paths::CART).await?;
        self.base.assert_text_equals(TITLE, titles::CART).await?;
        self.base.assert_visible(CONTINUE_SHOPPING).await
    }

    pub async fn item_names(&self) -> E2eResult<Vec<String>> {
        self.base.all_texts(&within(CART_ITEM, ITEM_NAME)).await
    }

    pub async fn item_prices(&self) -> E2eResult<Vec<f64>> {
        self.base
            .all_texts(&within(CART_ITEM, ITEM_PRICE))
            .await?
            .iter()
            .map(|text| price_from(ITEM_PRICE, text))
            .collect()
    }

    /// Cart lines as rendered
    pub async fn items(&self) -> E2eResult<Vec<CartItem>> {
        let names = self.item_names().await?;
        let prices = self.item_prices().await?;
        let quantities = self.base.all_texts(&within(CART_ITEM, ITEM_QUANTITY)).await?;
        cart_lines(names, prices, quantities)
    }

    pub async fn item_count(&self) -> E2eResult<usize> {
        self.base.count(CART_ITEM).await
    }

    pub async fn contains(&self, name: &str) -> E2eResult<bool> {
        Ok(self.item_names().await?.iter().any(|n| n == name))
    }

    pub async fn is_empty(&self) -> E2eResult<bool> {
        Ok(self.item_count().await? == 0)
    }

    pub async fn remove_item(&self, name: &str) -> E2eResult<()> {
        let names = self.item_names().await?;
        let index = index_of("cart item", &names, name)?;
        info!("Removing '{}' from cart", name);
        self.base.click(&nth_within(CART_ITEM, index, REMOVE_BUTTON)).await
    }

    pub async fn remove_item_at(&self, index: usize) -> E2eResult<()> {
        let count = self.item_count().await?;
        if index >= count {
            return Err(E2eError::not_found("cart item", format!("#{} of {}", index, count)));
        }
        self.base.click(&nth_within(CART_ITEM, index, REMOVE_BUTTON)).await
    }

    /// Remove the first line until the cart is empty
    ///
    /// Each removal is followed by the fixed removal settle delay. Gives up
    /// with a timeout once the default timeout has passed.
    pub async fn remove_all_items(&self) -> E2eResult<()> {
        let timeouts = *self.base.timeouts();
        let start = Instant::now();
        let mut removed = 0usize;

        loop {
            let remaining = self.item_count().await?;
            if remaining == 0 {
                info!("Removed {} item(s) from cart", removed);
                return Ok(());
            }
            if start.elapsed() >= timeouts.default_timeout() {
                return Err(E2eError::timeout(
                    format!("cart to empty ({} item(s) left)", remaining),
                    timeouts.default_ms,
                ));
            }

            debug!("{} item(s) left in cart", remaining);
            self.remove_item_at(0).await?;
            removed += 1;
            self.base.pause(timeouts.cart_removal_settle()).await;
        }
    }

    pub async fn continue_shopping(&self) -> E2eResult<InventoryPage> {
        self.base.click(CONTINUE_SHOPPING).await?;
        Ok(InventoryPage::new(self.base.clone()))
    }

    pub async fn checkout(&self) -> E2eResult<CheckoutStepOnePage> {
        info!("Starting checkout");
        self.base.click(CHECKOUT_BUTTON).await?;
        Ok(CheckoutStepOnePage::new(self.base.clone()))
    }
}

/// Pair up the per-line columns; every line must have all three
fn cart_lines(
    names: Vec<String>,
    prices: Vec<f64>,
    quantities: Vec<String>,
) -> E2eResult<Vec<CartItem>> {
    if names.len() != prices.len() || names.len() != quantities.len() {
        return Err(E2eError::UnexpectedText {
            selector: CART_ITEM.to_string(),
            text: format!(
                "{} name(s), {} price(s), {} quantity(ies)",
                names.len(),
                prices.len(),
                quantities.len()
            ),
        });
    }

    names
        .into_iter()
        .zip(prices)
        .zip(quantities)
        .map(|((name, price), quantity)| {
            let quantity = quantity.parse::<u32>().map_err(|_| E2eError::UnexpectedText {
                selector: ITEM_QUANTITY.to_string(),
                text: quantity.clone(),
            })?;
            Ok(CartItem { name, price, quantity })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cart_lines_pair_columns() {
        let lines = cart_lines(
            strings(&["Sauce Labs Backpack", "Sauce Labs Onesie"]),
            vec![29.99, 7.99],
            strings(&["1", "2"]),
        )
        .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].name, "Sauce Labs Onesie");
        assert_eq!(lines[1].quantity, 2);
    }

    #[test]
    fn test_cart_lines_reject_missing_column_entry() {
        let err = cart_lines(
            strings(&["Sauce Labs Backpack", "Sauce Labs Onesie"]),
            vec![29.99],
            strings(&["1", "1"]),
        )
        .unwrap_err();
        assert!(matches!(err, E2eError::UnexpectedText { ref selector, .. } if selector == CART_ITEM));
    }

    #[test]
    fn test_cart_lines_reject_bad_quantity() {
        let err = cart_lines(strings(&["Sauce Labs Backpack"]), vec![29.99], strings(&["one"])).unwrap_err();
        assert!(matches!(err, E2eError::UnexpectedText { ref text, .. } if text == "one"));
    }
}
