//! Screen objects
//!
//! One type per storefront screen, each wrapping a [`BasePage`]. Selectors
//! are private to the screen that owns them. Actions that leave a screen
//! return the object for the screen they land on:
//!
//! ```text
//! Login -> Inventory <-> ProductDetail
//!          Inventory <-> Cart -> CheckoutStepOne -> CheckoutStepTwo -> CheckoutComplete -> Inventory
//! ```
//!
//! Cancelling step one returns to the cart, cancelling step two to the
//! inventory.

pub mod base;
pub mod cart;
pub mod checkout_complete;
pub mod checkout_step_one;
pub mod checkout_step_two;
pub mod header;
pub mod inventory;
pub mod login;
pub mod product_detail;

pub use base::BasePage;
pub use cart::CartPage;
pub use checkout_complete::CheckoutCompletePage;
pub use checkout_step_one::CheckoutStepOnePage;
pub use checkout_step_two::CheckoutStepTwoPage;
pub use header::Header;
pub use inventory::InventoryPage;
pub use login::LoginPage;
pub use product_detail::ProductDetailPage;

use swaglabs_common::parse_price;

use crate::error::{E2eError, E2eResult};

/// Parse a rendered price, failing with the text that could not be read
pub(crate) fn price_from(selector: &str, text: &str) -> E2eResult<f64> {
    parse_price(text).ok_or_else(|| E2eError::UnexpectedText {
        selector: selector.to_string(),
        text: text.to_string(),
    })
}

/// Position of `name` in `names`, exact match only
pub(crate) fn index_of(kind: &str, names: &[String], name: &str) -> E2eResult<usize> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| E2eError::not_found(kind, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_from() {
        assert_eq!(price_from(".price", "$15.99").unwrap(), 15.99);
        assert!(matches!(
            price_from(".price", "free"),
            Err(E2eError::UnexpectedText { .. })
        ));
    }

    #[test]
    fn test_index_of_is_exact() {
        let names = vec!["Sauce Labs Bolt T-Shirt".to_string(), "Sauce Labs Onesie".to_string()];
        assert_eq!(index_of("product", &names, "Sauce Labs Onesie").unwrap(), 1);
        assert!(matches!(
            index_of("product", &names, "Sauce Labs Bolt"),
            Err(E2eError::NotFound { .. })
        ));
    }
}
