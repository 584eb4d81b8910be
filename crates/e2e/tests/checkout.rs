//! Checkout information, overview arithmetic and cancellation

mod common;

use swaglabs_common::fixtures::constants::{messages, titles, TOTAL_TOLERANCE};
use swaglabs_common::fixtures::products::{BACKPACK, BIKE_LIGHT, FLEECE_JACKET};
use swaglabs_common::fixtures::{CheckoutFixtures, ProductCatalog};
use swaglabs_common::{CheckoutField, CheckoutInfo};
use swaglabs_e2e::CheckoutStepOnePage;
use test_case::test_case;

async fn step_one_with(names: &[&str]) -> (swaglabs_e2e::Session, CheckoutStepOnePage) {
    let (session, inventory) = common::signed_in().await;
    inventory.add_products(names).await.unwrap();
    let step_one = inventory.open_cart().await.unwrap().checkout().await.unwrap();
    step_one.verify_on_checkout_step_one().await.unwrap();
    (session, step_one)
}

#[test_case(CheckoutFixtures::missing_first_name(), CheckoutField::FirstName ; "first name")]
#[test_case(CheckoutFixtures::missing_last_name(), CheckoutField::LastName ; "last name")]
#[test_case(CheckoutFixtures::missing_postal_code(), CheckoutField::PostalCode ; "postal code")]
#[test_case(CheckoutFixtures::empty(), CheckoutField::FirstName ; "empty form")]
#[tokio::test]
async fn missing_field_is_rejected(info: CheckoutInfo, field: CheckoutField) {
    let (_session, step_one) = step_one_with(&[BACKPACK]).await;

    step_one.fill_information(&info).await.unwrap();
    step_one.continue_checkout().await.unwrap();

    step_one.verify_on_checkout_step_one().await.unwrap();
    assert!(step_one.is_error_displayed().await);
    assert_eq!(step_one.error_message().await, CheckoutFixtures::required_message(field));
    assert_eq!(info.first_missing_field(), Some(field));
}

#[tokio::test]
async fn error_can_be_dismissed_and_inputs_kept() {
    let (_session, step_one) = step_one_with(&[BACKPACK]).await;
    let info = CheckoutFixtures::missing_postal_code();
    step_one.fill_information(&info).await.unwrap();
    step_one.continue_checkout().await.unwrap();

    step_one.close_error().await.unwrap();

    assert!(!step_one.is_error_displayed().await);
    assert_eq!(step_one.error_message().await, "");
    assert_eq!(step_one.field_values().await.unwrap(), info);
}

#[test_case(&[BACKPACK] ; "single item")]
#[test_case(&[BACKPACK, BIKE_LIGHT] ; "two items")]
#[test_case(&[BACKPACK, BIKE_LIGHT, FLEECE_JACKET] ; "three items")]
#[tokio::test]
async fn overview_total_is_subtotal_plus_tax(names: &[&str]) {
    let (_session, step_one) = step_one_with(names).await;

    let overview = step_one.complete_step_one(&CheckoutFixtures::valid()).await.unwrap();

    assert_eq!(overview.base().text(".title").await.unwrap(), titles::CHECKOUT_STEP_TWO);
    assert_eq!(overview.item_names().await.unwrap(), names);
    let summary = overview.verify_total_calculation().await.unwrap();
    let subtotal = ProductCatalog::subtotal_of(names).unwrap();
    assert!((summary.subtotal - subtotal).abs() < 0.005);
    assert!(summary.is_consistent(TOTAL_TOLERANCE));
    assert!(overview.subtotal_text().await.unwrap().starts_with('$'));
}

#[tokio::test]
async fn overview_shows_payment_and_shipping() {
    let (_session, step_one) = step_one_with(&[BIKE_LIGHT]).await;
    let overview = step_one.complete_step_one(&CheckoutFixtures::valid()).await.unwrap();

    assert_eq!(overview.payment_information().await.unwrap(), messages::PAYMENT_INFO);
    assert_eq!(overview.shipping_information().await.unwrap(), messages::SHIPPING_INFO);
}

#[tokio::test]
async fn cancel_from_step_one_returns_to_cart() {
    let (_session, step_one) = step_one_with(&[BACKPACK]).await;

    let cart = step_one.cancel().await.unwrap();

    cart.verify_on_cart_page().await.unwrap();
    assert!(cart.contains(BACKPACK).await.unwrap());
}

#[tokio::test]
async fn cancel_from_overview_returns_to_listing_with_cart() {
    let (_session, step_one) = step_one_with(&[BACKPACK, BIKE_LIGHT]).await;
    let overview = step_one.complete_step_one(&CheckoutFixtures::valid()).await.unwrap();

    let inventory = overview.cancel().await.unwrap();

    inventory.verify_on_inventory_page().await.unwrap();
    assert_eq!(inventory.cart_badge_count().await.unwrap(), 2);
}
