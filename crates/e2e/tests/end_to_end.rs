//! Full purchase from sign-in to the confirmation screen

mod common;

use swaglabs_common::fixtures::constants::{messages, paths};
use swaglabs_common::fixtures::products::{BACKPACK, BIKE_LIGHT};
use swaglabs_common::fixtures::CheckoutFixtures;

#[tokio::test]
async fn standard_user_completes_purchase() {
    let (session, inventory) = common::signed_in().await;

    inventory.add_products(&[BACKPACK, BIKE_LIGHT]).await.unwrap();
    assert_eq!(inventory.cart_badge_count().await.unwrap(), 2);

    let cart = inventory.open_cart().await.unwrap();
    assert_eq!(cart.item_names().await.unwrap(), [BACKPACK, BIKE_LIGHT]);

    let overview = cart
        .checkout()
        .await
        .unwrap()
        .complete_step_one(&CheckoutFixtures::valid())
        .await
        .unwrap();
    overview.verify_total_calculation().await.unwrap();

    let complete = overview.finish().await.unwrap();
    complete.verify_on_checkout_complete().await.unwrap();
    assert_eq!(complete.header_text().await.unwrap(), messages::ORDER_COMPLETE_HEADER);
    assert_eq!(complete.body_text().await.unwrap(), messages::ORDER_COMPLETE_TEXT);
    assert!(complete.is_order_complete().await);

    let inventory = complete.complete_post_order_flow().await.unwrap();
    assert_eq!(
        session.base().current_url().await.unwrap(),
        session.config().url_for(paths::INVENTORY)
    );
    assert_eq!(inventory.cart_badge_count().await.unwrap(), 0);
    session.close().await.unwrap();
}

#[tokio::test]
async fn browser_back_from_cart_returns_to_listing() {
    let (session, inventory) = common::signed_in().await;
    inventory.open_cart().await.unwrap();

    session.base().go_back().await.unwrap();

    inventory.verify_on_inventory_page().await.unwrap();
}

#[tokio::test]
async fn failure_screenshot_lands_in_configured_dir() {
    let (session, _inventory) = common::signed_in().await;

    let path = session.screenshot("checkout/overview").await.unwrap();

    assert!(path.starts_with(&session.config().screenshot_dir));
    assert!(path.exists());
    std::fs::remove_file(path).unwrap();
}
