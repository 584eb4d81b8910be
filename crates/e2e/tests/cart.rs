//! Cart contents, removal and app-state reset

mod common;

use swaglabs_common::fixtures::constants::titles;
use swaglabs_common::fixtures::products::{
    BACKPACK, BIKE_LIGHT, BOLT_T_SHIRT, FLEECE_JACKET, ONESIE, RED_T_SHIRT,
};
use swaglabs_common::fixtures::ProductCatalog;
use swaglabs_e2e::E2eError;
use test_case::test_case;

const ALL: [&str; 6] = [BACKPACK, BIKE_LIGHT, BOLT_T_SHIRT, FLEECE_JACKET, ONESIE, RED_T_SHIRT];

#[test_case(1 ; "one item")]
#[test_case(3 ; "three items")]
#[test_case(6 ; "whole catalog")]
#[tokio::test]
async fn badge_and_cart_agree(count: usize) {
    let (_session, inventory) = common::signed_in().await;
    let names = &ALL[..count];

    inventory.add_products(names).await.unwrap();
    assert_eq!(inventory.cart_badge_count().await.unwrap(), count as u32);

    let cart = inventory.open_cart().await.unwrap();
    cart.verify_on_cart_page().await.unwrap();
    assert_eq!(cart.base().text(".title").await.unwrap(), titles::CART);
    assert_eq!(cart.item_count().await.unwrap(), count);
    assert_eq!(cart.item_names().await.unwrap(), names);

    let items = cart.items().await.unwrap();
    for item in &items {
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, ProductCatalog::by_name(&item.name).unwrap().price);
    }
}

#[tokio::test]
async fn remove_single_item_keeps_the_rest() {
    let (_session, inventory) = common::signed_in().await;
    inventory.add_products(&[BACKPACK, BIKE_LIGHT]).await.unwrap();
    let cart = inventory.open_cart().await.unwrap();

    cart.remove_item(BACKPACK).await.unwrap();

    assert_eq!(cart.item_names().await.unwrap(), [BIKE_LIGHT]);
    assert!(!cart.contains(BACKPACK).await.unwrap());
    assert_eq!(cart.header().cart_badge_count().await.unwrap(), 1);
}

#[tokio::test]
async fn remove_missing_item_is_not_found() {
    let (_session, inventory) = common::signed_in().await;
    inventory.add_to_cart(BACKPACK).await.unwrap();
    let cart = inventory.open_cart().await.unwrap();

    assert!(matches!(
        cart.remove_item(ONESIE).await,
        Err(E2eError::NotFound { .. })
    ));
    assert!(matches!(
        cart.remove_item_at(5).await,
        Err(E2eError::NotFound { .. })
    ));
    assert_eq!(cart.item_count().await.unwrap(), 1);
}

#[tokio::test]
async fn remove_all_items_empties_cart() {
    let (_session, inventory) = common::signed_in().await;
    inventory.add_products(&ALL[..4]).await.unwrap();
    let cart = inventory.open_cart().await.unwrap();

    cart.remove_all_items().await.unwrap();

    assert!(cart.is_empty().await.unwrap());
    assert!(!cart.header().is_cart_badge_visible().await);
}

#[tokio::test]
async fn remove_all_on_empty_cart_is_a_no_op() {
    let (_session, inventory) = common::signed_in().await;
    let cart = inventory.open_cart().await.unwrap();

    cart.remove_all_items().await.unwrap();

    assert!(cart.is_empty().await.unwrap());
}

#[tokio::test]
async fn continue_shopping_keeps_cart() {
    let (_session, inventory) = common::signed_in().await;
    inventory.add_to_cart(FLEECE_JACKET).await.unwrap();

    let inventory = inventory.open_cart().await.unwrap().continue_shopping().await.unwrap();

    inventory.verify_on_inventory_page().await.unwrap();
    assert!(inventory.is_in_cart(FLEECE_JACKET).await.unwrap());
    assert_eq!(inventory.cart_badge_count().await.unwrap(), 1);
}

#[tokio::test]
async fn reset_app_state_clears_badge() {
    let (_session, inventory) = common::signed_in().await;
    inventory.add_products(&[BACKPACK, ONESIE]).await.unwrap();

    inventory.header().reset_app_state().await.unwrap();

    assert_eq!(inventory.cart_badge_count().await.unwrap(), 0);
    let cart = inventory.open_cart().await.unwrap();
    assert!(cart.is_empty().await.unwrap());
}

#[tokio::test]
async fn cart_survives_logout() {
    let (session, inventory) = common::signed_in().await;
    inventory.add_to_cart(BOLT_T_SHIRT).await.unwrap();

    inventory.header().logout().await.unwrap();
    let inventory = session.sign_in_standard().await.unwrap();

    assert_eq!(inventory.cart_badge_count().await.unwrap(), 1);
}
