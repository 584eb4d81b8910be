//! Inventory listing, sorting and product detail

mod common;

use swaglabs_common::fixtures::constants::{orders, titles};
use swaglabs_common::fixtures::products::{BACKPACK, BIKE_LIGHT, ONESIE};
use swaglabs_common::fixtures::ProductCatalog;
use swaglabs_common::SortOption;
use swaglabs_e2e::E2eError;
use test_case::test_case;

#[tokio::test]
async fn listing_matches_catalog() {
    let (_session, inventory) = common::signed_in().await;

    assert_eq!(inventory.page_title().await.unwrap(), titles::INVENTORY);
    assert_eq!(inventory.product_count().await.unwrap(), 6);
    assert_eq!(inventory.product_names().await.unwrap(), ProductCatalog::names());
    for product in ProductCatalog::all() {
        assert_eq!(inventory.product_price(&product.name).await.unwrap(), product.price);
    }
    assert!(inventory
        .product_descriptions()
        .await
        .unwrap()
        .iter()
        .all(|d| !d.is_empty()));
}

#[test_case(SortOption::NameAsc ; "name ascending")]
#[test_case(SortOption::NameDesc ; "name descending")]
#[test_case(SortOption::PriceAsc ; "price ascending")]
#[test_case(SortOption::PriceDesc ; "price descending")]
#[tokio::test]
async fn sort_orders_listing(option: SortOption) {
    let (_session, inventory) = common::signed_in().await;

    inventory.sort_by(option).await.unwrap();

    assert_eq!(inventory.active_sort_label().await.unwrap(), option.label());
    let names = inventory.product_names().await.unwrap();
    let prices = inventory.product_prices().await.unwrap();
    match option {
        SortOption::NameAsc => assert_eq!(names, orders::NAME_ASCENDING),
        SortOption::NameDesc => {
            let mut expected = orders::NAME_ASCENDING.to_vec();
            expected.reverse();
            assert_eq!(names, expected);
        }
        SortOption::PriceAsc => assert_eq!(prices, orders::PRICE_ASCENDING),
        SortOption::PriceDesc => assert!(prices.windows(2).all(|w| w[0] >= w[1])),
    }
}

#[tokio::test]
async fn add_and_remove_toggle_button_and_badge() {
    let (_session, inventory) = common::signed_in().await;
    assert!(!inventory.is_cart_badge_visible().await);

    inventory.add_to_cart(BACKPACK).await.unwrap();
    assert!(inventory.is_in_cart(BACKPACK).await.unwrap());
    assert_eq!(inventory.cart_badge_count().await.unwrap(), 1);

    inventory.remove_from_cart(BACKPACK).await.unwrap();
    assert!(!inventory.is_in_cart(BACKPACK).await.unwrap());
    assert_eq!(inventory.cart_badge_count().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_product_name_is_not_found() {
    let (_session, inventory) = common::signed_in().await;

    let err = inventory.add_to_cart("Sauce Labs Hoverboard").await.unwrap_err();

    assert!(matches!(err, E2eError::NotFound { .. }), "got {err}");
}

#[tokio::test]
async fn product_detail_shows_catalog_entry() {
    let (_session, inventory) = common::signed_in().await;
    let expected = ProductCatalog::by_name(BIKE_LIGHT).unwrap();

    let detail = inventory.open_product(BIKE_LIGHT).await.unwrap();

    detail.verify_on_product_detail().await.unwrap();
    assert_eq!(detail.name().await.unwrap(), expected.name);
    assert_eq!(detail.price().await.unwrap(), expected.price);
    assert_eq!(detail.description().await.unwrap(), expected.description);
    assert!(detail.image_source().await.unwrap().is_some());
}

#[tokio::test]
async fn product_detail_cart_actions_carry_back_to_listing() {
    let (_session, inventory) = common::signed_in().await;
    let detail = inventory.open_product(ONESIE).await.unwrap();

    detail.add_to_cart().await.unwrap();
    assert!(detail.is_in_cart().await);
    assert_eq!(detail.cart_badge_count().await.unwrap(), 1);

    let inventory = detail.back_to_products().await.unwrap();
    inventory.verify_on_inventory_page().await.unwrap();
    assert!(inventory.is_in_cart(ONESIE).await.unwrap());

    let detail = inventory.open_product(ONESIE).await.unwrap();
    detail.remove_from_cart().await.unwrap();
    assert!(!detail.is_in_cart().await);
    assert_eq!(detail.cart_badge_count().await.unwrap(), 0);
}

#[tokio::test]
async fn menu_opens_and_closes() {
    let (_session, inventory) = common::signed_in().await;
    let header = inventory.header();

    header.open_menu().await.unwrap();
    assert!(header.is_menu_open().await);

    header.close_menu().await.unwrap();
    assert!(!header.is_menu_open().await);
}
