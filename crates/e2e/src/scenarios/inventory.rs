//! Listing, sorting and product detail

use swaglabs_common::fixtures::constants::orders;
use swaglabs_common::fixtures::products::{BACKPACK, FLEECE_JACKET};
use swaglabs_common::fixtures::ProductCatalog;
use swaglabs_common::SortOption;

use super::{ensure, ensure_eq};
use crate::error::{E2eError, E2eResult};
use crate::session::Session;

fn reference_names() -> Vec<String> {
    orders::NAME_ASCENDING.iter().map(|n| n.to_string()).collect()
}

pub async fn sort_by_name(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;

    inventory.sort_by(SortOption::NameAsc).await?;
    ensure_eq("names A to Z", reference_names(), inventory.product_names().await?)?;
    ensure_eq(
        "active sort",
        SortOption::NameAsc.label().to_string(),
        inventory.active_sort_label().await?,
    )?;

    inventory.sort_by(SortOption::NameDesc).await?;
    let mut descending = reference_names();
    descending.reverse();
    ensure_eq("names Z to A", descending, inventory.product_names().await?)
}

pub async fn sort_by_price(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;

    inventory.sort_by(SortOption::PriceAsc).await?;
    let prices = inventory.product_prices().await?;
    ensure(
        prices.windows(2).all(|w| w[0] <= w[1]),
        "prices non-decreasing",
        &prices,
    )?;
    ensure_eq("prices low to high", orders::PRICE_ASCENDING.to_vec(), prices)?;

    inventory.sort_by(SortOption::PriceDesc).await?;
    let prices = inventory.product_prices().await?;
    ensure(
        prices.windows(2).all(|w| w[0] >= w[1]),
        "prices non-increasing",
        &prices,
    )
}

/// The listing shows the whole catalog at catalog prices
pub async fn inventory_lists_catalog(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;

    ensure_eq("product count", 6, inventory.product_count().await?)?;
    for product in ProductCatalog::all() {
        ensure_eq(
            &format!("price of {}", product.name),
            product.price,
            inventory.product_price(&product.name).await?,
        )?;
    }
    ensure_eq("empty cart badge", 0, inventory.cart_badge_count().await?)
}

/// Adding and removing on the detail screen mirrors on the badge and listing
pub async fn product_detail_add_remove(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    let expected = ProductCatalog::by_name(FLEECE_JACKET)?;

    let detail = inventory.open_product(FLEECE_JACKET).await?;
    detail.verify_on_product_detail().await?;
    ensure_eq("detail name", expected.name.clone(), detail.name().await?)?;
    ensure_eq("detail price", expected.price, detail.price().await?)?;
    ensure_eq("detail description", expected.description.clone(), detail.description().await?)?;

    detail.add_to_cart().await?;
    ensure(detail.is_in_cart().await, "remove button after add", "add button")?;
    ensure_eq("badge after detail add", 1, detail.cart_badge_count().await?)?;

    let inventory = detail.back_to_products().await?;
    inventory.verify_on_inventory_page().await?;
    ensure(inventory.is_in_cart(FLEECE_JACKET).await?, "listing shows jacket in cart", false)?;

    let detail = inventory.open_product(FLEECE_JACKET).await?;
    detail.remove_from_cart().await?;
    ensure(!detail.is_in_cart().await, "add button after remove", "remove button")?;
    ensure_eq("badge after detail remove", 0, detail.cart_badge_count().await?)
}

/// Lookups by a name that is not listed fail instead of doing nothing
pub async fn unknown_product_is_not_found(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    let missing = format!("{} XL", BACKPACK);

    match inventory.add_to_cart(&missing).await {
        Err(E2eError::NotFound { name, .. }) if name == missing => {}
        other => {
            return Err(E2eError::assertion(
                format!("NotFound for '{}'", missing),
                format!("{:?}", other),
            ))
        }
    }
    ensure_eq("badge after failed add", 0, inventory.cart_badge_count().await?)
}
