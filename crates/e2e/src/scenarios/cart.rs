//! Cart contents and badge

use swaglabs_common::fixtures::products::{BACKPACK, BIKE_LIGHT, BOLT_T_SHIRT, ONESIE};
use swaglabs_common::fixtures::ProductCatalog;

use super::{ensure, ensure_eq};
use crate::error::E2eResult;
use crate::session::Session;

/// Badge equals the number of distinct products added; removing decrements
pub async fn badge_tracks_cart(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    let picked = [BACKPACK, BIKE_LIGHT, BOLT_T_SHIRT];

    for (added, name) in picked.iter().enumerate() {
        inventory.add_to_cart(name).await?;
        ensure_eq(&format!("badge after adding {}", name), added as u32 + 1, inventory.cart_badge_count().await?)?;
    }

    inventory.remove_from_cart(BIKE_LIGHT).await?;
    ensure_eq("badge after removal", 2, inventory.cart_badge_count().await?)?;

    let cart = inventory.open_cart().await?;
    cart.verify_on_cart_page().await?;
    ensure_eq(
        "cart lines",
        vec![BACKPACK.to_string(), BOLT_T_SHIRT.to_string()],
        cart.item_names().await?,
    )?;

    cart.remove_item(BACKPACK).await?;
    ensure(!cart.contains(BACKPACK).await?, "backpack removed from cart", BACKPACK)?;
    ensure_eq("badge after cart removal", 1, cart.header().cart_badge_count().await?)?;

    let items = cart.items().await?;
    ensure_eq("remaining line count", 1, items.len())?;
    ensure_eq("remaining line price", ProductCatalog::by_name(BOLT_T_SHIRT)?.price, items[0].price)?;
    ensure_eq("remaining line quantity", 1, items[0].quantity)
}

pub async fn remove_all_items(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    inventory.add_products(&[BACKPACK, BIKE_LIGHT, ONESIE]).await?;

    let cart = inventory.open_cart().await?;
    ensure_eq("lines before", 3, cart.item_count().await?)?;

    cart.remove_all_items().await?;
    ensure(cart.is_empty().await?, "empty cart", cart.item_names().await?)?;
    ensure(
        !cart.header().is_cart_badge_visible().await,
        "badge hidden for empty cart",
        "visible",
    )
}

/// Reset from the menu empties the cart and hides the badge
pub async fn reset_app_state_clears_cart(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    inventory.add_products(&[BACKPACK, ONESIE]).await?;
    ensure_eq("badge before reset", 2, inventory.cart_badge_count().await?)?;

    inventory.header().reset_app_state().await?;
    ensure(!inventory.is_cart_badge_visible().await, "badge hidden after reset", "visible")?;
    ensure_eq("badge after reset", 0, inventory.cart_badge_count().await?)?;

    let cart = inventory.open_cart().await?;
    ensure_eq("lines after reset", 0, cart.item_count().await?)
}

pub async fn continue_shopping_keeps_cart(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    inventory.add_to_cart(ONESIE).await?;

    let cart = inventory.open_cart().await?;
    let inventory = cart.continue_shopping().await?;
    inventory.verify_on_inventory_page().await?;
    ensure(inventory.is_in_cart(ONESIE).await?, "onesie still in cart", false)?;
    ensure_eq("badge after continue shopping", 1, inventory.cart_badge_count().await?)
}
