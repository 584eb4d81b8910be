//! Checkout flow

use swaglabs_common::fixtures::constants::{messages, TAX_RATE};
use swaglabs_common::fixtures::products::{BACKPACK, BIKE_LIGHT, FLEECE_JACKET, RED_T_SHIRT};
use swaglabs_common::fixtures::{CheckoutFixtures, ProductCatalog};
use swaglabs_common::CheckoutField;

use super::{ensure, ensure_eq};
use crate::error::E2eResult;
use crate::session::Session;

/// total = subtotal + tax for carts of several sizes
pub async fn total_matches_subtotal_plus_tax(session: Session) -> E2eResult<()> {
    let carts: [&[&str]; 3] = [
        &[BACKPACK],
        &[BACKPACK, BIKE_LIGHT],
        &[FLEECE_JACKET, RED_T_SHIRT, BIKE_LIGHT],
    ];

    for names in carts {
        let inventory = session.sign_in_standard().await?;
        inventory.add_products(names).await?;

        let overview = inventory
            .open_cart()
            .await?
            .checkout()
            .await?
            .complete_step_one(&CheckoutFixtures::valid())
            .await?;

        let summary = overview.verify_total_calculation().await?;
        let expected_subtotal = ProductCatalog::subtotal_of(names)?;
        ensure(
            (summary.subtotal - expected_subtotal).abs() < 0.005,
            format!("subtotal {:.2}", expected_subtotal),
            summary.subtotal,
        )?;
        ensure(
            (summary.tax - expected_subtotal * TAX_RATE).abs() <= 0.01,
            format!("tax of {:.2} at {}", expected_subtotal, TAX_RATE),
            summary.tax,
        )?;

        // Leave without ordering, then empty the cart for the next round
        let inventory = overview.cancel().await?;
        inventory.header().reset_app_state().await?;
        inventory.header().logout().await?;
    }
    Ok(())
}

/// Each empty field shows its own message and keeps step one
pub async fn missing_fields_block_checkout(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    inventory.add_to_cart(BACKPACK).await?;
    let step_one = inventory.open_cart().await?.checkout().await?;
    step_one.verify_on_checkout_step_one().await?;

    let cases = [
        (CheckoutFixtures::missing_first_name(), CheckoutField::FirstName),
        (CheckoutFixtures::missing_last_name(), CheckoutField::LastName),
        (CheckoutFixtures::missing_postal_code(), CheckoutField::PostalCode),
    ];

    for (info, field) in cases {
        step_one.fill_information(&info).await?;
        step_one.continue_checkout().await?;
        step_one.verify_on_checkout_step_one().await?;
        ensure_eq(
            &format!("error for missing {:?}", field),
            CheckoutFixtures::required_message(field).to_string(),
            step_one.error_message().await,
        )?;
        ensure_eq("inputs kept after rejection", info, step_one.field_values().await?)?;
        step_one.close_error().await?;
    }

    step_one.fill_information(&CheckoutFixtures::empty()).await?;
    step_one.continue_checkout().await?;
    ensure_eq(
        "error for empty form",
        messages::FIRST_NAME_REQUIRED.to_string(),
        step_one.error_message().await,
    )
}

/// Cancel leads back to the cart from step one and to the listing from step two
pub async fn cancel_transitions(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    inventory.add_to_cart(BIKE_LIGHT).await?;

    let cart = inventory.open_cart().await?.checkout().await?.cancel().await?;
    cart.verify_on_cart_page().await?;
    ensure(cart.contains(BIKE_LIGHT).await?, "cart unchanged by cancel", cart.item_names().await?)?;

    let inventory = cart
        .checkout()
        .await?
        .complete_step_one(&CheckoutFixtures::valid())
        .await?
        .cancel()
        .await?;
    inventory.verify_on_inventory_page().await?;
    ensure_eq("badge after cancelled overview", 1, inventory.cart_badge_count().await?)
}

/// Standard user buys the backpack and bike light and returns home
pub async fn end_to_end_purchase(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    inventory.add_products(&[BACKPACK, BIKE_LIGHT]).await?;
    ensure_eq("badge", 2, inventory.cart_badge_count().await?)?;

    let cart = inventory.open_cart().await?;
    cart.verify_on_cart_page().await?;
    ensure_eq(
        "cart lines",
        vec![BACKPACK.to_string(), BIKE_LIGHT.to_string()],
        cart.item_names().await?,
    )?;

    let step_one = cart.checkout().await?;
    step_one.verify_on_checkout_step_one().await?;
    let overview = step_one.complete_step_one(&CheckoutFixtures::valid()).await?;

    ensure_eq(
        "overview lines",
        vec![BACKPACK.to_string(), BIKE_LIGHT.to_string()],
        overview.item_names().await?,
    )?;
    ensure_eq("payment", messages::PAYMENT_INFO.to_string(), overview.payment_information().await?)?;
    ensure_eq("shipping", messages::SHIPPING_INFO.to_string(), overview.shipping_information().await?)?;
    overview.verify_total_calculation().await?;

    let complete = overview.finish().await?;
    complete.verify_on_checkout_complete().await?;
    let header = complete.header_text().await?;
    ensure(header.contains("Thank you"), "completion header mentions 'Thank you'", &header)?;
    ensure(complete.is_order_complete().await, "order complete", "header hidden")?;

    let inventory = complete.complete_post_order_flow().await?;
    ensure_eq("badge after order", 0, inventory.cart_badge_count().await?)
}
