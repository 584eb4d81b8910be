//! URLs, screen titles, literal messages and timing constants.
//!
//! These strings are the storefront's contract; drift here is an upstream
//! breaking change.

pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Browser tab title on every screen
pub const APP_TITLE: &str = "Swag Labs";

/// Sales tax applied on the checkout overview
pub const TAX_RATE: f64 = 0.08;

/// Allowed difference between displayed total and subtotal + tax
pub const TOTAL_TOLERANCE: f64 = 0.01;

pub mod paths {
    pub const LOGIN: &str = "/";
    pub const INVENTORY: &str = "/inventory.html";
    pub const CART: &str = "/cart.html";
    pub const CHECKOUT_STEP_ONE: &str = "/checkout-step-one.html";
    pub const CHECKOUT_STEP_TWO: &str = "/checkout-step-two.html";
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";
    pub const PRODUCT_DETAIL: &str = "/inventory-item.html";

    /// Detail route for a product id
    pub fn product_detail(id: u32) -> String {
        format!("{}?id={}", PRODUCT_DETAIL, id)
    }
}

pub mod titles {
    pub const INVENTORY: &str = "Products";
    pub const CART: &str = "Your Cart";
    pub const CHECKOUT_STEP_ONE: &str = "Checkout: Your Information";
    pub const CHECKOUT_STEP_TWO: &str = "Checkout: Overview";
    pub const CHECKOUT_COMPLETE: &str = "Checkout: Complete!";
}

pub mod messages {
    pub const USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
    pub const PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
    pub const LOGIN_MISMATCH: &str =
        "Epic sadface: Username and password do not match any user in this service";
    pub const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";

    pub const FIRST_NAME_REQUIRED: &str = "Error: First Name is required";
    pub const LAST_NAME_REQUIRED: &str = "Error: Last Name is required";
    pub const POSTAL_CODE_REQUIRED: &str = "Error: Postal Code is required";

    pub const ORDER_COMPLETE_HEADER: &str = "Thank you for your order!";
    pub const ORDER_COMPLETE_TEXT: &str =
        "Your order has been dispatched, and will arrive just as fast as the pony can get there!";

    pub const PAYMENT_INFO: &str = "SauceCard #31337";
    pub const SHIPPING_INFO: &str = "Free Pony Express Delivery!";

    /// Banner shown when a protected page is opened without a session
    pub fn logged_out_access(path: &str) -> String {
        format!(
            "Epic sadface: You can only access '{}' when you are logged in.",
            path
        )
    }
}

pub mod labels {
    pub const SUBTOTAL: &str = "Item total: ";
    pub const TAX: &str = "Tax: ";
    pub const TOTAL: &str = "Total: ";
}

pub mod timeouts {
    /// Waits and assertions
    pub const DEFAULT_MS: u64 = 30_000;
    /// Single actions (click, fill, ...)
    pub const ACTION_MS: u64 = 10_000;
    pub const NAVIGATION_MS: u64 = 30_000;
    /// Fixed settle after choosing a sort option
    pub const SORT_SETTLE_MS: u64 = 500;
    /// Fixed settle after each cart line removal
    pub const CART_REMOVAL_SETTLE_MS: u64 = 300;
    /// Interval between polls of a pending assertion
    pub const POLL_INTERVAL_MS: u64 = 100;
}

/// Reference orderings of the catalog
pub mod orders {
    use super::super::products::*;

    pub const NAME_ASCENDING: [&str; 6] = [
        BACKPACK,
        BIKE_LIGHT,
        BOLT_T_SHIRT,
        FLEECE_JACKET,
        ONESIE,
        RED_T_SHIRT,
    ];

    pub const PRICE_ASCENDING: [f64; 6] = [7.99, 9.99, 15.99, 15.99, 29.99, 49.99];
}
