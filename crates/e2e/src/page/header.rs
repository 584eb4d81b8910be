//! Header bar and side menu, present on every signed-in screen

use tracing::info;

use super::{BasePage, CartPage, InventoryPage, LoginPage};
use crate::error::{E2eError, E2eResult};

const CART_LINK: &str = ".shopping_cart_link";
const CART_BADGE: &str = ".shopping_cart_badge";
const MENU_BUTTON: &str = "#react-burger-menu-btn";
const MENU_CLOSE: &str = "#react-burger-cross-btn";
const ALL_ITEMS_LINK: &str = "#inventory_sidebar_link";
const ABOUT_LINK: &str = "#about_sidebar_link";
const LOGOUT_LINK: &str = "#logout_sidebar_link";
const RESET_LINK: &str = "#reset_sidebar_link";

#[derive(Debug, Clone)]
pub struct Header {
    base: BasePage,
}

impl Header {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    /// Number on the cart badge; 0 when the badge is absent
    pub async fn cart_badge_count(&self) -> E2eResult<u32> {
        if !self.base.is_visible(CART_BADGE).await {
            return Ok(0);
        }
        let text = self.base.text(CART_BADGE).await?;
        text.parse::<u32>().map_err(|_| E2eError::UnexpectedText {
            selector: CART_BADGE.to_string(),
            text,
        })
    }

    pub async fn is_cart_badge_visible(&self) -> bool {
        self.base.is_visible(CART_BADGE).await
    }

    pub async fn open_cart(&self) -> E2eResult<CartPage> {
        self.base.click(CART_LINK).await?;
        info!("Opened cart");
        Ok(CartPage::new(self.base.clone()))
    }

    /// Open the side menu and wait for its links
    pub async fn open_menu(&self) -> E2eResult<()> {
        self.base.click(MENU_BUTTON).await?;
        self.base.wait_for_visible(LOGOUT_LINK, None).await
    }

    pub async fn close_menu(&self) -> E2eResult<()> {
        self.base.click(MENU_CLOSE).await?;
        self.base.wait_for_hidden(LOGOUT_LINK, None).await
    }

    pub async fn is_menu_open(&self) -> bool {
        self.base.is_visible(LOGOUT_LINK).await
    }

    pub async fn logout(&self) -> E2eResult<LoginPage> {
        self.open_menu().await?;
        self.base.click(LOGOUT_LINK).await?;
        info!("Logged out");
        Ok(LoginPage::new(self.base.clone()))
    }

    /// Empty the cart through the menu, then close the menu again
    pub async fn reset_app_state(&self) -> E2eResult<()> {
        self.open_menu().await?;
        self.base.click(RESET_LINK).await?;
        info!("Reset app state");
        self.close_menu().await
    }

    pub async fn all_items(&self) -> E2eResult<InventoryPage> {
        self.open_menu().await?;
        self.base.click(ALL_ITEMS_LINK).await?;
        Ok(InventoryPage::new(self.base.clone()))
    }

    /// Target of the "About" menu link
    pub async fn about_link(&self) -> E2eResult<Option<String>> {
        self.base.attribute(ABOUT_LINK, "href").await
    }
}
