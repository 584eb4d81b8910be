//! Single product view

use swaglabs_common::fixtures::constants::paths;
use tracing::info;

use super::{price_from, BasePage, Header, InventoryPage};
use crate::error::E2eResult;

const NAME: &str = ".inventory_details_name";
const PRICE: &str = ".inventory_details_price";
const DESCRIPTION: &str = ".inventory_details_desc";
const IMAGE: &str = ".inventory_details_img";
const ADD_BUTTON: &str = "#add-to-cart";
const REMOVE_BUTTON: &str = "#remove";
const BACK_BUTTON: &str = "#back-to-products";

#[derive(Debug, Clone)]
pub struct ProductDetailPage {
    base: BasePage,
}

impl ProductDetailPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub fn header(&self) -> Header {
        Header::new(self.base.clone())
    }

    /// Open the detail route for a product id directly
    pub async fn open(&self, id: u32) -> E2eResult<()> {
        self.base.goto(&paths::product_detail(id)).await
    }

    pub async fn verify_on_product_detail(&self) -> E2eResult<()> {
        self.base.assert_url_matches(r"/inventory-item\.html\?id=\d+$").await?;
        self.base.assert_visible(NAME).await?;
        self.base.assert_visible(BACK_BUTTON).await
    }

    pub async fn name(&self) -> E2eResult<String> {
        self.base.text(NAME).await
    }

    pub async fn price(&self) -> E2eResult<f64> {
        let text = self.base.text(PRICE).await?;
        price_from(PRICE, &text)
    }

    pub async fn description(&self) -> E2eResult<String> {
        self.base.text(DESCRIPTION).await
    }

    pub async fn image_source(&self) -> E2eResult<Option<String>> {
        self.base.attribute(IMAGE, "src").await
    }

    pub async fn add_to_cart(&self) -> E2eResult<()> {
        info!("Adding displayed product to cart");
        self.base.click(ADD_BUTTON).await
    }

    pub async fn remove_from_cart(&self) -> E2eResult<()> {
        info!("Removing displayed product from cart");
        self.base.click(REMOVE_BUTTON).await
    }

    pub async fn is_in_cart(&self) -> bool {
        self.base.is_visible(REMOVE_BUTTON).await
    }

    pub async fn back_to_products(&self) -> E2eResult<InventoryPage> {
        self.base.click(BACK_BUTTON).await?;
        Ok(InventoryPage::new(self.base.clone()))
    }

    pub async fn cart_badge_count(&self) -> E2eResult<u32> {
        self.header().cart_badge_count().await
    }
}
