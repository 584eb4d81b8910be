//! Product listing

use swaglabs_common::fixtures::constants::{paths, titles};
use swaglabs_common::SortOption;
use tracing::info;

use super::{index_of, price_from, BasePage, CartPage, Header, ProductDetailPage};
use crate::error::E2eResult;
use crate::selector::{nth, nth_within};

const TITLE: &str = ".title";
const LIST: &str = ".inventory_list";
const ITEM: &str = ".inventory_item";
const ITEM_NAME: &str = ".inventory_item_name";
const ITEM_PRICE: &str = ".inventory_item_price";
const ITEM_DESC: &str = ".inventory_item_desc";
const ADD_BUTTON: &str = "button[id^=\"add-to-cart\"]";
const REMOVE_BUTTON: &str = "button[id^=\"remove\"]";
const SORT_DROPDOWN: &str = ".product_sort_container";
const ACTIVE_SORT: &str = ".active_option";

#[derive(Debug, Clone)]
pub struct InventoryPage {
    base: BasePage,
}

impl InventoryPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub fn header(&self) -> Header {
        Header::new(self.base.clone())
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.base.goto(paths::INVENTORY).await
    }

    pub async fn verify_on_inventory_page(&self) -> E2eResult<()> {
        self.base.assert_url_equals(paths::INVENTORY).await?;
        self.base.assert_text_equals(TITLE, titles::INVENTORY).await?;
        self.base.assert_visible(LIST).await
    }

    pub async fn page_title(&self) -> E2eResult<String> {
        self.base.text(TITLE).await
    }

    /// Names in display order
    pub async fn product_names(&self) -> E2eResult<Vec<String>> {
        self.base.all_texts(ITEM_NAME).await
    }

    /// Prices in display order, `$` stripped
    pub async fn product_prices(&self) -> E2eResult<Vec<f64>> {
        self.base
            .all_texts(ITEM_PRICE)
            .await?
            .iter()
            .map(|text| price_from(ITEM_PRICE, text))
            .collect()
    }

    pub async fn product_descriptions(&self) -> E2eResult<Vec<String>> {
        self.base.all_texts(ITEM_DESC).await
    }

    pub async fn product_count(&self) -> E2eResult<usize> {
        self.base.count(ITEM).await
    }

    async fn index_of(&self, name: &str) -> E2eResult<usize> {
        let names = self.product_names().await?;
        index_of("product", &names, name)
    }

    pub async fn add_to_cart(&self, name: &str) -> E2eResult<()> {
        let index = self.index_of(name).await?;
        info!("Adding '{}' to cart", name);
        self.base.click(&nth_within(ITEM, index, ADD_BUTTON)).await
    }

    pub async fn remove_from_cart(&self, name: &str) -> E2eResult<()> {
        let index = self.index_of(name).await?;
        info!("Removing '{}' from cart", name);
        self.base.click(&nth_within(ITEM, index, REMOVE_BUTTON)).await
    }

    /// Add each product in order
    pub async fn add_products(&self, names: &[&str]) -> E2eResult<()> {
        for name in names {
            self.add_to_cart(name).await?;
        }
        Ok(())
    }

    /// Whether the product's button currently reads "Remove"
    pub async fn is_in_cart(&self, name: &str) -> E2eResult<bool> {
        let index = self.index_of(name).await?;
        Ok(self.base.is_present(&nth_within(ITEM, index, REMOVE_BUTTON)).await)
    }

    pub async fn product_price(&self, name: &str) -> E2eResult<f64> {
        let index = self.index_of(name).await?;
        let selector = nth_within(ITEM, index, ITEM_PRICE);
        let text = self.base.text(&selector).await?;
        price_from(&selector, &text)
    }

    /// Choose a sort order, then wait the fixed settle delay
    pub async fn sort_by(&self, option: SortOption) -> E2eResult<()> {
        info!("Sorting by {}", option);
        self.base.select_option(SORT_DROPDOWN, option.value()).await?;
        self.base.pause(self.base.timeouts().sort_settle()).await;
        Ok(())
    }

    pub async fn active_sort_label(&self) -> E2eResult<String> {
        self.base.text(ACTIVE_SORT).await
    }

    pub async fn cart_badge_count(&self) -> E2eResult<u32> {
        self.header().cart_badge_count().await
    }

    pub async fn is_cart_badge_visible(&self) -> bool {
        self.header().is_cart_badge_visible().await
    }

    pub async fn open_cart(&self) -> E2eResult<CartPage> {
        self.header().open_cart().await
    }

    pub async fn open_product(&self, name: &str) -> E2eResult<ProductDetailPage> {
        let index = self.index_of(name).await?;
        info!("Opening product '{}'", name);
        self.base.click(&nth(ITEM_NAME, index)).await?;
        Ok(ProductDetailPage::new(self.base.clone()))
    }
}
