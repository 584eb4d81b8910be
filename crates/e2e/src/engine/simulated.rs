//! In-memory model of the Swag Labs storefront
//!
//! Renders each screen into a small element tree carrying the same hooks
//! (ids, classes, `data-test` attributes) as the real application, and
//! applies the application's rules when elements are clicked or forms are
//! submitted. Selectors are matched against the hooks by exact string, with
//! whitespace as the descendant combinator, `>>` chaining and `nth=N`.
//!
//! State never changes on its own, so missing or hidden elements fail an
//! action immediately with the same timeout error the browser would raise.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use swaglabs_common::fixtures::constants::{messages, paths, titles, APP_TITLE, TAX_RATE};
use swaglabs_common::fixtures::users::DEFAULT_PASSWORD;
use swaglabs_common::fixtures::{CheckoutFixtures, ProductCatalog, UserDirectory};
use swaglabs_common::{format_price, CheckoutInfo, Product, SortOption, SuiteConfig, UserCategory};
use tracing::{debug, trace};

use super::{BrowserEngine, ClickOptions, LoadState, MouseButton, WaitState};
use crate::error::{E2eError, E2eResult};

/// 1x1 transparent PNG written for screenshots
const BLANK_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const POLL: Duration = Duration::from_millis(25);

/// Product id used for a detail route without a valid `id`
const MISSING_PRODUCT: u32 = u32::MAX;

/// Back-navigation entries kept per session
const MAX_HISTORY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Login,
    Inventory,
    Cart,
    CheckoutStepOne,
    CheckoutStepTwo,
    CheckoutComplete,
    ProductDetail(u32),
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Username,
    Password,
    FirstName,
    LastName,
    PostalCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Login,
    DismissError,
    AddToCart(u32),
    RemoveFromCart(u32),
    OpenProduct(u32),
    OpenInventory,
    OpenCart,
    Checkout,
    Continue,
    CancelStepOne,
    CancelStepTwo,
    Finish,
    OpenMenu,
    CloseMenu,
    Logout,
    ResetAppState,
}

/// Rendered element
#[derive(Debug, Clone)]
struct Node {
    hooks: Vec<String>,
    text: String,
    attrs: Vec<(String, String)>,
    visible: bool,
    enabled: bool,
    field: Option<Field>,
    select: bool,
    action: Option<Action>,
    children: Vec<Node>,
}

impl Node {
    fn el(hooks: &[&str]) -> Self {
        Self {
            hooks: hooks.iter().map(|h| h.to_string()).collect(),
            text: String::new(),
            attrs: Vec::new(),
            visible: true,
            enabled: true,
            field: None,
            select: false,
            action: None,
            children: Vec::new(),
        }
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    fn field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Hide this element and everything inside it
    fn hidden_if(mut self, hidden: bool) -> Self {
        if hidden {
            self.hide();
        }
        self
    }

    /// Disable every element carrying `hook`, at any depth
    fn disable_matching(&mut self, hook: &str) {
        if self.matches(hook) {
            self.enabled = false;
        }
        for child in &mut self.children {
            child.disable_matching(hook);
        }
    }

    fn hide(&mut self) {
        self.visible = false;
        for child in &mut self.children {
            child.hide();
        }
    }

    fn matches(&self, hook: &str) -> bool {
        self.hooks.iter().any(|h| h == hook)
    }

    fn collect<'a>(&'a self, hook: &str, found: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.matches(hook) && !found.iter().any(|n| std::ptr::eq(*n, child)) {
                found.push(child);
            }
            child.collect(hook, found);
        }
    }

    fn inner_text(&self) -> String {
        if !self.text.is_empty() || self.children.is_empty() {
            return self.text.clone();
        }
        self.children
            .iter()
            .map(Node::inner_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

/// Resolve a selector against the rendered page
fn resolve<'a>(root: &'a Node, selector: &str) -> E2eResult<Vec<&'a Node>> {
    let mut scope: Vec<&Node> = vec![root];

    for segment in selector.split(">>").map(str::trim) {
        if let Some(index) = segment.strip_prefix("nth=") {
            let index: usize = index.trim().parse().map_err(|_| {
                E2eError::Engine(format!("Unsupported selector segment '{}'", segment))
            })?;
            scope = scope.get(index).copied().into_iter().collect();
            continue;
        }

        for part in segment.split_whitespace() {
            let mut found = Vec::new();
            for node in &scope {
                node.collect(part, &mut found);
            }
            scope = found;
        }
    }

    Ok(scope)
}

/// Screens that need a signed-in session
fn is_protected(screen: Screen) -> bool {
    !matches!(screen, Screen::Blank | Screen::Login | Screen::Missing)
}

#[derive(Debug)]
struct StoreState {
    screen: Screen,
    history: Vec<Screen>,
    session: Option<String>,
    /// Product ids in the order they were added
    cart: Vec<u32>,
    sort: SortOption,
    menu_open: bool,
    error: Option<String>,
    form: HashMap<Field, String>,
    focused: Option<String>,
    closed: bool,
    catalog: Vec<Product>,
    /// Hooks rendered disabled regardless of screen
    disabled: Vec<String>,
}

impl StoreState {
    fn new() -> Self {
        Self {
            screen: Screen::Blank,
            history: Vec::new(),
            session: None,
            cart: Vec::new(),
            sort: SortOption::NameAsc,
            menu_open: false,
            error: None,
            form: HashMap::new(),
            focused: None,
            closed: false,
            catalog: ProductCatalog::all(),
            disabled: Vec::new(),
        }
    }

    fn ensure_open(&self) -> E2eResult<()> {
        if self.closed {
            Err(E2eError::Engine("Target page, context or browser has been closed".to_string()))
        } else {
            Ok(())
        }
    }

    fn url(&self, base_url: &str) -> String {
        match self.screen {
            Screen::Blank => "about:blank".to_string(),
            _ => format!("{}{}", base_url, self.path()),
        }
    }

    fn path(&self) -> String {
        match self.screen {
            Screen::Blank => String::new(),
            Screen::Login => paths::LOGIN.to_string(),
            Screen::Inventory => paths::INVENTORY.to_string(),
            Screen::Cart => paths::CART.to_string(),
            Screen::CheckoutStepOne => paths::CHECKOUT_STEP_ONE.to_string(),
            Screen::CheckoutStepTwo => paths::CHECKOUT_STEP_TWO.to_string(),
            Screen::CheckoutComplete => paths::CHECKOUT_COMPLETE.to_string(),
            Screen::ProductDetail(id) => paths::product_detail(id),
            Screen::Missing => "/404".to_string(),
        }
    }

    /// Switch screens the way a route change would: menu closed, banner
    /// and form inputs gone
    fn navigate(&mut self, screen: Screen) {
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(self.screen);
        self.screen = screen;
        self.remount();
    }

    /// Return to the previous screen, through the same login gate as `goto`
    fn back(&mut self) {
        let Some(previous) = self.history.pop() else {
            return;
        };
        self.screen = previous;
        self.remount();

        if is_protected(previous) && self.session.is_none() {
            let path = self.path();
            let path = path.split('?').next().unwrap_or_default().to_string();
            self.screen = Screen::Login;
            self.error = Some(messages::logged_out_access(&path));
        }
    }

    fn remount(&mut self) {
        self.menu_open = false;
        self.error = None;
        self.form.clear();
        self.focused = None;
    }

    fn product(&self, id: u32) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == id)
    }

    fn sorted_catalog(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.catalog.iter().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        match self.sort {
            SortOption::NameAsc => {}
            SortOption::NameDesc => products.reverse(),
            SortOption::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOption::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
        products
    }

    fn cart_products(&self) -> Vec<&Product> {
        self.cart.iter().filter_map(|id| self.product(*id)).collect()
    }

    fn checkout_info(&self) -> CheckoutInfo {
        let value = |field: Field| self.form.get(&field).cloned().unwrap_or_default();
        CheckoutInfo {
            first_name: value(Field::FirstName),
            last_name: value(Field::LastName),
            postal_code: value(Field::PostalCode),
        }
    }

    /// Subtotal, tax and total as the overview computes them
    fn totals(&self) -> (f64, f64, f64) {
        let subtotal: f64 = self.cart_products().iter().map(|p| p.price).sum();
        let tax = (subtotal * TAX_RATE * 100.0).round() / 100.0;
        (subtotal, tax, subtotal + tax)
    }

    fn goto_path(&mut self, path: &str, query: Option<&str>) {
        let requested = match path {
            "" | "/" | "/index.html" => Screen::Login,
            p if p == paths::INVENTORY => Screen::Inventory,
            p if p == paths::CART => Screen::Cart,
            p if p == paths::CHECKOUT_STEP_ONE => Screen::CheckoutStepOne,
            p if p == paths::CHECKOUT_STEP_TWO => Screen::CheckoutStepTwo,
            p if p == paths::CHECKOUT_COMPLETE => Screen::CheckoutComplete,
            p if p == paths::PRODUCT_DETAIL => {
                let id = query
                    .and_then(|q| q.split('&').find_map(|kv| kv.strip_prefix("id=")))
                    .and_then(|id| id.parse().ok())
                    .unwrap_or(MISSING_PRODUCT);
                Screen::ProductDetail(id)
            }
            _ => Screen::Missing,
        };

        if is_protected(requested) && self.session.is_none() {
            self.navigate(Screen::Login);
            self.error = Some(messages::logged_out_access(path));
            return;
        }

        self.navigate(requested);
    }

    fn apply(&mut self, action: Action) {
        debug!("simulated storefront: {:?} on {:?}", action, self.screen);

        match action {
            Action::Login => self.submit_login(),
            Action::DismissError => self.error = None,
            Action::AddToCart(id) => {
                if !self.cart.contains(&id) {
                    self.cart.push(id);
                }
            }
            Action::RemoveFromCart(id) => self.cart.retain(|c| *c != id),
            Action::OpenProduct(id) => self.navigate(Screen::ProductDetail(id)),
            Action::OpenInventory => self.navigate(Screen::Inventory),
            Action::OpenCart => self.navigate(Screen::Cart),
            Action::Checkout => self.navigate(Screen::CheckoutStepOne),
            Action::Continue => match self.checkout_info().first_missing_field() {
                Some(field) => {
                    self.error = Some(CheckoutFixtures::required_message(field).to_string())
                }
                None => self.navigate(Screen::CheckoutStepTwo),
            },
            Action::CancelStepOne => self.navigate(Screen::Cart),
            Action::CancelStepTwo => self.navigate(Screen::Inventory),
            Action::Finish => {
                self.cart.clear();
                self.navigate(Screen::CheckoutComplete);
            }
            Action::OpenMenu => self.menu_open = true,
            Action::CloseMenu => self.menu_open = false,
            Action::Logout => {
                self.session = None;
                self.navigate(Screen::Login);
            }
            Action::ResetAppState => {
                self.cart.clear();
                self.sort = SortOption::NameAsc;
            }
        }
    }

    fn submit_login(&mut self) {
        let username = self.form.get(&Field::Username).cloned().unwrap_or_default();
        let password = self.form.get(&Field::Password).cloned().unwrap_or_default();

        let rejection = if username.is_empty() {
            Some(messages::USERNAME_REQUIRED)
        } else if password.is_empty() {
            Some(messages::PASSWORD_REQUIRED)
        } else {
            match UserDirectory::by_username(&username) {
                Ok(user) if password == DEFAULT_PASSWORD => {
                    if user.category == UserCategory::LockedOut {
                        Some(messages::LOCKED_OUT)
                    } else {
                        None
                    }
                }
                _ => Some(messages::LOGIN_MISMATCH),
            }
        };

        match rejection {
            Some(message) => self.error = Some(message.to_string()),
            None => {
                self.session = Some(username);
                self.navigate(Screen::Inventory);
            }
        }
    }

    fn press(&mut self, field: Option<Field>, key: &str) {
        if key != "Enter" {
            return;
        }
        match field {
            Some(Field::Username | Field::Password) => self.submit_login(),
            Some(Field::FirstName | Field::LastName | Field::PostalCode) => {
                self.apply(Action::Continue)
            }
            None => {}
        }
    }

    fn render(&self) -> Node {
        let body = match self.screen {
            Screen::Login => self.render_login(),
            Screen::Inventory => self.render_inventory(),
            Screen::Cart => self.render_cart(),
            Screen::CheckoutStepOne => self.render_step_one(),
            Screen::CheckoutStepTwo => self.render_step_two(),
            Screen::CheckoutComplete => self.render_complete(),
            Screen::ProductDetail(id) => self.render_detail(id),
            Screen::Missing => vec![Node::el(&["h1"]).text("404 Not Found")],
            Screen::Blank => Vec::new(),
        };
        let mut page = Node::el(&["html"]).child(Node::el(&["body"]).children(body));
        for hook in &self.disabled {
            page.disable_matching(hook);
        }
        page
    }

    fn error_banner(&self) -> Option<Node> {
        self.error.as_ref().map(|message| {
            Node::el(&["[data-test=\"error\"]", ".error-message-container", "h3"])
                .text(message.clone())
                .child(
                    Node::el(&["button", ".error-button", "[data-test=\"error-button\"]"])
                        .on_click(Action::DismissError),
                )
        })
    }

    fn input(&self, hooks: &[&str], field: Field, placeholder: &str) -> Node {
        Node::el(hooks)
            .field(field)
            .attr("placeholder", placeholder)
            .attr("type", if field == Field::Password { "password" } else { "text" })
    }

    fn render_login(&self) -> Vec<Node> {
        let mut form = Node::el(&["form", ".login-box"])
            .child(self.input(&["input", "#user-name", "[data-test=\"username\"]"], Field::Username, "Username"))
            .child(self.input(&["input", "#password", "[data-test=\"password\"]"], Field::Password, "Password"))
            .child(
                Node::el(&["input", "#login-button", "[data-test=\"login-button\"]"])
                    .attr("type", "submit")
                    .attr("value", "Login")
                    .on_click(Action::Login),
            );
        if let Some(banner) = self.error_banner() {
            form = form.child(banner);
        }

        vec![Node::el(&[".login_logo"]).text(APP_TITLE), form]
    }

    fn render_header(&self, title: Option<&str>) -> Node {
        let mut cart_link = Node::el(&["a", ".shopping_cart_link", "[data-test=\"shopping-cart-link\"]"])
            .on_click(Action::OpenCart);
        if !self.cart.is_empty() {
            cart_link = cart_link.child(
                Node::el(&["span", ".shopping_cart_badge", "[data-test=\"shopping-cart-badge\"]"])
                    .text(self.cart.len().to_string()),
            );
        }

        let menu = Node::el(&["nav", ".bm-menu-wrap"])
            .child(Node::el(&["a", "#inventory_sidebar_link"]).text("All Items").on_click(Action::OpenInventory))
            .child(
                Node::el(&["a", "#about_sidebar_link"])
                    .text("About")
                    .attr("href", "https://saucelabs.com/"),
            )
            .child(Node::el(&["a", "#logout_sidebar_link"]).text("Logout").on_click(Action::Logout))
            .child(Node::el(&["a", "#reset_sidebar_link"]).text("Reset App State").on_click(Action::ResetAppState))
            .child(Node::el(&["button", "#react-burger-cross-btn"]).on_click(Action::CloseMenu))
            .hidden_if(!self.menu_open);

        let mut header = Node::el(&["#header_container", ".header_container"])
            .child(Node::el(&["button", "#react-burger-menu-btn"]).text("Open Menu").on_click(Action::OpenMenu))
            .child(menu)
            .child(Node::el(&[".app_logo"]).text(APP_TITLE))
            .child(cart_link);
        if let Some(title) = title {
            header = header.child(Node::el(&["span", ".title", "[data-test=\"title\"]"]).text(title));
        }
        header
    }

    fn cart_button(&self, product: &Product, hooks: &[&str]) -> Node {
        let slug = product.slug();
        if self.cart.contains(&product.id) {
            let id = format!("#remove-{}", slug);
            let mut all: Vec<&str> = hooks.to_vec();
            all.extend(["button[id^=\"remove\"]", id.as_str()]);
            Node::el(&all).text("Remove").on_click(Action::RemoveFromCart(product.id))
        } else {
            let id = format!("#add-to-cart-{}", slug);
            let mut all: Vec<&str> = hooks.to_vec();
            all.extend(["button[id^=\"add-to-cart\"]", id.as_str()]);
            Node::el(&all).text("Add to cart").on_click(Action::AddToCart(product.id))
        }
    }

    fn render_inventory(&self) -> Vec<Node> {
        let sort = Node::el(&["select", ".product_sort_container", "[data-test=\"product-sort-container\"]"])
            .attr("value", self.sort.value())
            .text(self.sort.label());
        let sort = Node { select: true, ..sort };

        let items = self.sorted_catalog().into_iter().map(|product| {
            Node::el(&[".inventory_item", "[data-test=\"inventory-item\"]"])
                .child(
                    Node::el(&["img", ".inventory_item_img"])
                        .attr("src", product.image.clone().unwrap_or_default())
                        .attr("alt", product.name.clone()),
                )
                .child(
                    Node::el(&[".inventory_item_name", "[data-test=\"inventory-item-name\"]"])
                        .text(product.name.clone())
                        .on_click(Action::OpenProduct(product.id)),
                )
                .child(Node::el(&[".inventory_item_desc"]).text(product.description.clone()))
                .child(
                    Node::el(&[".inventory_item_price", "[data-test=\"inventory-item-price\"]"])
                        .text(product.display_price()),
                )
                .child(self.cart_button(product, &["button", ".btn_inventory"]))
        });

        vec![
            self.render_header(Some(titles::INVENTORY)),
            sort,
            Node::el(&[".active_option"]).text(self.sort.label()),
            Node::el(&[".inventory_list", "[data-test=\"inventory-list\"]"]).children(items),
        ]
    }

    fn render_detail(&self, id: u32) -> Vec<Node> {
        let back = Node::el(&["button", "#back-to-products", "[data-test=\"back-to-products\"]"])
            .text("Back to products")
            .on_click(Action::OpenInventory);

        let details = match self.product(id) {
            Some(product) => Node::el(&[".inventory_details"])
                .child(
                    Node::el(&["img", ".inventory_details_img"])
                        .attr("src", product.image.clone().unwrap_or_default())
                        .attr("alt", product.name.clone()),
                )
                .child(Node::el(&[".inventory_details_name"]).text(product.name.clone()))
                .child(Node::el(&[".inventory_details_desc"]).text(product.description.clone()))
                .child(Node::el(&[".inventory_details_price"]).text(product.display_price()))
                .child({
                    let hooks: &[&str] = if self.cart.contains(&id) {
                        &["button", ".btn_inventory", "#remove"]
                    } else {
                        &["button", ".btn_inventory", "#add-to-cart"]
                    };
                    self.cart_button(product, hooks)
                }),
            None => Node::el(&[".inventory_details"])
                .child(Node::el(&[".inventory_details_name"]).text("ITEM NOT FOUND")),
        };

        vec![self.render_header(None), back, details]
    }

    fn line_items(&self, removable: bool) -> Node {
        let lines = self.cart_products().into_iter().map(|product| {
            let mut line = Node::el(&[".cart_item", "[data-test=\"inventory-item\"]"])
                .child(Node::el(&[".cart_quantity", "[data-test=\"item-quantity\"]"]).text("1"))
                .child(
                    Node::el(&[".inventory_item_name", "[data-test=\"inventory-item-name\"]"])
                        .text(product.name.clone())
                        .on_click(Action::OpenProduct(product.id)),
                )
                .child(Node::el(&[".inventory_item_desc"]).text(product.description.clone()))
                .child(
                    Node::el(&[".inventory_item_price", "[data-test=\"inventory-item-price\"]"])
                        .text(product.display_price()),
                );
            if removable {
                line = line.child(self.cart_button(product, &["button", ".cart_button"]));
            }
            line
        });
        Node::el(&[".cart_list", "[data-test=\"cart-list\"]"]).children(lines)
    }

    fn render_cart(&self) -> Vec<Node> {
        vec![
            self.render_header(Some(titles::CART)),
            self.line_items(true),
            Node::el(&["button", "#continue-shopping", "[data-test=\"continue-shopping\"]"])
                .text("Continue Shopping")
                .on_click(Action::OpenInventory),
            Node::el(&["button", "#checkout", "[data-test=\"checkout\"]"])
                .text("Checkout")
                .on_click(Action::Checkout),
        ]
    }

    fn render_step_one(&self) -> Vec<Node> {
        let mut form = Node::el(&["form", ".checkout_info"])
            .child(self.input(&["input", "#first-name", "[data-test=\"firstName\"]"], Field::FirstName, "First Name"))
            .child(self.input(&["input", "#last-name", "[data-test=\"lastName\"]"], Field::LastName, "Last Name"))
            .child(self.input(&["input", "#postal-code", "[data-test=\"postalCode\"]"], Field::PostalCode, "Zip/Postal Code"));
        if let Some(banner) = self.error_banner() {
            form = form.child(banner);
        }

        vec![
            self.render_header(Some(titles::CHECKOUT_STEP_ONE)),
            form,
            Node::el(&["button", "#cancel", "[data-test=\"cancel\"]"])
                .text("Cancel")
                .on_click(Action::CancelStepOne),
            Node::el(&["input", "#continue", "[data-test=\"continue\"]"])
                .attr("type", "submit")
                .attr("value", "Continue")
                .on_click(Action::Continue),
        ]
    }

    fn render_step_two(&self) -> Vec<Node> {
        let (subtotal, tax, total) = self.totals();

        vec![
            self.render_header(Some(titles::CHECKOUT_STEP_TWO)),
            self.line_items(false),
            Node::el(&[".summary_info"])
                .child(
                    Node::el(&[".summary_value_label", "[data-test=\"payment-info-value\"]"])
                        .text(messages::PAYMENT_INFO),
                )
                .child(
                    Node::el(&[".summary_value_label", "[data-test=\"shipping-info-value\"]"])
                        .text(messages::SHIPPING_INFO),
                )
                .child(
                    Node::el(&[".summary_subtotal_label", "[data-test=\"subtotal-label\"]"])
                        .text(format!("Item total: {}", format_price(subtotal))),
                )
                .child(
                    Node::el(&[".summary_tax_label", "[data-test=\"tax-label\"]"])
                        .text(format!("Tax: {}", format_price(tax))),
                )
                .child(
                    Node::el(&[".summary_total_label", "[data-test=\"total-label\"]"])
                        .text(format!("Total: {}", format_price(total))),
                ),
            Node::el(&["button", "#cancel", "[data-test=\"cancel\"]"])
                .text("Cancel")
                .on_click(Action::CancelStepTwo),
            Node::el(&["button", "#finish", "[data-test=\"finish\"]"])
                .text("Finish")
                .on_click(Action::Finish),
        ]
    }

    fn render_complete(&self) -> Vec<Node> {
        vec![
            self.render_header(Some(titles::CHECKOUT_COMPLETE)),
            Node::el(&["img", ".pony_express", "[data-test=\"pony-express\"]"]).attr("alt", "Pony Express"),
            Node::el(&["h2", ".complete-header", "[data-test=\"complete-header\"]"])
                .text(messages::ORDER_COMPLETE_HEADER),
            Node::el(&[".complete-text", "[data-test=\"complete-text\"]"])
                .text(messages::ORDER_COMPLETE_TEXT),
            Node::el(&["button", "#back-to-products", "[data-test=\"back-to-products\"]"])
                .text("Back Home")
                .on_click(Action::OpenInventory),
        ]
    }
}

/// Simulated engine; one storefront session per instance
pub struct SimulatedStore {
    base_url: String,
    action_timeout_ms: u64,
    state: Mutex<StoreState>,
}

impl SimulatedStore {
    pub fn new(base_url: impl Into<String>, action_timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            action_timeout_ms,
            state: Mutex::new(StoreState::new()),
        }
    }

    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeouts.action_ms)
    }

    /// Render elements matching `hook` disabled from now on
    pub fn disable(&self, hook: &str) {
        self.state.lock().disabled.push(hook.to_string());
    }

    /// Resolve `selector` to exactly one element and hand it to `f`
    fn with_element<T>(
        &self,
        op: &str,
        selector: &str,
        f: impl FnOnce(&mut StoreState, &Node) -> E2eResult<T>,
    ) -> E2eResult<T> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        let page = state.render();
        let matches = resolve(&page, selector)?;
        let node = match matches.as_slice() {
            [] => return Err(E2eError::timeout(format!("{} {}", op, selector), self.action_timeout_ms)),
            [node] => *node,
            many => {
                return Err(E2eError::Engine(format!(
                    "strict mode violation: {} resolved to {} elements",
                    selector,
                    many.len()
                )))
            }
        };
        f(&mut state, node)
    }

    /// Like `with_element` but the element must also be actionable
    fn with_actionable<T>(
        &self,
        op: &str,
        selector: &str,
        f: impl FnOnce(&mut StoreState, &Node) -> E2eResult<T>,
    ) -> E2eResult<T> {
        let timeout_ms = self.action_timeout_ms;
        self.with_element(op, selector, |state, node| {
            if !node.visible || !node.enabled {
                return Err(E2eError::timeout(format!("{} {} (not actionable)", op, selector), timeout_ms));
            }
            f(state, node)
        })
    }

    fn selector_state(&self, selector: &str) -> E2eResult<(usize, bool)> {
        let state = self.state.lock();
        state.ensure_open()?;
        let page = state.render();
        let matches = resolve(&page, selector)?;
        let first_visible = matches.first().map(|n| n.visible).unwrap_or(false);
        Ok((matches.len(), first_visible))
    }

    fn strip_base<'a>(&self, url: &'a str) -> E2eResult<&'a str> {
        if let Some(rest) = url.strip_prefix(&self.base_url) {
            Ok(rest)
        } else if url.starts_with('/') {
            Ok(url)
        } else {
            Err(E2eError::Engine(format!(
                "navigation to {} is outside the simulated storefront {}",
                url, self.base_url
            )))
        }
    }
}

#[async_trait]
impl BrowserEngine for SimulatedStore {
    async fn goto(&self, url: &str, _wait_until: LoadState) -> E2eResult<()> {
        let target = self.strip_base(url)?;
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        let mut state = self.state.lock();
        state.ensure_open()?;
        state.goto_path(path, query);
        trace!("simulated goto {} -> {:?}", url, state.screen);
        Ok(())
    }

    async fn reload(&self) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.remount();
        Ok(())
    }

    async fn go_back(&self) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.back();
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.url(&self.base_url))
    }

    async fn title(&self) -> E2eResult<String> {
        let state = self.state.lock();
        state.ensure_open()?;
        if state.screen == Screen::Blank {
            return Ok(String::new());
        }
        Ok(APP_TITLE.to_string())
    }

    async fn click(&self, selector: &str, options: ClickOptions) -> E2eResult<()> {
        self.with_actionable("click", selector, |state, node| {
            // Only the first click of a double click reaches the handler
            // before the route changes; right clicks open no handler at all
            if let Some(action) = node.action.filter(|_| options.button != MouseButton::Right) {
                state.apply(action);
            }
            trace!("simulated click {} x{}", selector, options.click_count);
            Ok(())
        })
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.with_actionable("fill", selector, |state, node| match node.field {
            Some(field) => {
                state.form.insert(field, value.to_string());
                Ok(())
            }
            None => Err(E2eError::Engine(format!(
                "{}: Element is not an <input>, <textarea> or [contenteditable] element",
                selector
            ))),
        })
    }

    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<Vec<String>> {
        let timeout_ms = self.action_timeout_ms;
        self.with_actionable("selectOption", selector, |state, node| {
            if !node.select {
                return Err(E2eError::Engine(format!("{}: Element is not a <select> element", selector)));
            }
            match SortOption::from_value(value) {
                Some(option) => {
                    state.sort = option;
                    Ok(vec![value.to_string()])
                }
                None => Err(E2eError::timeout(
                    format!("selectOption {} (no option '{}')", selector, value),
                    timeout_ms,
                )),
            }
        })
    }

    async fn hover(&self, selector: &str) -> E2eResult<()> {
        self.with_actionable("hover", selector, |_, _| Ok(()))
    }

    async fn focus(&self, selector: &str) -> E2eResult<()> {
        self.with_element("focus", selector, |state, _| {
            state.focused = Some(selector.to_string());
            Ok(())
        })
    }

    async fn press(&self, selector: &str, key: &str) -> E2eResult<()> {
        self.with_actionable("press", selector, |state, node| {
            state.press(node.field, key);
            Ok(())
        })
    }

    async fn type_text(&self, selector: &str, text: &str, delay: Duration) -> E2eResult<()> {
        let keystrokes = text.chars().count() as u32;
        self.with_actionable("type", selector, |state, node| match node.field {
            Some(field) => {
                state.form.entry(field).or_default().push_str(text);
                Ok(())
            }
            None => Err(E2eError::Engine(format!("{}: Element is not an <input>", selector))),
        })?;
        if !delay.is_zero() {
            tokio::time::sleep(delay * keystrokes).await;
        }
        Ok(())
    }

    async fn inner_text(&self, selector: &str) -> E2eResult<String> {
        self.with_element("innerText", selector, |_, node| Ok(node.inner_text()))
    }

    async fn all_inner_texts(&self, selector: &str) -> E2eResult<Vec<String>> {
        let state = self.state.lock();
        state.ensure_open()?;
        let page = state.render();
        Ok(resolve(&page, selector)?
            .into_iter()
            .map(Node::inner_text)
            .collect())
    }

    async fn get_attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>> {
        self.with_element("getAttribute", selector, |_, node| Ok(node.attribute(name)))
    }

    async fn input_value(&self, selector: &str) -> E2eResult<String> {
        self.with_element("inputValue", selector, |state, node| {
            if let Some(field) = node.field {
                Ok(state.form.get(&field).cloned().unwrap_or_default())
            } else if node.select {
                Ok(node.attribute("value").unwrap_or_default())
            } else {
                Err(E2eError::Engine(format!("{}: Not an input element", selector)))
            }
        })
    }

    async fn count(&self, selector: &str) -> E2eResult<usize> {
        Ok(self.selector_state(selector)?.0)
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Duration,
    ) -> E2eResult<()> {
        let start = Instant::now();
        loop {
            let (count, first_visible) = self.selector_state(selector)?;
            let satisfied = match state {
                WaitState::Attached => count > 0,
                WaitState::Detached => count == 0,
                WaitState::Visible => first_visible,
                WaitState::Hidden => !first_visible,
            };
            if satisfied {
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(E2eError::timeout(
                    format!("{} to be {}", selector, state.as_str()),
                    timeout.as_millis() as u64,
                ));
            }
            tokio::time::sleep(POLL.min(timeout - elapsed)).await;
        }
    }

    async fn wait_for_load_state(&self, _state: LoadState) -> E2eResult<()> {
        self.state.lock().ensure_open()
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        let state = self.state.lock();
        state.ensure_open()?;
        let page = state.render();
        match resolve(&page, selector)?.as_slice() {
            [] => Ok(false),
            [node] => Ok(node.visible),
            many => Err(E2eError::Engine(format!(
                "strict mode violation: {} resolved to {} elements",
                selector,
                many.len()
            ))),
        }
    }

    async fn is_enabled(&self, selector: &str) -> E2eResult<bool> {
        self.with_element("isEnabled", selector, |_, node| Ok(node.enabled))
    }

    async fn is_checked(&self, selector: &str) -> E2eResult<bool> {
        self.with_element("isChecked", selector, |_, _| {
            Err(E2eError::Engine(format!("{}: Not a checkbox or radio button", selector)))
        })
    }

    async fn screenshot(&self, path: &Path, _full_page: bool) -> E2eResult<()> {
        self.state.lock().ensure_open()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, BLANK_PNG)?;
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &str) -> E2eResult<()> {
        self.with_actionable("scrollIntoViewIfNeeded", selector, |_, _| Ok(()))
    }

    async fn evaluate(&self, script: &str) -> E2eResult<Value> {
        let state = self.state.lock();
        state.ensure_open()?;
        match script.trim().trim_end_matches(';') {
            "document.title" => Ok(Value::String(APP_TITLE.to_string())),
            "window.location.href" | "location.href" => {
                Ok(Value::String(state.url(&self.base_url)))
            }
            "localStorage.getItem('cart-contents')" | "localStorage.getItem(\"cart-contents\")" => {
                if state.cart.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(Value::String(serde_json::to_string(&state.cart)?))
                }
            }
            other => Err(E2eError::Engine(format!(
                "script not supported by the simulated storefront: {}",
                other
            ))),
        }
    }

    async fn close(&self) -> E2eResult<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

impl std::fmt::Debug for SimulatedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.saucedemo.com";

    async fn logged_in() -> SimulatedStore {
        let store = SimulatedStore::new(BASE, 1000);
        store.goto(BASE, LoadState::DomContentLoaded).await.unwrap();
        store.fill("#user-name", "standard_user").await.unwrap();
        store.fill("#password", DEFAULT_PASSWORD).await.unwrap();
        store.click("#login-button", ClickOptions::default()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_login_reaches_inventory() {
        let store = logged_in().await;
        assert_eq!(store.current_url().await.unwrap(), format!("{}/inventory.html", BASE));
        assert_eq!(store.inner_text(".title").await.unwrap(), "Products");
        assert_eq!(store.count(".inventory_item").await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_chained_selector_targets_one_item() {
        let store = logged_in().await;
        store
            .click(".inventory_item >> nth=1 >> button[id^=\"add-to-cart\"]", ClickOptions::default())
            .await
            .unwrap();
        assert_eq!(store.inner_text(".shopping_cart_badge").await.unwrap(), "1");
        assert_eq!(
            store.inner_text(".inventory_item >> nth=1 >> button").await.unwrap(),
            "Remove"
        );
    }

    #[tokio::test]
    async fn test_back_after_logout_is_gated() {
        let store = logged_in().await;
        store.click("#react-burger-menu-btn", ClickOptions::default()).await.unwrap();
        store.click("#logout_sidebar_link", ClickOptions::default()).await.unwrap();

        store.go_back().await.unwrap();

        assert_eq!(store.current_url().await.unwrap(), format!("{}/", BASE));
        assert_eq!(
            store.inner_text("[data-test=\"error\"]").await.unwrap(),
            messages::logged_out_access(paths::INVENTORY)
        );
    }

    #[tokio::test]
    async fn test_back_while_signed_in_restores_screen() {
        let store = logged_in().await;
        store.click(".shopping_cart_link", ClickOptions::default()).await.unwrap();

        store.go_back().await.unwrap();

        assert_eq!(store.current_url().await.unwrap(), format!("{}/inventory.html", BASE));
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let store = logged_in().await;
        for _ in 0..(MAX_HISTORY * 2) {
            store.goto(&format!("{}/cart.html", BASE), LoadState::Load).await.unwrap();
        }
        assert_eq!(store.state.lock().history.len(), MAX_HISTORY);
    }

    #[tokio::test]
    async fn test_strict_mode_violation() {
        let store = logged_in().await;
        let err = store.inner_text(".inventory_item_name").await.unwrap_err();
        assert!(matches!(err, E2eError::Engine(msg) if msg.contains("strict mode")));
    }

    #[tokio::test]
    async fn test_missing_element_times_out_immediately() {
        let store = logged_in().await;
        let err = store.click("#finish", ClickOptions::default()).await.unwrap_err();
        assert!(matches!(err, E2eError::Timeout { timeout_ms: 1000, .. }));
    }

    #[tokio::test]
    async fn test_protected_page_requires_session() {
        let store = SimulatedStore::new(BASE, 1000);
        store
            .goto(&format!("{}/cart.html", BASE), LoadState::DomContentLoaded)
            .await
            .unwrap();
        assert_eq!(store.current_url().await.unwrap(), format!("{}/", BASE));
        assert_eq!(
            store.inner_text("[data-test=\"error\"]").await.unwrap(),
            "Epic sadface: You can only access '/cart.html' when you are logged in."
        );
    }

    #[tokio::test]
    async fn test_descendant_combinator() {
        let store = logged_in().await;
        store.click("#add-to-cart-sauce-labs-onesie", ClickOptions::default()).await.unwrap();
        store.click(".shopping_cart_link", ClickOptions::default()).await.unwrap();
        assert_eq!(
            store.all_inner_texts(".cart_item .inventory_item_name").await.unwrap(),
            vec!["Sauce Labs Onesie".to_string()]
        );
    }

    #[tokio::test]
    async fn test_hidden_menu_links_are_not_actionable() {
        let store = logged_in().await;
        assert!(!store.is_visible("#logout_sidebar_link").await.unwrap());
        assert!(store.click("#logout_sidebar_link", ClickOptions::default()).await.is_err());

        store.click("#react-burger-menu-btn", ClickOptions::default()).await.unwrap();
        store.click("#logout_sidebar_link", ClickOptions::default()).await.unwrap();
        assert_eq!(store.current_url().await.unwrap(), format!("{}/", BASE));
    }

    #[tokio::test]
    async fn test_wait_for_hidden_times_out() {
        let store = logged_in().await;
        let err = store
            .wait_for_selector(".title", WaitState::Hidden, Duration::from_millis(60))
            .await
            .unwrap_err();
        assert!(matches!(err, E2eError::Timeout { timeout_ms: 60, .. }));
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let store = logged_in().await;
        store.close().await.unwrap();
        assert!(store.current_url().await.is_err());
    }

    #[tokio::test]
    async fn test_cart_contents_in_local_storage() {
        let store = logged_in().await;
        store.click("#add-to-cart-sauce-labs-backpack", ClickOptions::default()).await.unwrap();
        let stored = store.evaluate("localStorage.getItem('cart-contents')").await.unwrap();
        assert_eq!(stored, Value::String("[4]".to_string()));
    }
}
