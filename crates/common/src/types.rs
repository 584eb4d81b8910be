//! Core types for the Swag Labs suite

use serde::{Deserialize, Serialize};

/// Account category; each known account exercises one behaviour of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserCategory {
    Standard,
    LockedOut,
    Problem,
    PerformanceGlitch,
    Error,
    Visual,
}

impl UserCategory {
    pub const ALL: [UserCategory; 6] = [
        UserCategory::Standard,
        UserCategory::LockedOut,
        UserCategory::Problem,
        UserCategory::PerformanceGlitch,
        UserCategory::Error,
        UserCategory::Visual,
    ];

    /// Whether this account is expected to reach the inventory after login
    pub fn can_log_in(&self) -> bool {
        !matches!(self, UserCategory::LockedOut)
    }
}

impl std::fmt::Display for UserCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserCategory::Standard => write!(f, "standard"),
            UserCategory::LockedOut => write!(f, "locked"),
            UserCategory::Problem => write!(f, "problem"),
            UserCategory::PerformanceGlitch => write!(f, "performance"),
            UserCategory::Error => write!(f, "error"),
            UserCategory::Visual => write!(f, "visual"),
        }
    }
}

/// Login credentials plus a note on what the account is for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub category: UserCategory,
    #[serde(default)]
    pub description: String,
}

impl User {
    pub fn new(username: &str, password: &str, category: UserCategory, description: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            category,
            description: description.to_string(),
        }
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Id used by the product detail route (`inventory-item.html?id=N`)
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Price as the storefront renders it, e.g. `$29.99`
    pub fn display_price(&self) -> String {
        format_price(self.price)
    }

    /// Slug used in the app's button ids, e.g. `sauce-labs-backpack`
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Checkout form input; any field may be empty on purpose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInfo {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

impl CheckoutInfo {
    pub fn new(first_name: &str, last_name: &str, postal_code: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            postal_code: postal_code.to_string(),
        }
    }

    /// First field the form validates as missing, if any
    pub fn first_missing_field(&self) -> Option<CheckoutField> {
        if self.first_name.is_empty() {
            Some(CheckoutField::FirstName)
        } else if self.last_name.is_empty() {
            Some(CheckoutField::LastName)
        } else if self.postal_code.is_empty() {
            Some(CheckoutField::PostalCode)
        } else {
            None
        }
    }
}

/// Fields of the checkout information form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    FirstName,
    LastName,
    PostalCode,
}

/// One cart line as read back from the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Checkout overview totals as read back from the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl OrderSummary {
    /// `subtotal + tax` as the page should have computed it
    pub fn expected_total(&self) -> f64 {
        self.subtotal + self.tax
    }

    /// Whether the displayed total agrees with subtotal + tax within `tolerance`
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        (self.expected_total() - self.total).abs() <= tolerance
    }
}

/// Inventory sort dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
    ];

    /// `value` attribute of the dropdown option
    pub fn value(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "az",
            SortOption::NameDesc => "za",
            SortOption::PriceAsc => "lohi",
            SortOption::PriceDesc => "hilo",
        }
    }

    /// Visible label of the dropdown option
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A to Z)",
            SortOption::NameDesc => "Name (Z to A)",
            SortOption::PriceAsc => "Price (low to high)",
            SortOption::PriceDesc => "Price (high to low)",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.value() == value)
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a rendered currency amount such as `$29.99` or `29.99`
pub fn parse_price(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    digits.parse::<f64>().ok()
}

/// Render an amount the way the storefront does
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}
