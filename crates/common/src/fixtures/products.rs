//! The six-item catalog

use crate::error::{Error, Result};
use crate::types::Product;

pub const BACKPACK: &str = "Sauce Labs Backpack";
pub const BIKE_LIGHT: &str = "Sauce Labs Bike Light";
pub const BOLT_T_SHIRT: &str = "Sauce Labs Bolt T-Shirt";
pub const FLEECE_JACKET: &str = "Sauce Labs Fleece Jacket";
pub const ONESIE: &str = "Sauce Labs Onesie";
pub const RED_T_SHIRT: &str = "Test.allTheThings() T-Shirt (Red)";

const CATALOG: [(u32, &str, f64, &str, &str); 6] = [
    (
        4,
        BACKPACK,
        29.99,
        "carry.allTheThings() with the sleek, streamlined Sly Pack that melds uncompromising style with unequaled laptop and tablet protection.",
        "sauce-backpack-1200x1500.jpg",
    ),
    (
        0,
        BIKE_LIGHT,
        9.99,
        "A red light isn't the desired state in testing but it sure helps when riding your bike at night. Water-resistant with 3 lighting modes, 1 AAA battery included.",
        "bike-light-1200x1500.jpg",
    ),
    (
        1,
        BOLT_T_SHIRT,
        15.99,
        "Get your testing superhero on with the Sauce Labs bolt T-shirt. From American Apparel, 100% ringspun combed cotton, heather gray with red bolt.",
        "bolt-shirt-1200x1500.jpg",
    ),
    (
        5,
        FLEECE_JACKET,
        49.99,
        "It's not every day that you come across a midweight quarter-zip fleece jacket capable of handling everything from a relaxing day outdoors to a busy day at the office.",
        "sauce-pullover-1200x1500.jpg",
    ),
    (
        2,
        ONESIE,
        7.99,
        "Rib snap infant onesie for the junior automation engineer in your life. Reinforced 3-snap bottom closure, two-needle hemmed sleeved and bottom won't unravel.",
        "red-onesie-1200x1500.jpg",
    ),
    (
        3,
        RED_T_SHIRT,
        15.99,
        "This classic Sauce Labs t-shirt is perfect to wear when cozying up to your keyboard to automate a few tests. Super-soft and comfy ringspun combed cotton.",
        "red-tatt-1200x1500.jpg",
    ),
];

/// Lookup over the catalog
pub struct ProductCatalog;

impl ProductCatalog {
    /// All products in the storefront's default (name ascending) order
    pub fn all() -> Vec<Product> {
        CATALOG
            .iter()
            .map(|(id, name, price, description, image)| Product {
                id: *id,
                name: name.to_string(),
                price: *price,
                description: description.to_string(),
                image: Some(format!("/static/media/{}", image)),
            })
            .collect()
    }

    pub fn by_name(name: &str) -> Result<Product> {
        Self::all()
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::unknown("product", name))
    }

    pub fn by_id(id: u32) -> Result<Product> {
        Self::all()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::unknown("product", &id.to_string()))
    }

    pub fn names() -> Vec<String> {
        CATALOG.iter().map(|(_, name, ..)| name.to_string()).collect()
    }

    /// Sum of the listed prices, for cross-checking the checkout subtotal
    pub fn subtotal_of(names: &[&str]) -> Result<f64> {
        names
            .iter()
            .map(|name| Self::by_name(name).map(|p| p.price))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_products() {
        let all = ProductCatalog::all();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|p| p.price > 0.0));
    }

    #[test]
    fn test_subtotal_of_known_products() {
        let subtotal = ProductCatalog::subtotal_of(&[BACKPACK, BIKE_LIGHT]).unwrap();
        assert!((subtotal - 39.98).abs() < 1e-9);
        assert!(ProductCatalog::subtotal_of(&["Mystery Box"]).is_err());
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(ProductCatalog::by_id(4).unwrap().name, BACKPACK);
        assert!(ProductCatalog::by_id(42).is_err());
    }
}
