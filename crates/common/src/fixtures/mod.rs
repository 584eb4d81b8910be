//! Static fixture tables and the literal UI contract of the storefront.
//!
//! Everything here is plain data. Records are built fresh on each call so
//! callers can never mutate a shared table.

pub mod checkout;
pub mod constants;
pub mod products;
pub mod users;

pub use checkout::CheckoutFixtures;
pub use products::ProductCatalog;
pub use users::UserDirectory;
