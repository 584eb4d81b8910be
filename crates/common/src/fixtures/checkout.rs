//! Checkout form inputs

use crate::types::{CheckoutField, CheckoutInfo};

use super::constants::messages;

/// Named checkout form records
pub struct CheckoutFixtures;

impl CheckoutFixtures {
    pub fn valid() -> CheckoutInfo {
        CheckoutInfo::new("John", "Doe", "12345")
    }

    pub fn missing_first_name() -> CheckoutInfo {
        CheckoutInfo::new("", "Doe", "12345")
    }

    pub fn missing_last_name() -> CheckoutInfo {
        CheckoutInfo::new("John", "", "12345")
    }

    pub fn missing_postal_code() -> CheckoutInfo {
        CheckoutInfo::new("John", "Doe", "")
    }

    pub fn empty() -> CheckoutInfo {
        CheckoutInfo::default()
    }

    /// Banner text shown when `field` is the first missing one
    pub fn required_message(field: CheckoutField) -> &'static str {
        match field {
            CheckoutField::FirstName => messages::FIRST_NAME_REQUIRED,
            CheckoutField::LastName => messages::LAST_NAME_REQUIRED,
            CheckoutField::PostalCode => messages::POSTAL_CODE_REQUIRED,
        }
    }
}
