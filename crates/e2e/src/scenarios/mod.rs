//! Named, tagged storefront scenarios
//!
//! Each scenario drives one fresh [`Session`] through the screen objects and
//! fails with the first error or mismatch. The runner selects them by tag or
//! name; `tests/scenarios.rs` runs every one of them under libtest.

use futures::future::BoxFuture;
use std::fmt::Debug;

use crate::error::{E2eError, E2eResult};
use crate::session::Session;

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod inventory;

pub type ScenarioFn = fn(Session) -> BoxFuture<'static, E2eResult<()>>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub run: ScenarioFn,
}

impl Scenario {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }

    pub async fn execute(&self, session: Session) -> E2eResult<()> {
        (self.run)(session).await
    }
}

impl Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish()
    }
}

macro_rules! scenario {
    ($name:literal, [$($tag:literal),*], $run:path) => {
        Scenario {
            name: $name,
            tags: &[$($tag),*],
            run: |session| -> BoxFuture<'static, E2eResult<()>> { Box::pin($run(session)) },
        }
    };
}

/// Every scenario, in registration order
pub fn catalog() -> Vec<Scenario> {
    vec![
        scenario!("login_valid_users", ["auth", "smoke"], auth::login_valid_users),
        scenario!("login_rejects_invalid_credentials", ["auth"], auth::login_rejects_invalid_credentials),
        scenario!("login_error_can_be_dismissed", ["auth"], auth::login_error_can_be_dismissed),
        scenario!("logout_returns_to_login", ["auth", "menu"], auth::logout_returns_to_login),
        scenario!("protected_page_requires_login", ["auth"], auth::protected_page_requires_login),
        scenario!("sort_by_name", ["inventory", "sort"], inventory::sort_by_name),
        scenario!("sort_by_price", ["inventory", "sort"], inventory::sort_by_price),
        scenario!("inventory_lists_catalog", ["inventory", "smoke"], inventory::inventory_lists_catalog),
        scenario!("product_detail_add_remove", ["inventory", "cart"], inventory::product_detail_add_remove),
        scenario!("unknown_product_is_not_found", ["inventory"], inventory::unknown_product_is_not_found),
        scenario!("badge_tracks_cart", ["cart", "smoke"], cart::badge_tracks_cart),
        scenario!("remove_all_items", ["cart"], cart::remove_all_items),
        scenario!("reset_app_state_clears_cart", ["cart", "menu"], cart::reset_app_state_clears_cart),
        scenario!("continue_shopping_keeps_cart", ["cart"], cart::continue_shopping_keeps_cart),
        scenario!("total_matches_subtotal_plus_tax", ["checkout"], checkout::total_matches_subtotal_plus_tax),
        scenario!("missing_fields_block_checkout", ["checkout"], checkout::missing_fields_block_checkout),
        scenario!("cancel_transitions", ["checkout"], checkout::cancel_transitions),
        scenario!("end_to_end_purchase", ["checkout", "smoke", "e2e"], checkout::end_to_end_purchase),
    ]
}

pub fn find(name: &str) -> Option<Scenario> {
    catalog().into_iter().find(|s| s.name == name)
}

/// Fail with `expectation` unless `ok`
pub(crate) fn ensure(ok: bool, expectation: impl Into<String>, actual: impl Debug) -> E2eResult<()> {
    if ok {
        Ok(())
    } else {
        Err(E2eError::assertion(expectation, format!("{:?}", actual)))
    }
}

pub(crate) fn ensure_eq<T: PartialEq + Debug>(what: &str, expected: T, actual: T) -> E2eResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::assertion(
            format!("{} = {:?}", what, expected),
            format!("{:?}", actual),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let scenarios = catalog();
        let names: HashSet<_> = scenarios.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_every_scenario_is_tagged() {
        assert!(catalog().iter().all(|s| !s.tags.is_empty()));
        assert!(find("end_to_end_purchase").unwrap().has_tag("smoke"));
        assert!(find("no_such_scenario").is_none());
    }

    #[test]
    fn test_ensure_eq_reports_both_sides() {
        let err = ensure_eq("badge", 2u32, 1u32).unwrap_err();
        assert_eq!(err.to_string(), "Assertion failed: expected badge = 2, actual: 1");
    }
}
