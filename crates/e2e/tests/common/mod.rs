//! Shared setup for the integration tests
//!
//! Sessions follow the environment: the simulated storefront by default,
//! a real browser with `SAUCE_ENGINE=playwright`.

#![allow(dead_code)]

use swaglabs_common::SuiteConfig;
use swaglabs_e2e::{InventoryPage, Session};

pub async fn session() -> Session {
    let config = SuiteConfig::from_env().expect("invalid test environment");
    Session::launch(&config).await.expect("failed to start session")
}

/// Fresh session already signed in as the standard user
pub async fn signed_in() -> (Session, InventoryPage) {
    let session = session().await;
    let inventory = session
        .sign_in_standard()
        .await
        .expect("standard user sign-in failed");
    (session, inventory)
}
