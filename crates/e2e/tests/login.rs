//! Login screen behaviour

mod common;

use swaglabs_common::fixtures::constants::{messages, paths, titles};
use swaglabs_common::fixtures::users::DEFAULT_PASSWORD;
use swaglabs_common::fixtures::UserDirectory;
use swaglabs_common::UserCategory;
use test_case::test_case;

#[test_case(UserCategory::Standard ; "standard user")]
#[test_case(UserCategory::PerformanceGlitch ; "performance glitch user")]
#[test_case(UserCategory::Problem ; "problem user")]
#[test_case(UserCategory::Visual ; "visual user")]
#[tokio::test]
async fn valid_user_reaches_inventory(category: UserCategory) {
    let session = common::session().await;
    let user = UserDirectory::by_category(category);

    let inventory = session.sign_in(&user).await.unwrap();

    assert_eq!(inventory.page_title().await.unwrap(), titles::INVENTORY);
    assert_eq!(
        session.base().current_url().await.unwrap(),
        session.config().url_for(paths::INVENTORY)
    );
    session.close().await.unwrap();
}

#[test_case("standard_user", "wrong_password", messages::LOGIN_MISMATCH ; "wrong password")]
#[test_case("locked_out_user", DEFAULT_PASSWORD, messages::LOCKED_OUT ; "locked user")]
#[test_case("", DEFAULT_PASSWORD, messages::USERNAME_REQUIRED ; "empty username")]
#[test_case("standard_user", "", messages::PASSWORD_REQUIRED ; "empty password")]
#[test_case("", "", messages::USERNAME_REQUIRED ; "both empty")]
#[tokio::test]
async fn invalid_credentials_stay_on_login(username: &str, password: &str, message: &str) {
    let session = common::session().await;
    let login = session.login_page();
    login.open().await.unwrap();

    login.login(username, password).await.unwrap();

    login.verify_on_login_page().await.unwrap();
    assert!(login.is_error_displayed().await);
    assert_eq!(login.error_message().await, message);
    session.close().await.unwrap();
}

#[tokio::test]
async fn error_message_is_empty_without_banner() {
    let session = common::session().await;
    let login = session.login_page();
    login.open().await.unwrap();

    assert_eq!(login.error_message().await, "");
    assert!(!login.is_error_displayed().await);
}

#[tokio::test]
async fn error_banner_can_be_closed() {
    let session = common::session().await;
    let login = session.login_page();
    login.open().await.unwrap();
    login.login("", "").await.unwrap();

    login.close_error().await.unwrap();

    assert!(!login.is_error_displayed().await);
    assert_eq!(login.error_message().await, "");
}

#[tokio::test]
async fn enter_in_password_field_submits() {
    let session = common::session().await;
    let login = session.login_page();
    login.open().await.unwrap();

    session.base().fill("#user-name", "standard_user").await.unwrap();
    session.base().fill("#password", DEFAULT_PASSWORD).await.unwrap();
    session.base().press_key("#password", "Enter").await.unwrap();

    session.inventory_page().verify_on_inventory_page().await.unwrap();
}

#[tokio::test]
async fn logout_then_protected_page_shows_access_error() {
    let (session, inventory) = common::signed_in().await;

    let login = inventory.header().logout().await.unwrap();
    login.verify_on_login_page().await.unwrap();

    session.cart_page().open().await.unwrap();
    login.verify_on_login_page().await.unwrap();
    assert_eq!(login.error_message().await, messages::logged_out_access(paths::CART));
}

#[tokio::test]
async fn about_link_points_to_vendor_site() {
    let (_session, inventory) = common::signed_in().await;

    let href = inventory.header().about_link().await.unwrap();

    assert_eq!(href.as_deref(), Some("https://saucelabs.com/"));
}
