//! Sign-in, sign-out and access control

use swaglabs_common::fixtures::constants::{messages, paths, titles};
use swaglabs_common::fixtures::users::invalid_credentials;
use swaglabs_common::fixtures::UserDirectory;

use super::{ensure, ensure_eq};
use crate::error::E2eResult;
use crate::session::Session;

/// Every account expected to get in lands on "Products"
pub async fn login_valid_users(session: Session) -> E2eResult<()> {
    for user in UserDirectory::valid_logins() {
        let inventory = session.sign_in(&user).await?;
        ensure_eq(
            &format!("title after login as {}", user.username),
            titles::INVENTORY.to_string(),
            inventory.page_title().await?,
        )?;
        inventory.header().logout().await?.verify_on_login_page().await?;
    }
    Ok(())
}

/// Each rejected credential pair keeps the login screen with its exact banner
pub async fn login_rejects_invalid_credentials(session: Session) -> E2eResult<()> {
    let login = session.login_page();

    for case in invalid_credentials() {
        login.open().await?;
        login.login(case.username, case.password).await?;
        login.verify_on_login_page().await?;
        ensure_eq(
            &format!("error banner for {}", case.case),
            case.message.to_string(),
            login.error_message().await,
        )?;
    }
    Ok(())
}

pub async fn login_error_can_be_dismissed(session: Session) -> E2eResult<()> {
    let login = session.login_page();
    login.open().await?;
    ensure_eq("banner before submit", String::new(), login.error_message().await)?;

    login.login("", "").await?;
    ensure(login.is_error_displayed().await, "error banner shown", "hidden")?;

    login.close_error().await?;
    ensure(!login.is_error_displayed().await, "error banner dismissed", "shown")?;
    ensure_eq("banner after dismiss", String::new(), login.error_message().await)
}

pub async fn logout_returns_to_login(session: Session) -> E2eResult<()> {
    let inventory = session.sign_in_standard().await?;
    let login = inventory.header().logout().await?;
    login.verify_on_login_page().await?;

    // The session is gone, so the inventory is out of reach again
    session.inventory_page().open().await?;
    login.verify_on_login_page().await?;
    ensure_eq(
        "banner after logged-out access",
        messages::logged_out_access(paths::INVENTORY),
        login.error_message().await,
    )
}

pub async fn protected_page_requires_login(session: Session) -> E2eResult<()> {
    let login = session.login_page();

    for path in [paths::INVENTORY, paths::CART, paths::CHECKOUT_STEP_ONE] {
        session.base().goto(path).await?;
        login.verify_on_login_page().await?;
        ensure_eq(
            &format!("banner after opening {}", path),
            messages::logged_out_access(path),
            login.error_message().await,
        )?;
    }
    Ok(())
}
