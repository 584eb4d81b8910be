//! Known accounts and invalid-credential records

use crate::error::{Error, Result};
use crate::types::{User, UserCategory};

/// Password shared by every known account
pub const DEFAULT_PASSWORD: &str = "secret_sauce";

const KNOWN: [(&str, UserCategory, &str); 6] = [
    ("standard_user", UserCategory::Standard, "Regular account with full access"),
    ("locked_out_user", UserCategory::LockedOut, "Account rejected at login"),
    ("problem_user", UserCategory::Problem, "Account with broken images and form quirks"),
    ("performance_glitch_user", UserCategory::PerformanceGlitch, "Account with slow page loads"),
    ("error_user", UserCategory::Error, "Account that triggers errors on some actions"),
    ("visual_user", UserCategory::Visual, "Account with visual layout differences"),
];

/// Lookup over the known accounts
pub struct UserDirectory;

impl UserDirectory {
    /// All known accounts in table order
    pub fn all() -> Vec<User> {
        KNOWN
            .iter()
            .map(|(name, category, description)| User::new(name, DEFAULT_PASSWORD, *category, description))
            .collect()
    }

    pub fn by_category(category: UserCategory) -> User {
        let (name, _, description) = KNOWN
            .iter()
            .find(|(_, c, _)| *c == category)
            .copied()
            .unwrap_or(KNOWN[0]);
        User::new(name, DEFAULT_PASSWORD, category, description)
    }

    pub fn by_username(username: &str) -> Result<User> {
        KNOWN
            .iter()
            .find(|(name, _, _)| *name == username)
            .map(|(name, category, description)| User::new(name, DEFAULT_PASSWORD, *category, description))
            .ok_or_else(|| Error::unknown("user", username))
    }

    pub fn standard() -> User {
        Self::by_category(UserCategory::Standard)
    }

    pub fn locked_out() -> User {
        Self::by_category(UserCategory::LockedOut)
    }

    pub fn problem() -> User {
        Self::by_category(UserCategory::Problem)
    }

    pub fn performance_glitch() -> User {
        Self::by_category(UserCategory::PerformanceGlitch)
    }

    pub fn error() -> User {
        Self::by_category(UserCategory::Error)
    }

    pub fn visual() -> User {
        Self::by_category(UserCategory::Visual)
    }

    /// Accounts expected to reach the inventory with the default password
    pub fn valid_logins() -> Vec<User> {
        [
            UserCategory::Standard,
            UserCategory::PerformanceGlitch,
            UserCategory::Problem,
            UserCategory::Visual,
        ]
        .into_iter()
        .map(Self::by_category)
        .collect()
    }
}

/// Credential pairs the login form must reject, with the banner text it shows
pub struct InvalidCredentials {
    pub case: &'static str,
    pub username: &'static str,
    pub password: &'static str,
    pub message: &'static str,
}

pub fn invalid_credentials() -> Vec<InvalidCredentials> {
    use super::constants::messages;

    vec![
        InvalidCredentials {
            case: "wrong password",
            username: "standard_user",
            password: "wrong_password",
            message: messages::LOGIN_MISMATCH,
        },
        InvalidCredentials {
            case: "unknown user",
            username: "nobody_user",
            password: DEFAULT_PASSWORD,
            message: messages::LOGIN_MISMATCH,
        },
        InvalidCredentials {
            case: "locked user",
            username: "locked_out_user",
            password: DEFAULT_PASSWORD,
            message: messages::LOCKED_OUT,
        },
        InvalidCredentials {
            case: "empty username",
            username: "",
            password: DEFAULT_PASSWORD,
            message: messages::USERNAME_REQUIRED,
        },
        InvalidCredentials {
            case: "empty password",
            username: "standard_user",
            password: "",
            message: messages::PASSWORD_REQUIRED,
        },
        InvalidCredentials {
            case: "both empty",
            username: "",
            password: "",
            message: messages::USERNAME_REQUIRED,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_username() {
        let user = UserDirectory::by_username("visual_user").unwrap();
        assert_eq!(user.category, UserCategory::Visual);
        assert_eq!(user.password, DEFAULT_PASSWORD);

        assert!(matches!(
            UserDirectory::by_username("ghost"),
            Err(Error::UnknownFixture { .. })
        ));
    }

    #[test]
    fn test_every_category_has_an_account() {
        for category in UserCategory::ALL {
            assert_eq!(UserDirectory::by_category(category).category, category);
        }
        assert_eq!(UserDirectory::all().len(), 6);
    }

    #[test]
    fn test_valid_logins_exclude_locked_account() {
        assert!(UserDirectory::valid_logins().iter().all(|u| u.category.can_log_in()));
    }
}
