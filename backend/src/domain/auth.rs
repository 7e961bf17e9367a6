//! Authentication primitives: credentials, bearer tokens, caller context.
//!
//! Inbound payload parsing stays outside the domain; constructors here
//! validate string inputs before a handler talks to a port or service.
//! Authorisation context is always passed explicitly into service calls —
//! there is no ambient session state anywhere in the crate.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::error::Error;
use crate::domain::user::{Role, User, UserId, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the identity service.
///
/// ## Invariants
/// - `username` is trimmed and non-empty after trimming.
/// - `password` is non-empty but retains caller-provided whitespace so
///   credential comparison never surprises the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn new(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation error for bearer token material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// The token string was empty.
    EmptyToken,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "bearer token must not be empty"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Opaque bearer credential proving a prior successful login.
///
/// The token value is random material; `Debug` never reveals it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validate and wrap raw token material.
    pub fn new(token: impl Into<String>) -> Result<Self, AuthValidationError> {
        let token = token.into();
        if token.is_empty() {
            return Err(AuthValidationError::EmptyToken);
        }
        Ok(Self(token))
    }

    /// The raw token string, for storage lookups and the login response.
    pub fn reveal(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

impl From<AccessToken> for String {
    fn from(value: AccessToken) -> Self {
        value.0
    }
}

/// Authenticated caller identity shared by both context variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: Username,
}

/// Tagged authorisation context resolved from a bearer token.
///
/// Services branch on the variant rather than re-checking role strings; the
/// service layer, not the HTTP adapter, is the authority on permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    Manager(Identity),
    Employee(Identity),
}

impl AuthContext {
    /// Derive the context for a stored user.
    pub fn for_user(user: &User) -> Self {
        let identity = Identity {
            id: user.id(),
            username: user.username().clone(),
        };
        match user.role() {
            Role::Manager => Self::Manager(identity),
            Role::Employee => Self::Employee(identity),
        }
    }

    /// The caller's identity, regardless of role.
    pub fn identity(&self) -> &Identity {
        match self {
            Self::Manager(identity) | Self::Employee(identity) => identity,
        }
    }

    /// The caller's user id.
    pub fn user_id(&self) -> UserId {
        self.identity().id
    }

    /// The caller's role as an enum value.
    pub fn role(&self) -> Role {
        match self {
            Self::Manager(_) => Role::Manager,
            Self::Employee(_) => Role::Employee,
        }
    }

    /// Require a manager caller or fail `Forbidden`.
    pub fn require_manager(&self) -> Result<&Identity, Error> {
        match self {
            Self::Manager(identity) => Ok(identity),
            Self::Employee(_) => Err(Error::forbidden("only managers may perform this action")),
        }
    }

    /// Require an employee caller or fail `Forbidden`.
    pub fn require_employee(&self) -> Result<&Identity, Error> {
        match self {
            Self::Employee(identity) => Ok(identity),
            Self::Manager(_) => Err(Error::forbidden("only employees may perform this action")),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::password::PasswordHash;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::new(username, password).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_trim_username_but_not_password() {
        let creds = LoginCredentials::new("  alice  ", " pw ").expect("valid inputs");
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn empty_tokens_are_rejected() {
        assert_eq!(
            AccessToken::new("").expect_err("empty token must fail"),
            AuthValidationError::EmptyToken
        );
    }

    #[rstest]
    fn token_debug_never_reveals_material() {
        let token = AccessToken::new("super-secret").expect("valid token");
        assert_eq!(format!("{token:?}"), "AccessToken(..)");
    }

    fn manager_context() -> AuthContext {
        let user = User::new_manager(
            UserId::random(),
            Username::new("mia").expect("valid username"),
            PasswordHash::derive("pw"),
            vec![UserId::random()],
            Utc::now(),
        );
        AuthContext::for_user(&user)
    }

    fn employee_context() -> AuthContext {
        let user = User::new_employee(
            UserId::random(),
            Username::new("eve").expect("valid username"),
            PasswordHash::derive("pw"),
            Utc::now(),
        );
        AuthContext::for_user(&user)
    }

    #[rstest]
    fn context_tags_follow_the_user_role() {
        assert_eq!(manager_context().role(), Role::Manager);
        assert_eq!(employee_context().role(), Role::Employee);
    }

    #[rstest]
    fn require_manager_rejects_employees() {
        let ctx = employee_context();
        assert!(manager_context().require_manager().is_ok());
        let err = ctx.require_manager().expect_err("employee must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn require_employee_rejects_managers() {
        let ctx = manager_context();
        assert!(employee_context().require_employee().is_ok());
        let err = ctx.require_employee().expect_err("manager must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
