//! User identity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::password::PasswordHash;

/// Maximum allowed length for a username, in characters.
pub const USERNAME_MAX: usize = 32;

/// Validation errors returned by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    InvalidRole,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, '_', '-', or '.'",
            ),
            Self::InvalidRole => write!(f, "role must be either manager or employee"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Unique login name chosen at registration.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and non-empty afterwards.
/// - At most [`USERNAME_MAX`] characters.
/// - Restricted to letters, digits, `_`, `-`, and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if normalized.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
        if !normalized.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Username string suitable for lookups.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role assigned at registration. Immutable for the lifetime of the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Employee,
}

impl Role {
    /// Wire representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            _ => Err(UserValidationError::InvalidRole),
        }
    }
}

/// Registered portal user.
///
/// ## Invariants
/// - `username` is unique across the store (enforced by the repository).
/// - `role` never changes after creation.
/// - `team` is non-empty only for managers and lists employee ids in
///   declaration order.
/// - The password is only ever held as a salted hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: Username,
    password_hash: PasswordHash,
    role: Role,
    team: Vec<UserId>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build an employee. Employees never carry a team.
    pub fn new_employee(
        id: UserId,
        username: Username,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            role: Role::Employee,
            team: Vec::new(),
            created_at,
        }
    }

    /// Build a manager with their declared team, in declaration order.
    pub fn new_manager(
        id: UserId,
        username: Username,
        password_hash: PasswordHash,
        team: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            role: Role::Manager,
            team,
            created_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Salted credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Assigned role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Team member ids, in declaration order. Empty for employees.
    pub fn team(&self) -> &[UserId] {
        &self.team
    }

    /// Whether the given employee belongs to this manager's team.
    pub fn has_team_member(&self, employee_id: UserId) -> bool {
        self.team.contains(&employee_id)
    }

    /// Registration instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("has spaces", UserValidationError::UsernameInvalidCharacters)]
    #[case("tab\tchar", UserValidationError::UsernameInvalidCharacters)]
    fn invalid_usernames(#[case] input: &str, #[case] expected: UserValidationError) {
        let err = Username::new(input).expect_err("invalid input must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn overlong_username_is_rejected() {
        let input = "x".repeat(USERNAME_MAX + 1);
        let err = Username::new(input).expect_err("overlong input must fail");
        assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
    }

    #[rstest]
    #[case("  alice  ", "alice")]
    #[case("bob_the-1st.", "bob_the-1st.")]
    fn valid_usernames_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        let username = Username::new(input).expect("valid input should succeed");
        assert_eq!(username.as_str(), expected);
    }

    #[rstest]
    #[case("manager", Role::Manager)]
    #[case("employee", Role::Employee)]
    fn roles_parse_from_wire_strings(#[case] input: &str, #[case] expected: Role) {
        assert_eq!(input.parse::<Role>().expect("valid role"), expected);
        assert_eq!(expected.as_str(), input);
    }

    #[rstest]
    #[case("admin")]
    #[case("MANAGER")]
    #[case("")]
    fn unknown_roles_are_rejected(#[case] input: &str) {
        assert_eq!(
            input.parse::<Role>().expect_err("unknown role must fail"),
            UserValidationError::InvalidRole
        );
    }

    #[rstest]
    fn employees_never_carry_a_team() {
        let user = User::new_employee(
            UserId::random(),
            Username::new("eve").expect("valid username"),
            PasswordHash::derive("secret"),
            Utc::now(),
        );
        assert_eq!(user.role(), Role::Employee);
        assert!(user.team().is_empty());
    }

    #[rstest]
    fn managers_keep_team_declaration_order() {
        let first = UserId::random();
        let second = UserId::random();
        let user = User::new_manager(
            UserId::random(),
            Username::new("mia").expect("valid username"),
            PasswordHash::derive("secret"),
            vec![first, second],
            Utc::now(),
        );
        assert_eq!(user.team(), &[first, second]);
        assert!(user.has_team_member(first));
        assert!(!user.has_team_member(UserId::random()));
    }
}
