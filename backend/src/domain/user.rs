//! User accounts and their validated fields.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::password::PasswordHash;
use super::role::RoleId;
use super::text::{has_word, is_email_shaped};

/// Maximum length of usernames and personal names.
pub const NAME_MAX: usize = 64;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifiers are positive integers.
    #[error("user id must be a positive integer")]
    InvalidId,
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Offending field.
        field: &'static str,
    },
    /// A text field had no word characters.
    #[error("{field} must contain letters or digits")]
    NoWordCharacters {
        /// Offending field.
        field: &'static str,
    },
    /// A text field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
    },
    /// Email did not look like `local@domain.tld`.
    #[error("email must be a valid email address")]
    InvalidEmail,
}

impl UserValidationError {
    /// Name of the offending field, as exposed by the HTTP API.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::Empty { field } | Self::NoWordCharacters { field } | Self::TooLong { field, .. } => {
                field
            }
            Self::InvalidEmail => "email",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::Empty { .. } => "empty",
            Self::NoWordCharacters { .. } => "invalid_characters",
            Self::TooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

/// User identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i32) -> Result<Self, UserValidationError> {
        if raw < 1 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_name(raw: &str, field: &'static str) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::Empty { field });
    }
    if !has_word(trimmed) {
        return Err(UserValidationError::NoWordCharacters { field });
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(UserValidationError::TooLong {
            field,
            max: NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

string_newtype!(
    /// Unique handle chosen by the user.
    Username
);

impl Username {
    /// Validate and construct a username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        validate_name(raw.as_ref(), "username").map(Self)
    }
}

string_newtype!(
    /// First or last name.
    PersonName
);

impl PersonName {
    /// Validate a first name.
    pub fn first(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        validate_name(raw.as_ref(), "firstname").map(Self)
    }

    /// Validate a last name.
    pub fn last(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        validate_name(raw.as_ref(), "lastname").map(Self)
    }

    fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        validate_name(raw.as_ref(), "name").map(Self)
    }
}

string_newtype!(
    /// Unique, email-shaped address used to log in.
    EmailAddress
);

impl EmailAddress {
    /// Validate and construct an email address.
    ///
    /// # Examples
    /// ```
    /// use docvault::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::new("ada@example.com").is_ok());
    /// assert!(EmailAddress::new("ada@example").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::Empty { field: "email" });
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::TooLong {
                field: "email",
                max: EMAIL_MAX,
            });
        }
        if !is_email_shaped(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Public profile of a registered user.
///
/// The password hash is deliberately absent; credentials travel separately
/// as [`StoredCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i32, example = 7)]
    id: UserId,
    #[schema(value_type = String, example = "ada")]
    username: Username,
    #[schema(value_type = String, example = "Ada")]
    firstname: PersonName,
    #[schema(value_type = String, example = "Lovelace")]
    lastname: PersonName,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    #[schema(value_type = i32, example = 2)]
    role_id: RoleId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field values used to assemble a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Identifier.
    pub id: UserId,
    /// Username.
    pub username: Username,
    /// First name.
    pub firstname: PersonName,
    /// Last name.
    pub lastname: PersonName,
    /// Email address.
    pub email: EmailAddress,
    /// Assigned role.
    pub role_id: RoleId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<UserDraft> for User {
    fn from(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            username,
            firstname,
            lastname,
            email,
            role_id,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            username,
            firstname,
            lastname,
            email,
            role_id,
            created_at,
            updated_at,
        }
    }
}

impl User {
    /// Identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// First name.
    pub fn firstname(&self) -> &PersonName {
        &self.firstname
    }

    /// Last name.
    pub fn lastname(&self) -> &PersonName {
        &self.lastname
    }

    /// Email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Assigned role.
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A user together with the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    /// The account.
    pub user: User,
    /// PHC-formatted password hash.
    pub password_hash: PasswordHash,
}

/// Values for inserting a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Username.
    pub username: Username,
    /// First name.
    pub firstname: PersonName,
    /// Last name.
    pub lastname: PersonName,
    /// Email address.
    pub email: EmailAddress,
    /// Assigned role.
    pub role_id: RoleId,
    /// Hashed password.
    pub password_hash: PasswordHash,
}

/// Partial update applied to an existing user; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// New username.
    pub username: Option<Username>,
    /// New first name.
    pub firstname: Option<PersonName>,
    /// New last name.
    pub lastname: Option<PersonName>,
    /// New email address.
    pub email: Option<EmailAddress>,
    /// New role.
    pub role_id: Option<RoleId>,
    /// New password hash.
    pub password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// True when the update would not touch any column.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A seeded account inserted under a fixed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAccount {
    /// Reserved identifier.
    pub id: UserId,
    /// Account values.
    pub user: NewUser,
}

/// Identifiers of the two seeded accounts that can never be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultAccounts {
    admin: UserId,
    regular: UserId,
}

impl DefaultAccounts {
    /// Build from explicit identifiers.
    #[must_use]
    pub const fn new(admin: UserId, regular: UserId) -> Self {
        Self { admin, regular }
    }

    /// The seeded administrator.
    #[must_use]
    pub const fn admin(&self) -> UserId {
        self.admin
    }

    /// The seeded regular user.
    #[must_use]
    pub const fn regular(&self) -> UserId {
        self.regular
    }

    /// True for either seeded account.
    #[must_use]
    pub fn is_protected(&self, id: UserId) -> bool {
        id == self.admin || id == self.regular
    }
}

impl Default for DefaultAccounts {
    fn default() -> Self {
        Self::new(UserId(1), UserId(2))
    }
}
