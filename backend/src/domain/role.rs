//! Roles and the registry of reserved role identifiers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::text::has_word;

/// Maximum length of a role title.
pub const ROLE_TITLE_MAX: usize = 64;

/// Validation errors for role fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleValidationError {
    /// Identifiers are positive integers.
    #[error("role id must be a positive integer")]
    InvalidId,
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title had no word characters.
    #[error("title must contain letters or digits")]
    InvalidTitle,
    /// Title exceeded [`ROLE_TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct RoleId(i32);

impl RoleId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i32) -> Result<Self, RoleValidationError> {
        if raw < 1 {
            return Err(RoleValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for RoleId {
    type Error = RoleValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleId> for i32 {
    fn from(value: RoleId) -> Self {
        value.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, human readable role name such as `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleTitle(String);

impl RoleTitle {
    /// Validate and construct a title. Surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, RoleValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RoleValidationError::EmptyTitle);
        }
        if !has_word(trimmed) {
            return Err(RoleValidationError::InvalidTitle);
        }
        if trimmed.chars().count() > ROLE_TITLE_MAX {
            return Err(RoleValidationError::TitleTooLong {
                max: ROLE_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RoleTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleTitle {
    type Error = RoleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleTitle> for String {
    fn from(value: RoleTitle) -> Self {
        value.0
    }
}

/// A role users can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(value_type = i32, example = 2)]
    id: RoleId,
    #[schema(value_type = String, example = "regular")]
    title: RoleTitle,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Role {
    /// Assemble a role from validated parts.
    pub fn new(
        id: RoleId,
        title: RoleTitle,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            updated_at,
        }
    }

    /// Role identifier.
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Role title.
    pub fn title(&self) -> &RoleTitle {
        &self.title
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

/// Identifiers of the two reserved roles.
///
/// Both roles are seeded by migrations and can never be renamed or deleted.
///
/// # Examples
/// ```
/// use docvault::domain::{RoleId, RoleRegistry};
///
/// let roles = RoleRegistry::default();
/// assert!(roles.is_admin(roles.admin()));
/// assert!(roles.is_protected(roles.regular()));
/// assert!(!roles.is_protected(RoleId::new(3).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRegistry {
    admin: RoleId,
    regular: RoleId,
}

/// Title of the seeded administrator role.
pub const ADMIN_ROLE_TITLE: &str = "admin";
/// Title of the seeded default role.
pub const REGULAR_ROLE_TITLE: &str = "regular";

impl RoleRegistry {
    /// Build a registry from explicit identifiers.
    #[must_use]
    pub const fn new(admin: RoleId, regular: RoleId) -> Self {
        Self { admin, regular }
    }

    /// The administrator role.
    #[must_use]
    pub const fn admin(&self) -> RoleId {
        self.admin
    }

    /// The role assigned to new users by default.
    #[must_use]
    pub const fn regular(&self) -> RoleId {
        self.regular
    }

    /// True when `role` is the administrator role.
    #[must_use]
    pub fn is_admin(&self, role: RoleId) -> bool {
        role == self.admin
    }

    /// True for either reserved role.
    #[must_use]
    pub fn is_protected(&self, role: RoleId) -> bool {
        role == self.admin || role == self.regular
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new(RoleId(1), RoleId(2))
    }
}
