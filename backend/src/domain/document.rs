//! Documents and their access levels.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::RoleId;
use super::text::has_word;
use super::user::UserId;

/// Maximum length of a document title.
pub const TITLE_MAX: usize = 255;

/// Validation errors for document fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentValidationError {
    /// Identifiers are positive integers.
    #[error("document id must be a positive integer")]
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
    /// Title exceeded [`TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Access was not one of `public`, `private`, or `role`.
    #[error("access must be one of public, private, role")]
    InvalidAccess {
        /// Value supplied by the caller.
        value: String,
    },
}

impl DocumentValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::Empty { field } | Self::NoWordCharacters { field } => field,
            Self::TitleTooLong { .. } => "title",
            Self::InvalidAccess { .. } => "access",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::Empty { .. } => "empty",
            Self::NoWordCharacters { .. } => "invalid_characters",
            Self::TitleTooLong { .. } => "too_long",
            Self::InvalidAccess { .. } => "invalid_access",
        }
    }
}

/// Document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct DocumentId(i32);

impl DocumentId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i32) -> Result<Self, DocumentValidationError> {
        if raw < 1 {
            return Err(DocumentValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for DocumentId {
    type Error = DocumentValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for i32 {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who may read a document besides its owner and administrators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Everyone.
    #[default]
    Public,
    /// Only the owner.
    Private,
    /// Users whose role matches the owner's role at creation time.
    Role,
}

impl AccessLevel {
    /// Every access level, in declaration order.
    pub const ALL: [Self; 3] = [Self::Public, Self::Private, Self::Role];

    /// Lower-case name as stored and serialised.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = DocumentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "role" => Ok(Self::Role),
            other => Err(DocumentValidationError::InvalidAccess {
                value: other.to_owned(),
            }),
        }
    }
}

fn validate_text(raw: &str, field: &'static str) -> Result<(), DocumentValidationError> {
    if raw.trim().is_empty() {
        return Err(DocumentValidationError::Empty { field });
    }
    if !has_word(raw) {
        return Err(DocumentValidationError::NoWordCharacters { field });
    }
    Ok(())
}

/// Document title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentTitle(String);

impl DocumentTitle {
    /// Validate and construct a title. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DocumentValidationError> {
        let trimmed = raw.as_ref().trim();
        validate_text(trimmed, "title")?;
        if trimmed.chars().count() > TITLE_MAX {
            return Err(DocumentValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Document body. Stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentContent(String);

impl DocumentContent {
    /// Validate and construct document content.
    pub fn new(raw: impl Into<String>) -> Result<Self, DocumentValidationError> {
        let raw = raw.into();
        validate_text(&raw, "content")?;
        Ok(Self(raw))
    }
}

macro_rules! text_conversions {
    ($($name:ident),*) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl TryFrom<String> for $name {
                type Error = DocumentValidationError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }
        )*
    };
}

text_conversions!(DocumentTitle, DocumentContent);

/// A stored document.
///
/// `owner_role_id` is captured when the document is created and is not
/// updated when the owner's role changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[schema(value_type = i32, example = 12)]
    id: DocumentId,
    #[schema(value_type = i32, example = 7)]
    owner_id: UserId,
    #[schema(value_type = i32, example = 2)]
    owner_role_id: RoleId,
    #[schema(value_type = String, example = "Quarterly report")]
    title: DocumentTitle,
    #[schema(value_type = String, example = "Revenue grew in every region.")]
    content: DocumentContent,
    access: AccessLevel,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field values used to assemble a [`Document`].
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    /// Identifier.
    pub id: DocumentId,
    /// Owning user.
    pub owner_id: UserId,
    /// Owner's role at creation time.
    pub owner_role_id: RoleId,
    /// Title.
    pub title: DocumentTitle,
    /// Body.
    pub content: DocumentContent,
    /// Access level.
    pub access: AccessLevel,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentDraft> for Document {
    fn from(draft: DocumentDraft) -> Self {
        let DocumentDraft {
            id,
            owner_id,
            owner_role_id,
            title,
            content,
            access,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            owner_id,
            owner_role_id,
            title,
            content,
            access,
            created_at,
            updated_at,
        }
    }
}

impl Document {
    /// Identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Owning user.
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Owner's role captured at creation.
    pub fn owner_role_id(&self) -> RoleId {
        self.owner_role_id
    }

    /// Title.
    pub fn title(&self) -> &DocumentTitle {
        &self.title
    }

    /// Body.
    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    /// Access level.
    pub fn access(&self) -> AccessLevel {
        self.access
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

/// Values for inserting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Owning user.
    pub owner_id: UserId,
    /// Owner's current role.
    pub owner_role_id: RoleId,
    /// Title.
    pub title: DocumentTitle,
    /// Body.
    pub content: DocumentContent,
    /// Access level.
    pub access: AccessLevel,
}

/// Partial update applied to a document; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentChanges {
    /// New title.
    pub title: Option<DocumentTitle>,
    /// New body.
    pub content: Option<DocumentContent>,
    /// New access level.
    pub access: Option<AccessLevel>,
}

impl DocumentChanges {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("public", AccessLevel::Public)]
    #[case(" private ", AccessLevel::Private)]
    #[case("role", AccessLevel::Role)]
    fn access_parses_known_values(#[case] raw: &str, #[case] expected: AccessLevel) {
        assert_eq!(raw.parse::<AccessLevel>(), Ok(expected));
    }

    #[rstest]
    #[case("Public")]
    #[case("everyone")]
    #[case("")]
    fn access_rejects_unknown_values(#[case] raw: &str) {
        let error = raw.parse::<AccessLevel>().expect_err("invalid access");
        assert_eq!(error.field(), "access");
        assert_eq!(error.code(), "invalid_access");
    }

    #[rstest]
    fn access_defaults_to_public() {
        assert_eq!(AccessLevel::default(), AccessLevel::Public);
    }

    #[rstest]
    #[case("", DocumentValidationError::Empty { field: "title" })]
    #[case("...", DocumentValidationError::NoWordCharacters { field: "title" })]
    fn title_validation(#[case] raw: &str, #[case] expected: DocumentValidationError) {
        assert_eq!(DocumentTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn content_is_stored_verbatim() {
        let content = DocumentContent::new("  line one\nline two  ").expect("valid content");
        assert_eq!(content.as_ref(), "  line one\nline two  ");
    }

    #[rstest]
    fn content_requires_word_characters() {
        assert_eq!(
            DocumentContent::new("  \n "),
            Err(DocumentValidationError::Empty { field: "content" })
        );
    }

    #[rstest]
    fn document_serialises_access_in_lower_case() {
        let now = Utc::now();
        let document = Document::from(DocumentDraft {
            id: DocumentId::new(1).expect("valid id"),
            owner_id: UserId::new(3).expect("valid id"),
            owner_role_id: RoleId::new(2).expect("valid id"),
            title: DocumentTitle::new("Notes").expect("valid title"),
            content: DocumentContent::new("Remember the milk").expect("valid content"),
            access: AccessLevel::Role,
            created_at: now,
            updated_at: now,
        });
        let value = serde_json::to_value(document).expect("serialise document");
        assert_eq!(value["access"], "role");
        assert_eq!(value["ownerId"], 3);
        assert_eq!(value["ownerRoleId"], 2);
    }
}
