//! Plain-text passwords awaiting hashing and stored password hashes.

use std::fmt;

use zeroize::Zeroizing;

use super::text::has_word;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validation errors for plain-text passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    /// Password was empty.
    #[error("password must not be empty")]
    Empty,
    /// Password had no word characters.
    #[error("password must contain letters or digits")]
    NoWordCharacters,
    /// Password was shorter than [`PASSWORD_MIN_LEN`].
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum permitted length.
        min: usize,
    },
}

impl PasswordValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::NoWordCharacters => "invalid_characters",
            Self::TooShort { .. } => "too_short",
        }
    }
}

/// A validated password held in memory that is wiped on drop.
///
/// Whitespace is preserved so credentials compare exactly as typed.
///
/// # Examples
/// ```
/// use docvault::domain::PlainPassword;
///
/// assert!(PlainPassword::new("correct horse").is_ok());
/// assert!(PlainPassword::new("short").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Validate a password for storage.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(PasswordValidationError::Empty);
        }
        if !has_word(&raw) {
            return Err(PasswordValidationError::NoWordCharacters);
        }
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(PasswordValidationError::TooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self(raw))
    }

    /// Expose the secret to a hasher.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}

/// PHC-formatted password hash as stored in the database.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash read from storage or produced by a hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
