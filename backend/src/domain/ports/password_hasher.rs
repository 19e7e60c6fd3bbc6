//! Port for the password hashing primitive.

use crate::domain::{PasswordHash, PlainPassword};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHasherError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes new passwords and verifies login attempts against stored hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for storage.
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Check `candidate` against `stored`.
    fn verify(&self, candidate: &str, stored: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
