//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with each
//! hash and older hashes keep verifying after the parameters change.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher as _, PasswordVerifier as _, SaltString};

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, PlainPassword};

/// Argon2id hasher with the crate's default cost parameters.
///
/// Test builds use a 1 MiB, single-pass configuration to keep suites fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn argon2_instance() -> Argon2<'static> {
    #[cfg(test)]
    {
        use argon2::{Algorithm, Params, Version};
        Params::new(1024, 1, 1, None).map_or_else(
            |_| Argon2::default(),
            |params| Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        )
    }

    #[cfg(not(test))]
    {
        Argon2::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        argon2_instance()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    fn verify(&self, candidate: &str, stored: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = password_hash::PasswordHash::new(stored.as_str())
            .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        match argon2_instance().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::malformed_hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn password(raw: &str) -> PlainPassword {
        PlainPassword::new(raw).expect("valid password")
    }

    #[rstest]
    fn hashes_are_salted_phc_strings() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash(&password("correct horse")).expect("hash");
        let second = hasher.hash(&password("correct horse")).expect("hash");

        assert!(first.as_str().starts_with("$argon2id$"));
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[case("correct horse", true)]
    #[case("Correct horse", false)]
    #[case("", false)]
    fn verification_is_exact(#[case] candidate: &str, #[case] expected: bool) {
        let hasher = Argon2PasswordHasher::new();
        let stored = hasher.hash(&password("correct horse")).expect("hash");

        assert_eq!(hasher.verify(candidate, &stored).expect("verify"), expected);
    }

    #[rstest]
    fn malformed_hashes_are_errors() {
        let error = Argon2PasswordHasher::new()
            .verify("anything", &PasswordHash::new("plaintext"))
            .expect_err("malformed");
        assert!(matches!(error, PasswordHasherError::MalformedHash { .. }));
    }
}
