//! Process settings loaded via OrthoConfig.
//!
//! Values come from `DOCVAULT_*` environment variables, an optional
//! configuration file, or command-line flags. Session cookie settings are read
//! separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    AccountSeed, DefaultAccountSeeds, EmailAddress, PasswordValidationError, PersonName,
    PlainPassword, UserValidationError, Username,
};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@docvault.local";
const DEFAULT_REGULAR_USERNAME: &str = "regular";
const DEFAULT_REGULAR_EMAIL: &str = "regular@docvault.local";
const SEED_FIRSTNAME: &str = "Default";

/// Errors raised while turning raw settings into typed values.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// A default account profile field failed validation.
    #[error("invalid {account} account seed: {source}")]
    SeedProfile {
        /// `admin` or `regular`.
        account: &'static str,
        /// Validation failure.
        #[source]
        source: UserValidationError,
    },
    /// A default account password failed validation.
    #[error("invalid {account} account password: {source}")]
    SeedPassword {
        /// `admin` or `regular`.
        account: &'static str,
        /// Validation failure.
        #[source]
        source: PasswordValidationError,
    },
}

/// Settings controlling the listener, storage, and default accounts.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DOCVAULT")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// Username of the seeded administrator.
    pub admin_username: Option<String>,
    /// Email of the seeded administrator.
    pub admin_email: Option<String>,
    /// Password of the seeded administrator; unset skips seeding it.
    pub admin_password: Option<String>,
    /// Username of the seeded regular user.
    pub regular_username: Option<String>,
    /// Email of the seeded regular user.
    pub regular_email: Option<String>,
    /// Password of the seeded regular user; unset skips seeding it.
    pub regular_password: Option<String>,
}

impl AppSettings {
    /// Parse the listener address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Pool settings when a database URL is configured.
    #[must_use]
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().map(str::trim)?;
        if url.is_empty() {
            return None;
        }
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
                .with_min_idle(self.pool_min_idle)
                .with_connection_timeout(Duration::from_secs(
                    self.pool_timeout_secs.unwrap_or(DEFAULT_POOL_TIMEOUT_SECS),
                )),
        )
    }

    /// Validated seeds for the reserved accounts.
    ///
    /// An account without a configured password is left out.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when a configured profile or password is
    /// invalid.
    pub fn account_seeds(&self) -> Result<DefaultAccountSeeds, SettingsError> {
        let admin = seed(
            "admin",
            self.admin_username.as_deref().unwrap_or(DEFAULT_ADMIN_USERNAME),
            self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL),
            self.admin_password.as_deref(),
        )?;
        let regular = seed(
            "regular",
            self.regular_username
                .as_deref()
                .unwrap_or(DEFAULT_REGULAR_USERNAME),
            self.regular_email.as_deref().unwrap_or(DEFAULT_REGULAR_EMAIL),
            self.regular_password.as_deref(),
        )?;
        Ok(DefaultAccountSeeds { admin, regular })
    }
}

fn seed(
    account: &'static str,
    username: &str,
    email: &str,
    password: Option<&str>,
) -> Result<Option<AccountSeed>, SettingsError> {
    let Some(password) = password else {
        return Ok(None);
    };
    let profile = |source| SettingsError::SeedProfile { account, source };
    Ok(Some(AccountSeed {
        username: Username::new(username).map_err(profile)?,
        firstname: PersonName::first(SEED_FIRSTNAME).map_err(profile)?,
        lastname: PersonName::last(username).map_err(profile)?,
        email: EmailAddress::new(email).map_err(profile)?,
        password: PlainPassword::new(password)
            .map_err(|source| SettingsError::SeedPassword { account, source })?,
    }))
}
