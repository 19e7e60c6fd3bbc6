//! Driving port for account mutations and authentication.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, Error, LoginCredentials, PersonName, PlainPassword, RequesterContext, RoleId,
    User, UserId, Username,
};

/// Validated signup payload.
#[derive(Debug, Clone)]
pub struct UserRegistration {
    /// Username.
    pub username: Username,
    /// First name.
    pub firstname: PersonName,
    /// Last name.
    pub lastname: PersonName,
    /// Email address.
    pub email: EmailAddress,
    /// Password to hash.
    pub password: PlainPassword,
    /// Requested role; the regular role when absent.
    pub role_id: Option<RoleId>,
}

/// Validated profile update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
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
    /// New password.
    pub password: Option<PlainPassword>,
}

/// Domain use-case port for creating, changing, and authenticating accounts.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an account. `requester` is `None` for anonymous signup.
    async fn register(
        &self,
        requester: Option<&RequesterContext>,
        registration: UserRegistration,
    ) -> Result<User, Error>;

    /// Check credentials and return the matching account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Update an account.
    async fn update_user(
        &self,
        requester: &RequesterContext,
        id: UserId,
        update: UserUpdate,
    ) -> Result<User, Error>;

    /// Delete an account and its documents.
    async fn delete_user(&self, requester: &RequesterContext, id: UserId) -> Result<(), Error>;
}
