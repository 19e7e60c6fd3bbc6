//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::query::{CollectionQuery, UserField};
use crate::domain::{DefaultAccount, NewUser, StoredCredentials, User, UserChanges, UserId};

use super::{QueryResult, define_port_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Username or email already belongs to another account.
        UniqueViolation { message: String } => "user already exists: {message}",
        /// The referenced role does not exist.
        ForeignKeyViolation { message: String } => "user references a missing row: {message}",
    }
}

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Insert a seeded account under its reserved id unless that id is taken.
    ///
    /// Returns `true` when a row was inserted.
    async fn insert_default_account(
        &self,
        account: &DefaultAccount,
    ) -> Result<bool, UserRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account and its password hash by exact email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Apply `changes` and return the updated account, or `None` if it is gone.
    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Delete an account together with its documents.
    ///
    /// Returns `false` when no such account exists.
    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError>;

    /// Return one page of accounts matching the query and the unpaged total.
    async fn list(
        &self,
        query: &CollectionQuery<UserField>,
    ) -> Result<QueryResult<User>, UserRepositoryError>;
}
