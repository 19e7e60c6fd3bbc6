//! Account services: signup, login, profile reads, updates, and deletion.
//!
//! Single-account operations look the account up first and report a missing
//! one as not found before any policy check runs.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    PasswordHasher, PasswordHasherError, UserRegistration, UserRepository, UserRepositoryError,
    UserUpdate, UsersCommand, UsersQuery,
};
use crate::domain::query::{Page, QueryOptions, QueryPredicateBuilder};
use crate::domain::{
    AuthorizationPolicy, Error, LoginCredentials, NewUser, RequesterContext, User, UserChanges,
    UserId,
};

const USER_NOT_FOUND: &str = "user not found";
const LOGIN_FAILED: &str = "user verification failed";

/// Account service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserAccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    policy: AuthorizationPolicy,
    filters: QueryPredicateBuilder,
}

impl<U, H> UserAccountService<U, H> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, policy: AuthorizationPolicy) -> Self {
        Self {
            users,
            hasher,
            policy,
            filters: QueryPredicateBuilder::new(policy.roles()),
        }
    }
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::UniqueViolation { .. } => {
            Error::conflict("a user with that email or username already exists")
                .with_details(json!({ "code": "duplicate_user" }))
        }
        UserRepositoryError::ForeignKeyViolation { .. } => {
            Error::invalid_request("role does not exist")
                .with_details(json!({ "field": "roleId", "code": "unknown_role" }))
        }
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

impl<U, H> UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn fetch(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    fn changes_from(&self, update: UserUpdate) -> Result<UserChanges, Error> {
        let password_hash = update
            .password
            .as_ref()
            .map(|password| self.hasher.hash(password))
            .transpose()
            .map_err(map_hasher_error)?;
        Ok(UserChanges {
            username: update.username,
            firstname: update.firstname,
            lastname: update.lastname,
            email: update.email,
            role_id: update.role_id,
            password_hash,
        })
    }
}

#[async_trait]
impl<U, H> UsersCommand for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(
        &self,
        requester: Option<&RequesterContext>,
        registration: UserRegistration,
    ) -> Result<User, Error> {
        let role_id = registration
            .role_id
            .unwrap_or_else(|| self.policy.roles().regular());
        self.policy
            .check_create_user_with_role(requester, role_id)?;

        let password_hash = self
            .hasher
            .hash(&registration.password)
            .map_err(map_hasher_error)?;
        let new_user = NewUser {
            username: registration.username,
            firstname: registration.firstname,
            lastname: registration.lastname,
            email: registration.email,
            role_id,
            password_hash,
        };
        self.users
            .create(&new_user)
            .await
            .map_err(map_user_repository_error)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized(LOGIN_FAILED))?;
        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hasher_error)?;
        if verified {
            Ok(stored.user)
        } else {
            Err(Error::unauthorized(LOGIN_FAILED))
        }
    }

    async fn update_user(
        &self,
        requester: &RequesterContext,
        id: UserId,
        update: UserUpdate,
    ) -> Result<User, Error> {
        let existing = self.fetch(id).await?;
        self.policy
            .check_modify_user(requester, id, update.role_id)?;

        let changes = self.changes_from(update)?;
        if changes.is_empty() {
            return Ok(existing);
        }
        self.users
            .update(id, &changes)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn delete_user(&self, requester: &RequesterContext, id: UserId) -> Result<(), Error> {
        self.fetch(id).await?;
        self.policy.check_delete_user(requester, id)?;
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(map_user_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(USER_NOT_FOUND))
        }
    }
}

#[async_trait]
impl<U, H> UsersQuery for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(
        &self,
        requester: &RequesterContext,
        options: &QueryOptions,
    ) -> Result<Page<User>, Error> {
        let query = self.filters.build_user_filter(requester, options);
        let result = self
            .users
            .list(&query)
            .await
            .map_err(map_user_repository_error)?;
        Ok(Page::new(result.rows, &query.page, result.total))
    }

    async fn get_user(&self, requester: &RequesterContext, id: UserId) -> Result<User, Error> {
        let user = self.fetch(id).await?;
        self.policy.check_read_user_profile(requester, id)?;
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_account_service_tests.rs"]
mod tests;
