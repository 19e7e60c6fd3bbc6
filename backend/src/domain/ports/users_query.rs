//! Driving port for user-facing queries.
//!
//! Inbound adapters use this port to read accounts without importing
//! persistence concerns.

use async_trait::async_trait;

use crate::domain::query::{Page, QueryOptions};
use crate::domain::{Error, RequesterContext, User, UserId};

/// Domain use-case port for reading accounts.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Accounts visible to the requester, optionally filtered by search terms.
    async fn list_users(
        &self,
        requester: &RequesterContext,
        options: &QueryOptions,
    ) -> Result<Page<User>, Error>;

    /// A single profile.
    async fn get_user(&self, requester: &RequesterContext, id: UserId) -> Result<User, Error>;
}
