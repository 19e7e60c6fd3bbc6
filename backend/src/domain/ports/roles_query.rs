//! Driving port for reading roles.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::query::Page;
use crate::domain::{Error, RequesterContext, Role, RoleId};

/// Domain use-case port for reading roles. Administrators only.
#[async_trait]
pub trait RolesQuery: Send + Sync {
    /// One page of roles.
    async fn list_roles(
        &self,
        requester: &RequesterContext,
        page: PageRequest,
    ) -> Result<Page<Role>, Error>;

    /// A single role.
    async fn get_role(&self, requester: &RequesterContext, id: RoleId) -> Result<Role, Error>;
}
