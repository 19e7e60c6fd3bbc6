//! Driving port for role administration.

use async_trait::async_trait;

use crate::domain::{Error, RequesterContext, Role, RoleId, RoleTitle};

/// Domain use-case port for changing roles. Administrators only.
#[async_trait]
pub trait RolesCommand: Send + Sync {
    /// Create a role.
    async fn create_role(
        &self,
        requester: &RequesterContext,
        title: RoleTitle,
    ) -> Result<Role, Error>;

    /// Rename a role that is not reserved.
    async fn update_role(
        &self,
        requester: &RequesterContext,
        id: RoleId,
        title: RoleTitle,
    ) -> Result<Role, Error>;

    /// Delete a role that is neither reserved nor assigned.
    async fn delete_role(&self, requester: &RequesterContext, id: RoleId) -> Result<(), Error>;
}
