//! Role administration services.
//!
//! Every operation is restricted to administrators, and that check runs
//! before the role is looked up. Reserved roles can be read but neither
//! renamed nor deleted.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;

use crate::domain::ports::{RoleRepository, RoleRepositoryError, RolesCommand, RolesQuery};
use crate::domain::query::Page;
use crate::domain::{AuthorizationPolicy, Error, RequesterContext, Role, RoleId, RoleTitle};

const ROLE_NOT_FOUND: &str = "role not found";

/// Role service implementing [`RolesCommand`] and [`RolesQuery`].
#[derive(Clone)]
pub struct RoleService<R> {
    roles: Arc<R>,
    policy: AuthorizationPolicy,
}

impl<R> RoleService<R> {
    /// Create a service over the given repository.
    pub fn new(roles: Arc<R>, policy: AuthorizationPolicy) -> Self {
        Self { roles, policy }
    }
}

fn map_role_error(error: RoleRepositoryError) -> Error {
    match error {
        RoleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("role repository unavailable: {message}"))
        }
        RoleRepositoryError::Query { message } => {
            Error::internal(format!("role repository error: {message}"))
        }
        RoleRepositoryError::UniqueViolation { .. } => {
            Error::conflict("a role with that title already exists")
                .with_details(json!({ "field": "title", "code": "duplicate_title" }))
        }
        RoleRepositoryError::ForeignKeyViolation { .. } => {
            Error::conflict("role is still assigned to users")
                .with_details(json!({ "code": "role_in_use" }))
        }
    }
}

impl<R: RoleRepository> RoleService<R> {
    async fn fetch(&self, id: RoleId) -> Result<Role, Error> {
        self.roles
            .find_by_id(id)
            .await
            .map_err(map_role_error)?
            .ok_or_else(|| Error::not_found(ROLE_NOT_FOUND))
    }
}

#[async_trait]
impl<R: RoleRepository> RolesCommand for RoleService<R> {
    async fn create_role(
        &self,
        requester: &RequesterContext,
        title: RoleTitle,
    ) -> Result<Role, Error> {
        self.policy.check_manage_roles(requester)?;
        self.roles.create(&title).await.map_err(map_role_error)
    }

    async fn update_role(
        &self,
        requester: &RequesterContext,
        id: RoleId,
        title: RoleTitle,
    ) -> Result<Role, Error> {
        self.policy.check_manage_roles(requester)?;
        self.fetch(id).await?;
        self.policy.check_modify_role(requester, id)?;
        self.roles
            .update(id, &title)
            .await
            .map_err(map_role_error)?
            .ok_or_else(|| Error::not_found(ROLE_NOT_FOUND))
    }

    async fn delete_role(&self, requester: &RequesterContext, id: RoleId) -> Result<(), Error> {
        self.policy.check_manage_roles(requester)?;
        self.fetch(id).await?;
        self.policy.check_modify_role(requester, id)?;
        if self.roles.delete(id).await.map_err(map_role_error)? {
            Ok(())
        } else {
            Err(Error::not_found(ROLE_NOT_FOUND))
        }
    }
}

#[async_trait]
impl<R: RoleRepository> RolesQuery for RoleService<R> {
    async fn list_roles(
        &self,
        requester: &RequesterContext,
        page: PageRequest,
    ) -> Result<Page<Role>, Error> {
        self.policy.check_manage_roles(requester)?;
        let result = self.roles.list(&page).await.map_err(map_role_error)?;
        Ok(Page::new(result.rows, &page, result.total))
    }

    async fn get_role(&self, requester: &RequesterContext, id: RoleId) -> Result<Role, Error> {
        self.policy.check_manage_roles(requester)?;
        self.fetch(id).await
    }
}
