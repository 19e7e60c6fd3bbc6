//! Port for role persistence.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Role, RoleId, RoleTitle};

use super::{QueryResult, define_port_error};

define_port_error! {
    /// Persistence errors raised by role repository adapters.
    pub enum RoleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "role repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "role repository query failed: {message}",
        /// Another role already uses the title.
        UniqueViolation { message: String } => "role already exists: {message}",
        /// Users still reference the role.
        ForeignKeyViolation { message: String } => "role is still in use: {message}",
    }
}

/// Storage for roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Insert a role.
    async fn create(&self, title: &RoleTitle) -> Result<Role, RoleRepositoryError>;

    /// Fetch a role by id.
    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, RoleRepositoryError>;

    /// Return one page of roles and the total count.
    async fn list(&self, page: &PageRequest) -> Result<QueryResult<Role>, RoleRepositoryError>;

    /// Rename a role, returning `None` if it does not exist.
    async fn update(
        &self,
        id: RoleId,
        title: &RoleTitle,
    ) -> Result<Option<Role>, RoleRepositoryError>;

    /// Delete a role. Returns `false` when it did not exist.
    async fn delete(&self, id: RoleId) -> Result<bool, RoleRepositoryError>;
}
