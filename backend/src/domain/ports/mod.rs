//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod document_repository;
mod documents_command;
mod documents_query;
mod password_hasher;
mod role_repository;
mod roles_command;
mod roles_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{DocumentRepository, DocumentRepositoryError};
pub use documents_command::{DocumentSubmission, DocumentsCommand};
pub use documents_query::DocumentsQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::{RoleRepository, RoleRepositoryError};
pub use roles_command::RolesCommand;
pub use roles_query::RolesQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
pub use users_command::{UserRegistration, UserUpdate, UsersCommand};
pub use users_query::UsersQuery;

/// Rows of one page together with the number of rows matching the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult<T> {
    /// Rows in the requested window.
    pub rows: Vec<T>,
    /// Total matching rows, ignoring the window.
    pub total: u64,
}
