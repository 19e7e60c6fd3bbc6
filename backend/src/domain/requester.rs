//! Identity of the authenticated caller.

use super::role::RoleId;
use super::user::UserId;

/// The verified `{userId, roleId}` pair carried by a session.
///
/// Every policy and filter function takes the requester explicitly; nothing
/// reads it from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequesterContext {
    user_id: UserId,
    role_id: RoleId,
}

impl RequesterContext {
    /// Build a requester from verified identifiers.
    #[must_use]
    pub const fn new(user_id: UserId, role_id: RoleId) -> Self {
        Self { user_id, role_id }
    }

    /// Authenticated user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Role held when the credential was issued.
    #[must_use]
    pub const fn role_id(&self) -> RoleId {
        self.role_id
    }
}
