//! Access-control decisions.
//!
//! Every function here is pure and total. The `can_*` functions answer a
//! yes/no question; the matching `check_*` functions return the reason for a
//! denial so callers can tell an unauthorised requester apart from an attempt
//! to touch a protected resource. Missing resources are the caller's concern
//! and must be reported before a policy function runs.

use super::document::{AccessLevel, Document};
use super::error::Error;
use super::requester::RequesterContext;
use super::role::{RoleId, RoleRegistry};
use super::user::{DefaultAccounts, UserId};

/// Message returned for every plain authorisation failure.
pub const PERMISSION_DENIED: &str = "permission denied";

/// Why a policy check refused an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenial {
    /// The requester lacks the rights for this operation.
    #[error("permission denied")]
    PermissionDenied,
    /// The operation targets a seeded account or reserved role.
    #[error("{reason}")]
    ProtectedResource {
        /// Human-readable explanation.
        reason: &'static str,
    },
}

impl From<AccessDenial> for Error {
    fn from(value: AccessDenial) -> Self {
        match value {
            AccessDenial::PermissionDenied => Self::unauthorized(PERMISSION_DENIED),
            AccessDenial::ProtectedResource { reason } => Self::forbidden(reason),
        }
    }
}

const PROTECTED_ACCOUNT: &str = "you can not delete a default account";
const PROTECTED_ACCOUNT_ROLE: &str = "you can not change the role of a default account";
const PROTECTED_ROLE: &str = "you are not permitted to modify this role";
const ADMIN_SIGNUP: &str = "permission denied, you cannot sign up as an admin user";

fn allow_or(allowed: bool, denial: AccessDenial) -> Result<(), AccessDenial> {
    if allowed {
        Ok(())
    } else {
        Err(denial)
    }
}

/// Decision functions parameterised by the reserved role and account ids.
///
/// # Examples
/// ```
/// use docvault::domain::{AuthorizationPolicy, RequesterContext, RoleId, UserId};
///
/// let policy = AuthorizationPolicy::default();
/// let admin = RequesterContext::new(UserId::new(1).unwrap(), RoleId::new(1).unwrap());
/// assert!(policy.can_manage_roles(&admin));
/// assert!(!policy.can_delete_user(&admin, UserId::new(1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    roles: RoleRegistry,
    accounts: DefaultAccounts,
}

impl AuthorizationPolicy {
    /// Build a policy from explicit registries.
    #[must_use]
    pub const fn new(roles: RoleRegistry, accounts: DefaultAccounts) -> Self {
        Self { roles, accounts }
    }

    /// Reserved role identifiers.
    #[must_use]
    pub const fn roles(&self) -> RoleRegistry {
        self.roles
    }

    /// Seeded account identifiers.
    #[must_use]
    pub const fn accounts(&self) -> DefaultAccounts {
        self.accounts
    }

    /// True when the requester holds the admin role.
    #[must_use]
    pub fn is_admin(&self, requester: &RequesterContext) -> bool {
        self.roles.is_admin(requester.role_id())
    }

    /// Public documents, the owner, admins, and same-role readers of
    /// role-scoped documents.
    #[must_use]
    pub fn can_read_document(&self, requester: &RequesterContext, document: &Document) -> bool {
        document.access() == AccessLevel::Public
            || document.owner_id() == requester.user_id()
            || self.is_admin(requester)
            || (document.access() == AccessLevel::Role
                && document.owner_role_id() == requester.role_id())
    }

    /// Owner or admin.
    #[must_use]
    pub fn can_write_document(&self, requester: &RequesterContext, document: &Document) -> bool {
        document.owner_id() == requester.user_id() || self.is_admin(requester)
    }

    /// Owner or admin.
    #[must_use]
    pub fn can_delete_document(&self, requester: &RequesterContext, document: &Document) -> bool {
        self.can_write_document(requester, document)
    }

    /// Admin or self.
    #[must_use]
    pub fn can_read_user_profile(&self, requester: &RequesterContext, target: UserId) -> bool {
        self.is_admin(requester) || requester.user_id() == target
    }

    /// Admins may change anything except the role of a seeded account. Other
    /// users may edit their own profile as long as the role stays the one
    /// they already hold.
    #[must_use]
    pub fn can_modify_user(
        &self,
        requester: &RequesterContext,
        target: UserId,
        requested_role: Option<RoleId>,
    ) -> bool {
        self.may_edit_profile(requester, target, requested_role)
            && !self.changes_reserved_role(target, requested_role)
    }

    fn may_edit_profile(
        &self,
        requester: &RequesterContext,
        target: UserId,
        requested_role: Option<RoleId>,
    ) -> bool {
        if self.is_admin(requester) {
            return true;
        }
        requester.user_id() == target
            && requested_role.is_none_or(|role| role == requester.role_id())
    }

    /// Seeded accounts keep the reserved role they were created with.
    fn changes_reserved_role(&self, target: UserId, requested_role: Option<RoleId>) -> bool {
        let reserved = if target == self.accounts.admin() {
            self.roles.admin()
        } else if target == self.accounts.regular() {
            self.roles.regular()
        } else {
            return false;
        };
        requested_role.is_some_and(|role| role != reserved)
    }

    /// Admin, and only for accounts other than the seeded ones.
    #[must_use]
    pub fn can_delete_user(&self, requester: &RequesterContext, target: UserId) -> bool {
        self.is_admin(requester) && !self.accounts.is_protected(target)
    }

    /// Admin, and only for roles other than the reserved ones.
    #[must_use]
    pub fn can_modify_role(&self, requester: &RequesterContext, target: RoleId) -> bool {
        self.is_admin(requester) && !self.roles.is_protected(target)
    }

    /// Admin only.
    #[must_use]
    pub fn can_manage_roles(&self, requester: &RequesterContext) -> bool {
        self.is_admin(requester)
    }

    /// Anyone may create a non-admin account; only admins may create admins.
    #[must_use]
    pub fn can_create_user_with_role(
        &self,
        requester: Option<&RequesterContext>,
        role: RoleId,
    ) -> bool {
        !self.roles.is_admin(role) || requester.is_some_and(|r| self.is_admin(r))
    }

    /// Explained form of [`Self::can_read_document`].
    pub fn check_read_document(
        &self,
        requester: &RequesterContext,
        document: &Document,
    ) -> Result<(), AccessDenial> {
        allow_or(
            self.can_read_document(requester, document),
            AccessDenial::PermissionDenied,
        )
    }

    /// Explained form of [`Self::can_write_document`].
    pub fn check_write_document(
        &self,
        requester: &RequesterContext,
        document: &Document,
    ) -> Result<(), AccessDenial> {
        allow_or(
            self.can_write_document(requester, document),
            AccessDenial::PermissionDenied,
        )
    }

    /// Explained form of [`Self::can_delete_document`].
    pub fn check_delete_document(
        &self,
        requester: &RequesterContext,
        document: &Document,
    ) -> Result<(), AccessDenial> {
        allow_or(
            self.can_delete_document(requester, document),
            AccessDenial::PermissionDenied,
        )
    }

    /// Explained form of [`Self::can_read_user_profile`].
    pub fn check_read_user_profile(
        &self,
        requester: &RequesterContext,
        target: UserId,
    ) -> Result<(), AccessDenial> {
        allow_or(
            self.can_read_user_profile(requester, target),
            AccessDenial::PermissionDenied,
        )
    }

    /// Explained form of [`Self::can_modify_user`].
    pub fn check_modify_user(
        &self,
        requester: &RequesterContext,
        target: UserId,
        requested_role: Option<RoleId>,
    ) -> Result<(), AccessDenial> {
        allow_or(
            self.may_edit_profile(requester, target, requested_role),
            AccessDenial::PermissionDenied,
        )?;
        allow_or(
            !self.changes_reserved_role(target, requested_role),
            AccessDenial::ProtectedResource {
                reason: PROTECTED_ACCOUNT_ROLE,
            },
        )
    }

    /// Explained form of [`Self::can_delete_user`].
    pub fn check_delete_user(
        &self,
        requester: &RequesterContext,
        target: UserId,
    ) -> Result<(), AccessDenial> {
        self.require_admin(requester)?;
        allow_or(
            !self.accounts.is_protected(target),
            AccessDenial::ProtectedResource {
                reason: PROTECTED_ACCOUNT,
            },
        )
    }

    /// Explained form of [`Self::can_modify_role`].
    pub fn check_modify_role(
        &self,
        requester: &RequesterContext,
        target: RoleId,
    ) -> Result<(), AccessDenial> {
        self.require_admin(requester)?;
        allow_or(
            !self.roles.is_protected(target),
            AccessDenial::ProtectedResource {
                reason: PROTECTED_ROLE,
            },
        )
    }

    /// Explained form of [`Self::can_manage_roles`].
    pub fn check_manage_roles(&self, requester: &RequesterContext) -> Result<(), AccessDenial> {
        self.require_admin(requester)
    }

    fn require_admin(&self, requester: &RequesterContext) -> Result<(), AccessDenial> {
        allow_or(self.is_admin(requester), AccessDenial::PermissionDenied)
    }

    /// Explained form of [`Self::can_create_user_with_role`].
    pub fn check_create_user_with_role(
        &self,
        requester: Option<&RequesterContext>,
        role: RoleId,
    ) -> Result<(), AccessDenial> {
        allow_or(
            self.can_create_user_with_role(requester, role),
            AccessDenial::ProtectedResource {
                reason: ADMIN_SIGNUP,
            },
        )
    }
}

#[cfg(test)]
#[path = "authorization_tests.rs"]
mod tests;
