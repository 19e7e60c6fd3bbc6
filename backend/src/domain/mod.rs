//! Domain primitives, access-control policy, and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the pure decision functions that gate every operation, and the
//! services that implement the driving ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `Role`, `Document`: entities and their validated fields.
//! - `AuthorizationPolicy`: read/write/delete decisions.
//! - `query::QueryPredicateBuilder`: authorised collection filters.

pub mod auth;
pub mod authorization;
pub mod default_account_seeder;
pub mod document;
pub mod document_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod query;
pub mod requester;
pub mod role;
pub mod role_service;
mod text;
pub mod trace_id;
pub mod user;
pub mod user_account_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::authorization::{AccessDenial, AuthorizationPolicy, PERMISSION_DENIED};
pub use self::default_account_seeder::{AccountSeed, DefaultAccountSeeder, DefaultAccountSeeds};
pub use self::document::{
    AccessLevel, Document, DocumentChanges, DocumentContent, DocumentDraft, DocumentId,
    DocumentTitle, DocumentValidationError, NewDocument,
};
pub use self::document_service::DocumentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{PASSWORD_MIN_LEN, PasswordHash, PasswordValidationError, PlainPassword};
pub use self::requester::RequesterContext;
pub use self::role::{
    ADMIN_ROLE_TITLE, REGULAR_ROLE_TITLE, Role, RoleId, RoleRegistry, RoleTitle,
    RoleValidationError,
};
pub use self::role_service::RoleService;
pub use self::trace_id::TraceId;
pub use self::user::{
    DefaultAccount, DefaultAccounts, EmailAddress, NewUser, PersonName, StoredCredentials, User,
    UserChanges, UserDraft, UserId, UserValidationError, Username,
};
pub use self::user_account_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use docvault::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
