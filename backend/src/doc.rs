//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes, the
//! request and response bodies, and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and the `openapi-dump` binary.

use crate::domain::{AccessLevel, Document, Error, ErrorCode, Role, User};
use crate::inbound::http::MessageBody;
use crate::inbound::http::collection::PaginationBody;
use crate::inbound::http::documents::{
    CreateDocumentRequest, DocumentEnvelope, DocumentsEnvelope, UpdateDocumentRequest,
};
use crate::inbound::http::roles::{RoleEnvelope, RoleRequest, RolesEnvelope};
use crate::inbound::http::users::{
    LoginRequest, SignupRequest, UpdateUserRequest, UserEnvelope, UsersEnvelope,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "docvault_session",
                "Session cookie issued by POST /api/v1/users/login or signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "DocVault API",
        description = "Role-aware document management: accounts, roles, and access-controlled documents."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::search_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::list_user_documents,
        crate::inbound::http::documents::create_document,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::documents::search_documents,
        crate::inbound::http::documents::get_document,
        crate::inbound::http::documents::update_document,
        crate::inbound::http::documents::delete_document,
        crate::inbound::http::roles::create_role,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::roles::get_role,
        crate::inbound::http::roles::update_role,
        crate::inbound::http::roles::delete_role,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Role,
        Document,
        AccessLevel,
        Error,
        ErrorCode,
        MessageBody,
        PaginationBody,
        SignupRequest,
        LoginRequest,
        UpdateUserRequest,
        UserEnvelope,
        UsersEnvelope,
        CreateDocumentRequest,
        UpdateDocumentRequest,
        DocumentEnvelope,
        DocumentsEnvelope,
        RoleRequest,
        RoleEnvelope,
        RolesEnvelope,
    )),
    tags(
        (name = "users", description = "Accounts, sessions, and profiles"),
        (name = "documents", description = "Access-controlled documents"),
        (name = "roles", description = "Role administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
