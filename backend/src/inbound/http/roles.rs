//! Roles API handlers. Administrators only.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, Role, RoleTitle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::{CollectionParams, PaginationBody, into_parts};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{fields, parse_role_id, require, role_field_error};
use crate::inbound::http::{MessageBody, SUCCESS};

/// Body for creating or renaming a role.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    /// Unique title.
    pub title: Option<String>,
}

impl TryFrom<RoleRequest> for RoleTitle {
    type Error = Error;

    fn try_from(value: RoleRequest) -> Result<Self, Self::Error> {
        let title = require(value.title, fields::TITLE)?;
        RoleTitle::new(title).map_err(|err| role_field_error(&err))
    }
}

/// A single role.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleEnvelope {
    /// Outcome message.
    pub message: String,
    /// The role.
    pub role: Role,
}

/// One page of roles.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RolesEnvelope {
    /// Outcome message.
    pub message: String,
    /// Roles in the page.
    pub roles: Vec<Role>,
    /// Page counters.
    pub pagination: PaginationBody,
}

fn role_envelope(role: Role) -> RoleEnvelope {
    RoleEnvelope {
        message: SUCCESS.to_owned(),
        role,
    }
}

/// Create a role.
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Permission denied", body = Error),
        (status = 409, description = "Title taken", body = Error)
    ),
    tags = ["roles"],
    operation_id = "createRole",
    security(("SessionCookie" = []))
)]
#[post("/roles")]
pub async fn create_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RoleRequest>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_requester()?;
    let title = RoleTitle::try_from(payload.into_inner())?;
    let role = state.roles.create_role(&requester, title).await?;
    info!(role_id = %role.id().get(), "role created");
    Ok(HttpResponse::Created().json(role_envelope(role)))
}

/// List roles.
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, at least 1"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
        ("publishedDate" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses(
        (status = 200, description = "Roles", body = RolesEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Permission denied", body = Error)
    ),
    tags = ["roles"],
    operation_id = "listRoles",
    security(("SessionCookie" = []))
)]
#[get("/roles")]
pub async fn list_roles(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<CollectionParams>,
) -> ApiResult<web::Json<RolesEnvelope>> {
    let requester = session.require_requester()?;
    let page_request = params.page_request()?;
    let page = state.roles_query.list_roles(&requester, page_request).await?;
    let (roles, pagination) = into_parts(page);
    Ok(web::Json(RolesEnvelope {
        message: SUCCESS.to_owned(),
        roles,
        pagination,
    }))
}

/// Fetch one role.
#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role", body = RoleEnvelope),
        (status = 401, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["roles"],
    operation_id = "getRole",
    security(("SessionCookie" = []))
)]
#[get("/roles/{id}")]
pub async fn get_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RoleEnvelope>> {
    let requester = session.require_requester()?;
    let id = parse_role_id(&path)?;
    let role = state.roles_query.get_role(&requester, id).await?;
    Ok(web::Json(role_envelope(role)))
}

/// Rename a role.
#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Updated role", body = RoleEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Permission denied", body = Error),
        (status = 403, description = "Protected role", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Title taken", body = Error)
    ),
    tags = ["roles"],
    operation_id = "updateRole",
    security(("SessionCookie" = []))
)]
#[put("/roles/{id}")]
pub async fn update_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<web::Json<RoleEnvelope>> {
    let requester = session.require_requester()?;
    let id = parse_role_id(&path)?;
    let title = RoleTitle::try_from(payload.into_inner())?;
    let role = state.roles.update_role(&requester, id, title).await?;
    Ok(web::Json(role_envelope(role)))
}

/// Delete a role that no account holds.
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Deleted", body = MessageBody),
        (status = 401, description = "Permission denied", body = Error),
        (status = 403, description = "Protected role", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Role still assigned", body = Error)
    ),
    tags = ["roles"],
    operation_id = "deleteRole",
    security(("SessionCookie" = []))
)]
#[delete("/roles/{id}")]
pub async fn delete_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let requester = session.require_requester()?;
    let id = parse_role_id(&path)?;
    state.roles.delete_role(&requester, id).await?;
    info!(role_id = %id.get(), "role deleted");
    Ok(web::Json(MessageBody::new(SUCCESS)))
}

/// Register the role routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_role)
        .service(list_roles)
        .service(get_role)
        .service(update_role)
        .service(delete_role);
}
