//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"username":"ada","firstname":"Ada",...}
//! POST /api/v1/users/login {"email":"ada@example.com","password":"..."}
//! GET /api/v1/users?limit=10&offset=0&publishedDate=ASC
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{UserRegistration, UserUpdate};
use crate::domain::query::Page;
use crate::domain::{
    EmailAddress, Error, LoginCredentials, PersonName, PlainPassword, User, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::{CollectionParams, PaginationBody, into_parts};
use crate::inbound::http::documents::DocumentsEnvelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    fields, login_field_error, parse_role_field, parse_user_id, password_field_error, require,
    user_field_error,
};
use crate::inbound::http::{MessageBody, SUCCESS};

/// Signup request body for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Unique username.
    pub username: Option<String>,
    /// First name.
    pub firstname: Option<String>,
    /// Last name.
    pub lastname: Option<String>,
    /// Unique email address.
    pub email: Option<String>,
    /// Password, at least eight characters.
    pub password: Option<String>,
    /// Requested role; the regular role when omitted.
    pub role_id: Option<i32>,
}

impl TryFrom<SignupRequest> for UserRegistration {
    type Error = Error;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        let username = require(value.username, fields::USERNAME)?;
        let firstname = require(value.firstname, fields::FIRSTNAME)?;
        let lastname = require(value.lastname, fields::LASTNAME)?;
        let email = require(value.email, fields::EMAIL)?;
        let password = require(value.password, fields::PASSWORD)?;
        Ok(Self {
            username: Username::new(&username).map_err(|err| user_field_error(&err))?,
            firstname: PersonName::first(&firstname).map_err(|err| user_field_error(&err))?,
            lastname: PersonName::last(&lastname).map_err(|err| user_field_error(&err))?,
            email: EmailAddress::new(&email).map_err(|err| user_field_error(&err))?,
            password: PlainPassword::new(password).map_err(|err| password_field_error(&err))?,
            role_id: value.role_id.map(parse_role_field).transpose()?,
        })
    }
}

/// Profile update body for `PUT /api/v1/users/{id}`. Omitted fields are
/// left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New username.
    pub username: Option<String>,
    /// New first name.
    pub firstname: Option<String>,
    /// New last name.
    pub lastname: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New role; administrators only.
    pub role_id: Option<i32>,
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: value
                .username
                .map(Username::new)
                .transpose()
                .map_err(|err| user_field_error(&err))?,
            firstname: value
                .firstname
                .map(PersonName::first)
                .transpose()
                .map_err(|err| user_field_error(&err))?,
            lastname: value
                .lastname
                .map(PersonName::last)
                .transpose()
                .map_err(|err| user_field_error(&err))?,
            email: value
                .email
                .map(EmailAddress::new)
                .transpose()
                .map_err(|err| user_field_error(&err))?,
            role_id: value.role_id.map(parse_role_field).transpose()?,
            password: value
                .password
                .map(PlainPassword::new)
                .transpose()
                .map_err(|err| password_field_error(&err))?,
        })
    }
}

/// Login request body for `POST /api/v1/users/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(|err| login_field_error(&err))
    }
}

/// A single account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    /// Outcome message.
    pub message: String,
    /// The account.
    pub user: User,
}

/// One page of accounts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersEnvelope {
    /// Outcome message.
    pub message: String,
    /// Accounts in the page.
    pub users: Vec<User>,
    /// Page counters.
    pub pagination: PaginationBody,
}

fn user_envelope(message: &str, user: User) -> UserEnvelope {
    UserEnvelope {
        message: message.to_owned(),
        user,
    }
}

/// Create an account.
///
/// Anonymous callers are logged in as the new account. Only administrators
/// may assign the admin role.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserEnvelope,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Role not assignable", body = Error),
        (status = 409, description = "Username or email taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/users")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = UserRegistration::try_from(payload.into_inner())?;
    let requester = session.requester()?;
    let user = state
        .users
        .register(requester.as_ref(), registration)
        .await?;
    if requester.is_none() {
        session.persist_user(&user)?;
    }
    info!(user_id = %user.id(), "account created");
    Ok(HttpResponse::Created().json(user_envelope(SUCCESS, user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserEnvelope,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.users.authenticate(&credentials).await?;
    session.persist_user(&user)?;
    Ok(web::Json(user_envelope("logged in", user)))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses((status = 200, description = "Session ended", body = MessageBody)),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/users/logout")]
pub async fn logout(session: SessionContext) -> web::Json<MessageBody> {
    session.purge();
    web::Json(MessageBody::new("logged out"))
}

/// List accounts. Administrators see every account, everyone else only
/// their own.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, at least 1"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
        ("publishedDate" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses(
        (status = 200, description = "Users", body = UsersEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<CollectionParams>,
) -> ApiResult<web::Json<UsersEnvelope>> {
    let requester = session.require_requester()?;
    let options = params.listing()?;
    let page = state.users_query.list_users(&requester, &options).await?;
    Ok(web::Json(users_envelope(page)))
}

/// Search accounts by username, names, or email.
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(
        ("query" = String, Query, description = "Search terms"),
        ("limit" = Option<u32>, Query, description = "Page size, at least 1"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
        ("publishedDate" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses(
        (status = 200, description = "Matching users", body = UsersEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "searchUsers",
    security(("SessionCookie" = []))
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<CollectionParams>,
) -> ApiResult<web::Json<UsersEnvelope>> {
    let requester = session.require_requester()?;
    let options = params.search()?;
    let page = state.users_query.list_users(&requester, &options).await?;
    Ok(web::Json(users_envelope(page)))
}

fn users_envelope(page: Page<User>) -> UsersEnvelope {
    let (users, pagination) = into_parts(page);
    UsersEnvelope {
        message: SUCCESS.to_owned(),
        users,
        pagination,
    }
}

/// Fetch one profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserEnvelope),
        (status = 401, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("SessionCookie" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let requester = session.require_requester()?;
    let id = parse_user_id(&path)?;
    let user = state.users_query.get_user(&requester, id).await?;
    Ok(web::Json(user_envelope(SUCCESS, user)))
}

/// Update a profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Permission denied", body = Error),
        (status = 403, description = "Protected account", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Username or email taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let requester = session.require_requester()?;
    let id = parse_user_id(&path)?;
    let update = UserUpdate::try_from(payload.into_inner())?;
    let user = state.users.update_user(&requester, id, update).await?;
    Ok(web::Json(user_envelope(SUCCESS, user)))
}

/// Delete an account and its documents.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = MessageBody),
        (status = 401, description = "Permission denied", body = Error),
        (status = 403, description = "Protected account", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("SessionCookie" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let requester = session.require_requester()?;
    let id = parse_user_id(&path)?;
    state.users.delete_user(&requester, id).await?;
    if requester.user_id() == id {
        session.purge();
    }
    info!(user_id = %id, deleted_by = %requester.user_id(), "account deleted");
    Ok(web::Json(MessageBody::new(SUCCESS)))
}

/// Documents owned by one account that the caller may read.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/documents",
    params(
        ("id" = i32, Path, description = "Owner id"),
        ("limit" = Option<u32>, Query, description = "Page size, at least 1"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
        ("publishedDate" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses(
        (status = 200, description = "Documents", body = DocumentsEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Owner not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUserDocuments",
    security(("SessionCookie" = []))
)]
#[get("/users/{id}/documents")]
pub async fn list_user_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    params: web::Query<CollectionParams>,
) -> ApiResult<web::Json<DocumentsEnvelope>> {
    let requester = session.require_requester()?;
    let owner = parse_user_id(&path)?;
    let options = params.listing()?;
    let page = state
        .documents_query
        .list_user_documents(&requester, owner, &options)
        .await?;
    Ok(web::Json(DocumentsEnvelope::from_page(page)))
}

/// Register the user routes on a scope.
///
/// `/users/search` is registered before `/users/{id}` so it is not read as an
/// identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(logout)
        .service(list_users)
        .service(search_users)
        .service(list_user_documents)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
