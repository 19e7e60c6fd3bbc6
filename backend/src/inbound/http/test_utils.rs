//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use crate::domain::{
    AccountSeed, AuthorizationPolicy, DefaultAccountSeeder, DefaultAccountSeeds, DefaultAccounts,
    DocumentService, EmailAddress, PersonName, PlainPassword, RoleRegistry, RoleService,
    UserAccountService, Username,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{documents, roles, users};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::Argon2PasswordHasher;

/// Cookie name used by [`test_session_middleware`].
pub const SESSION_COOKIE: &str = "session";

/// Seeded administrator email.
pub const ADMIN_EMAIL: &str = "admin@docvault.local";
/// Seeded administrator password.
pub const ADMIN_PASSWORD: &str = "admin-password";
/// Seeded regular user email.
pub const REGULAR_EMAIL: &str = "regular@docvault.local";
/// Seeded regular user password.
pub const REGULAR_PASSWORD: &str = "regular-password";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state wired to fresh in-memory repositories.
///
/// The returned store can be used to seed rows directly.
pub fn in_memory_state() -> (HttpState, InMemoryStore) {
    let store = InMemoryStore::default();
    let policy = AuthorizationPolicy::default();
    let users = Arc::new(store.users());
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let accounts = Arc::new(UserAccountService::new(users.clone(), hasher, policy));
    let documents = Arc::new(DocumentService::new(
        Arc::new(store.documents()),
        users,
        policy,
    ));
    let roles = Arc::new(RoleService::new(Arc::new(store.roles()), policy));
    let state = HttpState::new(HttpStatePorts {
        users: accounts.clone(),
        users_query: accounts,
        documents: documents.clone(),
        documents_query: documents,
        roles: roles.clone(),
        roles_query: roles,
    });
    (state, store)
}

fn seed(username: &str, email: &str, password: &str) -> AccountSeed {
    AccountSeed {
        username: Username::new(username).expect("valid username"),
        firstname: PersonName::first("Default").expect("valid name"),
        lastname: PersonName::last(username).expect("valid name"),
        email: EmailAddress::new(email).expect("valid email"),
        password: PlainPassword::new(password).expect("valid password"),
    }
}

/// Insert the admin (#1) and regular (#2) accounts.
pub async fn seed_default_accounts(store: &InMemoryStore) {
    let seeder = DefaultAccountSeeder::new(
        Arc::new(store.users()),
        Arc::new(Argon2PasswordHasher::new()),
        DefaultAccounts::default(),
        RoleRegistry::default(),
    );
    let seeds = DefaultAccountSeeds {
        admin: Some(seed("admin", ADMIN_EMAIL, ADMIN_PASSWORD)),
        regular: Some(seed("regular", REGULAR_EMAIL, REGULAR_PASSWORD)),
    };
    seeder.ensure(&seeds).await.expect("default accounts seeded");
}

/// Initialise the full `/api/v1` surface over seeded in-memory state.
pub async fn init_api() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    InMemoryStore,
) {
    let (state, store) = in_memory_state();
    seed_default_accounts(&store).await;
    (api(state).await, store)
}

/// Same as [`init_api`] without the default accounts.
pub async fn init_unseeded_api() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    InMemoryStore,
) {
    let (state, store) = in_memory_state();
    (api(state).await, store)
}

async fn api(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new().wrap(test_session_middleware()).service(
            web::scope("/api/v1")
                .app_data(web::Data::new(state))
                .configure(users::configure)
                .configure(documents::configure)
                .configure(roles::configure),
        ),
    )
    .await
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Log in through the API and return the session cookie.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login for {email}");
    session_cookie(&res).expect("session cookie")
}
