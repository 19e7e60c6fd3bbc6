//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentsCommand, DocumentsQuery, RolesCommand, RolesQuery, UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Account mutations and login.
    pub users: Arc<dyn UsersCommand>,
    /// Account reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Document mutations.
    pub documents: Arc<dyn DocumentsCommand>,
    /// Document reads.
    pub documents_query: Arc<dyn DocumentsQuery>,
    /// Role mutations.
    pub roles: Arc<dyn RolesCommand>,
    /// Role reads.
    pub roles_query: Arc<dyn RolesQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account mutations and login.
    pub users: Arc<dyn UsersCommand>,
    /// Account reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Document mutations.
    pub documents: Arc<dyn DocumentsCommand>,
    /// Document reads.
    pub documents_query: Arc<dyn DocumentsQuery>,
    /// Role mutations.
    pub roles: Arc<dyn RolesCommand>,
    /// Role reads.
    pub roles_query: Arc<dyn RolesQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use docvault::domain::{
    ///     AuthorizationPolicy, DocumentService, RoleService, UserAccountService,
    /// };
    /// use docvault::inbound::http::state::{HttpState, HttpStatePorts};
    /// use docvault::outbound::memory::InMemoryStore;
    /// use docvault::outbound::security::Argon2PasswordHasher;
    ///
    /// let store = InMemoryStore::default();
    /// let policy = AuthorizationPolicy::default();
    /// let users = Arc::new(store.users());
    /// let accounts = Arc::new(UserAccountService::new(
    ///     users.clone(),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     policy,
    /// ));
    /// let documents = Arc::new(DocumentService::new(Arc::new(store.documents()), users, policy));
    /// let roles = Arc::new(RoleService::new(Arc::new(store.roles()), policy));
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: accounts.clone(),
    ///     users_query: accounts,
    ///     documents: documents.clone(),
    ///     documents_query: documents,
    ///     roles: roles.clone(),
    ///     roles_query: roles,
    /// });
    /// let _documents = state.documents_query.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            users_query,
            documents,
            documents_query,
            roles,
            roles_query,
        } = ports;
        Self {
            users,
            users_query,
            documents,
            documents_query,
            roles,
            roles_query,
        }
    }
}
