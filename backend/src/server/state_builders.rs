//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use docvault::domain::ports::{DocumentRepository, RoleRepository, UserRepository};
use docvault::domain::{
    AuthorizationPolicy, DefaultAccountSeeder, DefaultAccountSeeds, DocumentService, Error,
    RoleService, UserAccountService,
};
use docvault::inbound::http::state::{HttpState, HttpStatePorts};
use docvault::outbound::memory::InMemoryStore;
use docvault::outbound::persistence::{
    DieselDocumentRepository, DieselRoleRepository, DieselUserRepository,
};
use docvault::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build the shared HTTP state and ensure the default accounts exist.
///
/// PostgreSQL repositories are used when a pool is configured; otherwise all
/// data lives in process memory and is lost on restart.
pub(super) async fn build_http_state(config: &ServerConfig) -> Result<web::Data<HttpState>, Error> {
    let state = match &config.db_pool {
        Some(pool) => {
            wire(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselDocumentRepository::new(pool.clone())),
                Arc::new(DieselRoleRepository::new(pool.clone())),
                &config.seeds,
            )
            .await?
        }
        None => {
            warn!("no database configured; using in-memory storage");
            let store = InMemoryStore::default();
            wire(
                Arc::new(store.users()),
                Arc::new(store.documents()),
                Arc::new(store.roles()),
                &config.seeds,
            )
            .await?
        }
    };
    Ok(web::Data::new(state))
}

async fn wire<U, D, R>(
    users: Arc<U>,
    documents: Arc<D>,
    roles: Arc<R>,
    seeds: &DefaultAccountSeeds,
) -> Result<HttpState, Error>
where
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
    R: RoleRepository + 'static,
{
    let policy = AuthorizationPolicy::default();
    let hasher = Arc::new(Argon2PasswordHasher::new());

    let seeder = DefaultAccountSeeder::new(
        users.clone(),
        hasher.clone(),
        policy.accounts(),
        policy.roles(),
    );
    let inserted = seeder.ensure(seeds).await?;
    info!(inserted, "default accounts ensured");

    let accounts = Arc::new(UserAccountService::new(users.clone(), hasher, policy));
    let documents = Arc::new(DocumentService::new(documents, users, policy));
    let roles = Arc::new(RoleService::new(roles, policy));
    Ok(HttpState::new(HttpStatePorts {
        users: accounts.clone(),
        users_query: accounts,
        documents: documents.clone(),
        documents_query: documents,
        roles: roles.clone(),
        roles_query: roles,
    }))
}
