//! HTTP server configuration object.

use std::net::SocketAddr;

use docvault::domain::DefaultAccountSeeds;
use docvault::inbound::http::session_config::SessionSettings;
use docvault::outbound::persistence::DbPool;

/// Everything the server needs once settings have been validated.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seeds: DefaultAccountSeeds,
}

impl ServerConfig {
    /// Configuration with in-memory storage and no default accounts.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            seeds: DefaultAccountSeeds::default(),
        }
    }

    /// Persist through PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Seeds used to ensure the admin and regular accounts at startup.
    #[must_use]
    pub fn with_seeds(mut self, seeds: DefaultAccountSeeds) -> Self {
        self.seeds = seeds;
        self
    }
}
