//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and hold no
//! business rules. Row structs (`models.rs`) and the schema (`schema.rs`) stay
//! private to this module. Collection filters arrive as domain predicates and
//! are compiled to SQL by `predicate_sql`.
//!
//! # Example
//!
//! ```no_run
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! use docvault::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/docvault")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_document_repository;
mod diesel_error_mapping;
mod diesel_role_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod predicate_sql;
mod schema;

pub use diesel_document_repository::DieselDocumentRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
