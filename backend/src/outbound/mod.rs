//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: process-local repositories for running without a database.
//! - **security**: Argon2 password hashing.
//!
//! Adapters convert between domain types and storage representations and
//! contain no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
