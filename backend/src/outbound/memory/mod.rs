//! In-process repositories used when no database is configured.
//!
//! All three repositories share one [`InMemoryStore`], so the relational
//! rules the PostgreSQL schema enforces hold here too: unique usernames,
//! emails and role titles, users referencing existing roles, roles in use
//! refusing deletion, and documents following their owner on delete.
//! Collection filters are evaluated with
//! [`Predicate::matches`](crate::domain::query::Predicate::matches).

mod repositories;
mod store;

pub use repositories::{InMemoryDocumentRepository, InMemoryRoleRepository, InMemoryUserRepository};
pub use store::InMemoryStore;

#[cfg(test)]
mod tests;
