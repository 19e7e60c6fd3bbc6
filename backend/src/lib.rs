//! DocVault backend: role-aware document management over HTTP.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, the access
//! policy, and services; [`inbound`] adapts HTTP requests onto the domain
//! ports; [`outbound`] provides PostgreSQL, in-memory, and password hashing
//! adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
