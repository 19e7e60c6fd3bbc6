//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate requests into domain commands and queries, read the
//! requester from the session cookie and wrap results in the
//! `{ message, <payload>, pagination? }` envelope.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod collection;
pub mod documents;
pub mod error;
pub mod health;
pub mod roles;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Message returned by successful requests.
pub const SUCCESS: &str = "success";

/// Response carrying only an outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    /// Outcome message.
    pub message: String,
}

impl MessageBody {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
