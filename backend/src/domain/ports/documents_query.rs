//! Driving port for reading documents.

use async_trait::async_trait;

use crate::domain::query::{Page, QueryOptions};
use crate::domain::{Document, DocumentId, Error, RequesterContext, UserId};

/// Domain use-case port for reading documents.
///
/// Collections only ever contain documents the requester could also fetch
/// individually.
#[async_trait]
pub trait DocumentsQuery: Send + Sync {
    /// Documents visible to the requester, optionally filtered by search terms.
    async fn list_documents(
        &self,
        requester: &RequesterContext,
        options: &QueryOptions,
    ) -> Result<Page<Document>, Error>;

    /// A single document.
    async fn get_document(
        &self,
        requester: &RequesterContext,
        id: DocumentId,
    ) -> Result<Document, Error>;

    /// Visible documents owned by `owner`.
    async fn list_user_documents(
        &self,
        requester: &RequesterContext,
        owner: UserId,
        options: &QueryOptions,
    ) -> Result<Page<Document>, Error>;
}
