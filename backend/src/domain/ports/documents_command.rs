//! Driving port for document mutations.

use async_trait::async_trait;

use crate::domain::{
    AccessLevel, Document, DocumentChanges, DocumentContent, DocumentId, DocumentTitle, Error,
    RequesterContext,
};

/// Validated payload for a new document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSubmission {
    /// Title.
    pub title: DocumentTitle,
    /// Body.
    pub content: DocumentContent,
    /// Access level; public when absent.
    pub access: Option<AccessLevel>,
}

/// Domain use-case port for writing documents.
#[async_trait]
pub trait DocumentsCommand: Send + Sync {
    /// Create a document owned by the requester.
    async fn create_document(
        &self,
        requester: &RequesterContext,
        submission: DocumentSubmission,
    ) -> Result<Document, Error>;

    /// Update a document the requester may write.
    async fn update_document(
        &self,
        requester: &RequesterContext,
        id: DocumentId,
        changes: DocumentChanges,
    ) -> Result<Document, Error>;

    /// Delete a document the requester may delete.
    async fn delete_document(
        &self,
        requester: &RequesterContext,
        id: DocumentId,
    ) -> Result<(), Error>;
}
