//! Port for document persistence.

use async_trait::async_trait;

use crate::domain::query::{CollectionQuery, DocumentField};
use crate::domain::{Document, DocumentChanges, DocumentId, NewDocument};

use super::{QueryResult, define_port_error};

define_port_error! {
    /// Persistence errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "document repository query failed: {message}",
        /// The owner no longer exists.
        ForeignKeyViolation { message: String } =>
            "document references a missing row: {message}",
    }
}

/// Storage for documents.
///
/// Adapters apply the predicate in [`CollectionQuery`] as given; they never
/// widen or narrow it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a document and return it with its assigned id.
    async fn create(&self, document: &NewDocument) -> Result<Document, DocumentRepositoryError>;

    /// Fetch a document by id.
    async fn find_by_id(&self, id: DocumentId)
    -> Result<Option<Document>, DocumentRepositoryError>;

    /// Apply `changes` and return the updated document, or `None` if it is gone.
    async fn update(
        &self,
        id: DocumentId,
        changes: &DocumentChanges,
    ) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Delete a document. Returns `false` when it did not exist.
    async fn delete(&self, id: DocumentId) -> Result<bool, DocumentRepositoryError>;

    /// Return one page of documents matching the query and the unpaged total.
    async fn list(
        &self,
        query: &CollectionQuery<DocumentField>,
    ) -> Result<QueryResult<Document>, DocumentRepositoryError>;
}
