//! Document services.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, DocumentSubmission, DocumentsCommand,
    DocumentsQuery, UserRepository,
};
use crate::domain::query::{Page, QueryOptions, QueryPredicateBuilder};
use crate::domain::user_account_service::map_user_repository_error;
use crate::domain::{
    AuthorizationPolicy, Document, DocumentChanges, DocumentId, Error, NewDocument,
    RequesterContext, UserId,
};

const DOCUMENT_NOT_FOUND: &str = "document not found";
const OWNER_GONE: &str = "requesting account no longer exists";

/// Document service implementing [`DocumentsCommand`] and [`DocumentsQuery`].
#[derive(Clone)]
pub struct DocumentService<D, U> {
    documents: Arc<D>,
    users: Arc<U>,
    policy: AuthorizationPolicy,
    filters: QueryPredicateBuilder,
}

impl<D, U> DocumentService<D, U> {
    /// Create a service over the given repositories.
    pub fn new(documents: Arc<D>, users: Arc<U>, policy: AuthorizationPolicy) -> Self {
        Self {
            documents,
            users,
            policy,
            filters: QueryPredicateBuilder::new(policy.roles()),
        }
    }
}

fn map_document_error(error: DocumentRepositoryError) -> Error {
    match error {
        DocumentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("document repository unavailable: {message}"))
        }
        DocumentRepositoryError::Query { message } => {
            Error::internal(format!("document repository error: {message}"))
        }
        DocumentRepositoryError::ForeignKeyViolation { .. } => Error::unauthorized(OWNER_GONE),
    }
}

impl<D, U> DocumentService<D, U>
where
    D: DocumentRepository,
    U: UserRepository,
{
    async fn fetch(&self, id: DocumentId) -> Result<Document, Error> {
        self.documents
            .find_by_id(id)
            .await
            .map_err(map_document_error)?
            .ok_or_else(|| Error::not_found(DOCUMENT_NOT_FOUND))
    }
}

#[async_trait]
impl<D, U> DocumentsCommand for DocumentService<D, U>
where
    D: DocumentRepository,
    U: UserRepository,
{
    async fn create_document(
        &self,
        requester: &RequesterContext,
        submission: DocumentSubmission,
    ) -> Result<Document, Error> {
        // The session may predate a role change; snapshot the stored role.
        let owner = self
            .users
            .find_by_id(requester.user_id())
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized(OWNER_GONE))?;
        let document = NewDocument {
            owner_id: owner.id(),
            owner_role_id: owner.role_id(),
            title: submission.title,
            content: submission.content,
            access: submission.access.unwrap_or_default(),
        };
        self.documents
            .create(&document)
            .await
            .map_err(map_document_error)
    }

    async fn update_document(
        &self,
        requester: &RequesterContext,
        id: DocumentId,
        changes: DocumentChanges,
    ) -> Result<Document, Error> {
        let existing = self.fetch(id).await?;
        self.policy.check_write_document(requester, &existing)?;
        if changes.is_empty() {
            return Ok(existing);
        }
        self.documents
            .update(id, &changes)
            .await
            .map_err(map_document_error)?
            .ok_or_else(|| Error::not_found(DOCUMENT_NOT_FOUND))
    }

    async fn delete_document(
        &self,
        requester: &RequesterContext,
        id: DocumentId,
    ) -> Result<(), Error> {
        let existing = self.fetch(id).await?;
        self.policy.check_delete_document(requester, &existing)?;
        let deleted = self
            .documents
            .delete(id)
            .await
            .map_err(map_document_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(DOCUMENT_NOT_FOUND))
        }
    }
}

#[async_trait]
impl<D, U> DocumentsQuery for DocumentService<D, U>
where
    D: DocumentRepository,
    U: UserRepository,
{
    async fn list_documents(
        &self,
        requester: &RequesterContext,
        options: &QueryOptions,
    ) -> Result<Page<Document>, Error> {
        let query = self.filters.build_document_filter(requester, options);
        let result = self
            .documents
            .list(&query)
            .await
            .map_err(map_document_error)?;
        Ok(Page::new(result.rows, &query.page, result.total))
    }

    async fn get_document(
        &self,
        requester: &RequesterContext,
        id: DocumentId,
    ) -> Result<Document, Error> {
        let document = self.fetch(id).await?;
        self.policy.check_read_document(requester, &document)?;
        Ok(document)
    }

    async fn list_user_documents(
        &self,
        requester: &RequesterContext,
        owner: UserId,
        options: &QueryOptions,
    ) -> Result<Page<Document>, Error> {
        self.users
            .find_by_id(owner)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let query = self
            .filters
            .build_owner_document_filter(requester, owner, options);
        let result = self
            .documents
            .list(&query)
            .await
            .map_err(map_document_error)?;
        Ok(Page::new(result.rows, &query.page, result.total))
    }
}

#[cfg(test)]
#[path = "document_service_tests.rs"]
mod tests;
