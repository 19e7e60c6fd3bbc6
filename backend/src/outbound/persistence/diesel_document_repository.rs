//! PostgreSQL-backed `DocumentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::SortOrder;

use crate::domain::ports::{DocumentRepository, DocumentRepositoryError, QueryResult};
use crate::domain::query::{CollectionQuery, DocumentField};
use crate::domain::{
    AccessLevel, Document, DocumentChanges, DocumentContent, DocumentDraft, DocumentId,
    DocumentTitle, NewDocument, RoleId, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DocumentChangeset, DocumentRow, NewDocumentRow};
use super::pool::DbPool;
use super::predicate_sql::document_condition;
use super::schema::documents;

/// Diesel-backed implementation of the document repository port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn invalid_row(error: impl std::fmt::Display) -> DocumentRepositoryError {
    DocumentRepositoryError::query(format!("stored document is invalid: {error}"))
}

fn row_to_document(row: DocumentRow) -> Result<Document, DocumentRepositoryError> {
    Ok(Document::from(DocumentDraft {
        id: DocumentId::new(row.id).map_err(invalid_row)?,
        owner_id: UserId::new(row.owner_id).map_err(invalid_row)?,
        owner_role_id: RoleId::new(row.owner_role_id).map_err(invalid_row)?,
        title: DocumentTitle::new(row.title).map_err(invalid_row)?,
        content: DocumentContent::new(row.content).map_err(invalid_row)?,
        access: row.access.parse::<AccessLevel>().map_err(invalid_row)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn create(&self, document: &NewDocument) -> Result<Document, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewDocumentRow {
            owner_id: document.owner_id.get(),
            owner_role_id: document.owner_role_id.get(),
            title: document.title.as_ref(),
            content: document.content.as_ref(),
            access: document.access.as_str(),
        };
        let row: DocumentRow = diesel::insert_into(documents::table)
            .values(&new_row)
            .returning(DocumentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_document(row)
    }

    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DocumentRow> = documents::table
            .find(id.get())
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_document).transpose()
    }

    async fn update(
        &self,
        id: DocumentId,
        changes: &DocumentChanges,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = DocumentChangeset {
            title: changes.title.as_ref().map(|title| title.as_ref()),
            content: changes.content.as_ref().map(|content| content.as_ref()),
            access: changes.access.map(AccessLevel::as_str),
            updated_at: Utc::now(),
        };
        let row: Option<DocumentRow> = diesel::update(documents::table.find(id.get()))
            .set(&changeset)
            .returning(DocumentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_document).transpose()
    }

    async fn delete(&self, id: DocumentId) -> Result<bool, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(documents::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn list(
        &self,
        query: &CollectionQuery<DocumentField>,
    ) -> Result<QueryResult<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = documents::table
            .filter(document_condition(&query.predicate))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let page = documents::table
            .filter(document_condition(&query.predicate))
            .select(DocumentRow::as_select())
            .into_boxed();
        let page = match query.page.order() {
            SortOrder::Asc => page.order((documents::created_at.asc(), documents::id.asc())),
            SortOrder::Desc => page.order((documents::created_at.desc(), documents::id.desc())),
        };
        let rows: Vec<DocumentRow> = page
            .limit(i64::from(query.page.limit()))
            .offset(i64::from(query.page.offset()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(QueryResult {
            rows: rows
                .into_iter()
                .map(row_to_document)
                .collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
