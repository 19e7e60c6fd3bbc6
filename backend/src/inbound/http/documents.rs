//! Documents API handlers.
//!
//! Single-document operations answer 404 before any access check; a denied
//! check answers `401 permission denied`. Collections only ever contain
//! documents the caller could also fetch one by one.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::DocumentSubmission;
use crate::domain::query::Page;
use crate::domain::{AccessLevel, Document, DocumentChanges, DocumentContent, DocumentTitle, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::{CollectionParams, PaginationBody, into_parts};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    document_field_error, fields, parse_document_id, require,
};
use crate::inbound::http::{MessageBody, SUCCESS};

/// Body for `POST /api/v1/documents`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    /// Title.
    pub title: Option<String>,
    /// Body text.
    pub content: Option<String>,
    /// `public` (default), `private`, or `role`.
    pub access: Option<String>,
}

fn parse_access(raw: Option<String>) -> Result<Option<AccessLevel>, Error> {
    raw.map(|value| value.parse::<AccessLevel>())
        .transpose()
        .map_err(|err| document_field_error(&err))
}

impl TryFrom<CreateDocumentRequest> for DocumentSubmission {
    type Error = Error;

    fn try_from(value: CreateDocumentRequest) -> Result<Self, Self::Error> {
        let title = require(value.title, fields::TITLE)?;
        let content = require(value.content, fields::CONTENT)?;
        Ok(Self {
            title: DocumentTitle::new(&title).map_err(|err| document_field_error(&err))?,
            content: DocumentContent::new(content).map_err(|err| document_field_error(&err))?,
            access: parse_access(value.access)?,
        })
    }
}

/// Body for `PUT /api/v1/documents/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    /// New title.
    pub title: Option<String>,
    /// New body text.
    pub content: Option<String>,
    /// New access level.
    pub access: Option<String>,
}

impl TryFrom<UpdateDocumentRequest> for DocumentChanges {
    type Error = Error;

    fn try_from(value: UpdateDocumentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value
                .title
                .map(DocumentTitle::new)
                .transpose()
                .map_err(|err| document_field_error(&err))?,
            content: value
                .content
                .map(DocumentContent::new)
                .transpose()
                .map_err(|err| document_field_error(&err))?,
            access: parse_access(value.access)?,
        })
    }
}

/// A single document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentEnvelope {
    /// Outcome message.
    pub message: String,
    /// The document.
    pub document: Document,
}

impl DocumentEnvelope {
    fn success(document: Document) -> Self {
        Self {
            message: SUCCESS.to_owned(),
            document,
        }
    }
}

/// One page of documents.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentsEnvelope {
    /// Outcome message.
    pub message: String,
    /// Documents in the page.
    pub documents: Vec<Document>,
    /// Page counters.
    pub pagination: PaginationBody,
}

impl DocumentsEnvelope {
    pub(crate) fn from_page(page: Page<Document>) -> Self {
        let (documents, pagination) = into_parts(page);
        Self {
            message: SUCCESS.to_owned(),
            documents,
            pagination,
        }
    }
}

/// Create a document owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = DocumentEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["documents"],
    operation_id = "createDocument",
    security(("SessionCookie" = []))
)]
#[post("/documents")]
pub async fn create_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_requester()?;
    let submission = DocumentSubmission::try_from(payload.into_inner())?;
    let document = state
        .documents
        .create_document(&requester, submission)
        .await?;
    info!(document_id = %document.id(), owner_id = %requester.user_id(), "document created");
    Ok(HttpResponse::Created().json(DocumentEnvelope::success(document)))
}

/// List the documents visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, at least 1"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
        ("publishedDate" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses(
        (status = 200, description = "Documents", body = DocumentsEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["documents"],
    operation_id = "listDocuments",
    security(("SessionCookie" = []))
)]
#[get("/documents")]
pub async fn list_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<CollectionParams>,
) -> ApiResult<web::Json<DocumentsEnvelope>> {
    let requester = session.require_requester()?;
    let options = params.listing()?;
    let page = state
        .documents_query
        .list_documents(&requester, &options)
        .await?;
    Ok(web::Json(DocumentsEnvelope::from_page(page)))
}

/// Search visible documents by title and content.
#[utoipa::path(
    get,
    path = "/api/v1/documents/search",
    params(
        ("query" = String, Query, description = "Search terms"),
        ("limit" = Option<u32>, Query, description = "Page size, at least 1"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
        ("publishedDate" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses(
        (status = 200, description = "Matching documents", body = DocumentsEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["documents"],
    operation_id = "searchDocuments",
    security(("SessionCookie" = []))
)]
#[get("/documents/search")]
pub async fn search_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<CollectionParams>,
) -> ApiResult<web::Json<DocumentsEnvelope>> {
    let requester = session.require_requester()?;
    let options = params.search()?;
    let page = state
        .documents_query
        .list_documents(&requester, &options)
        .await?;
    Ok(web::Json(DocumentsEnvelope::from_page(page)))
}

/// Fetch one document.
#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    params(("id" = i32, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document", body = DocumentEnvelope),
        (status = 401, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["documents"],
    operation_id = "getDocument",
    security(("SessionCookie" = []))
)]
#[get("/documents/{id}")]
pub async fn get_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentEnvelope>> {
    let requester = session.require_requester()?;
    let id = parse_document_id(&path)?;
    let document = state.documents_query.get_document(&requester, id).await?;
    Ok(web::Json(DocumentEnvelope::success(document)))
}

/// Update a document.
#[utoipa::path(
    put,
    path = "/api/v1/documents/{id}",
    params(("id" = i32, Path, description = "Document id")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Updated document", body = DocumentEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["documents"],
    operation_id = "updateDocument",
    security(("SessionCookie" = []))
)]
#[put("/documents/{id}")]
pub async fn update_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateDocumentRequest>,
) -> ApiResult<web::Json<DocumentEnvelope>> {
    let requester = session.require_requester()?;
    let id = parse_document_id(&path)?;
    let changes = DocumentChanges::try_from(payload.into_inner())?;
    let document = state
        .documents
        .update_document(&requester, id, changes)
        .await?;
    Ok(web::Json(DocumentEnvelope::success(document)))
}

/// Delete a document.
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    params(("id" = i32, Path, description = "Document id")),
    responses(
        (status = 200, description = "Deleted", body = MessageBody),
        (status = 401, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["documents"],
    operation_id = "deleteDocument",
    security(("SessionCookie" = []))
)]
#[delete("/documents/{id}")]
pub async fn delete_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let requester = session.require_requester()?;
    let id = parse_document_id(&path)?;
    state.documents.delete_document(&requester, id).await?;
    info!(document_id = %id, deleted_by = %requester.user_id(), "document deleted");
    Ok(web::Json(MessageBody::new(SUCCESS)))
}

/// Register the document routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_document)
        .service(list_documents)
        .service(search_documents)
        .service(get_document)
        .service(update_document)
        .service(delete_document);
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
