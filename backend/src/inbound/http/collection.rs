//! Query-string handling shared by the collection endpoints.
//!
//! `limit`, `offset` and `publishedDate` are kept as raw strings so invalid
//! values produce the domain's pagination error instead of a generic
//! deserialisation failure.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::query::{Page, PageMetadata, PageRequest, QueryOptions, SearchTerms};
use crate::domain::Error;
use crate::inbound::http::validation::{
    fields, invalid_query_error, missing_field_error, pagination_error,
};

/// Raw collection query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionParams {
    /// Page size, at least one.
    pub limit: Option<String>,
    /// Rows to skip.
    pub offset: Option<String>,
    /// `ASC` or `DESC` on the creation timestamp.
    pub published_date: Option<String>,
    /// Free-text search, used by the `/search` endpoints.
    pub query: Option<String>,
}

impl CollectionParams {
    /// Validate the paging parameters.
    pub fn page_request(&self) -> Result<PageRequest, Error> {
        PageRequest::parse(
            self.limit.as_deref(),
            self.offset.as_deref(),
            self.published_date.as_deref(),
        )
        .map_err(|error| pagination_error(&error))
    }

    /// Options for a plain listing; `query` is ignored.
    pub fn listing(&self) -> Result<QueryOptions, Error> {
        Ok(QueryOptions::page(self.page_request()?))
    }

    /// Options for a search; `query` is required and must hold a word.
    pub fn search(&self) -> Result<QueryOptions, Error> {
        let raw = self
            .query
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| missing_field_error(fields::QUERY))?;
        let terms = SearchTerms::parse(raw).ok_or_else(|| invalid_query_error(raw))?;
        Ok(QueryOptions::search(terms, self.page_request()?))
    }
}

/// Pagination block returned next to collection rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBody {
    /// Pages needed for every matching row.
    pub page_count: u64,
    /// One-based page containing the requested offset.
    pub page: u64,
    /// Requested page size.
    pub page_size: u32,
    /// Rows matching the filter.
    pub total_count: u64,
}

impl From<PageMetadata> for PaginationBody {
    fn from(value: PageMetadata) -> Self {
        Self {
            page_count: value.page_count,
            page: value.page,
            page_size: value.page_size,
            total_count: value.total_count,
        }
    }
}

/// Split a domain page into rows and the response pagination block.
pub(crate) fn into_parts<T>(page: Page<T>) -> (Vec<T>, PaginationBody) {
    (page.items, PaginationBody::from(page.metadata))
}
