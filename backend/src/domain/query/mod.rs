//! Collection filters: the predicate language, search tokenisation, and the
//! builder that derives authorised filters from a requester.

mod filters;
mod predicate;
mod search;

pub use filters::{
    CollectionQuery, DocumentField, QueryOptions, QueryPredicateBuilder, UserField,
};
pub use pagination::{PageMetadata, PageRequest, PaginationError, SortOrder};
pub use predicate::{FieldValue, Literal, Predicate, Record};
pub use search::SearchTerms;

/// One page of a collection plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows in the page.
    pub items: Vec<T>,
    /// Totals computed over the whole filtered collection.
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    /// Assemble a page from rows and the unpaged total.
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            metadata: request.metadata(total),
        }
    }
}
