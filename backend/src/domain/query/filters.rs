//! Turns a requester and query options into collection filters.
//!
//! The document access predicate mirrors
//! [`AuthorizationPolicy::can_read_document`](crate::domain::AuthorizationPolicy::can_read_document)
//! clause for clause, so listing and fetching by id agree on visibility.

use std::num::NonZeroU32;

use pagination::{PageRequest, SortOrder};

use super::predicate::{FieldValue, Predicate, Record};
use super::search::SearchTerms;
use crate::domain::document::{AccessLevel, Document};
use crate::domain::requester::RequesterContext;
use crate::domain::role::RoleRegistry;
use crate::domain::user::{User, UserId};

/// Filterable document columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentField {
    /// `owner_id`.
    OwnerId,
    /// `owner_role_id`.
    OwnerRoleId,
    /// `access`, compared as its lower-case name.
    Access,
    /// `title`.
    Title,
    /// `content`.
    Content,
}

/// Filterable user columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// `id`.
    Id,
    /// `username`.
    Username,
    /// `firstname`.
    Firstname,
    /// `lastname`.
    Lastname,
    /// `email`.
    Email,
    /// `role_id`.
    RoleId,
}

impl Record<DocumentField> for Document {
    fn value(&self, field: DocumentField) -> FieldValue<'_> {
        match field {
            DocumentField::OwnerId => FieldValue::Int(self.owner_id().get()),
            DocumentField::OwnerRoleId => FieldValue::Int(self.owner_role_id().get()),
            DocumentField::Access => FieldValue::Text(self.access().as_str()),
            DocumentField::Title => FieldValue::Text(self.title().as_ref()),
            DocumentField::Content => FieldValue::Text(self.content().as_ref()),
        }
    }
}

impl Record<UserField> for User {
    fn value(&self, field: UserField) -> FieldValue<'_> {
        match field {
            UserField::Id => FieldValue::Int(self.id().get()),
            UserField::Username => FieldValue::Text(self.username().as_ref()),
            UserField::Firstname => FieldValue::Text(self.firstname().as_ref()),
            UserField::Lastname => FieldValue::Text(self.lastname().as_ref()),
            UserField::Email => FieldValue::Text(self.email().as_ref()),
            UserField::RoleId => FieldValue::Int(self.role_id().get()),
        }
    }
}

/// Search terms and paging requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Optional free-text search.
    pub search: Option<SearchTerms>,
    /// Page window and sort direction.
    pub page: PageRequest,
}

impl QueryOptions {
    /// Options without a search.
    #[must_use]
    pub fn page(page: PageRequest) -> Self {
        Self { search: None, page }
    }

    /// Options with a search.
    #[must_use]
    pub fn search(terms: SearchTerms, page: PageRequest) -> Self {
        Self {
            search: Some(terms),
            page,
        }
    }
}

/// A filter plus the page window, ready for a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery<F> {
    /// Rows to include.
    pub predicate: Predicate<F>,
    /// Rows to return, ordered by creation time.
    pub page: PageRequest,
}

/// Builds the canonical filters for document and user collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryPredicateBuilder {
    roles: RoleRegistry,
}

impl QueryPredicateBuilder {
    /// Build with explicit reserved roles.
    #[must_use]
    pub const fn new(roles: RoleRegistry) -> Self {
        Self { roles }
    }

    /// Rows a non-admin may read:
    /// `access = public OR owner_id = me OR (access = role AND owner_role_id = my role)`.
    #[must_use]
    pub fn document_access_predicate(
        &self,
        requester: &RequesterContext,
    ) -> Predicate<DocumentField> {
        Predicate::Or(vec![
            Predicate::eq_text(DocumentField::Access, AccessLevel::Public.as_str()),
            Predicate::eq_int(DocumentField::OwnerId, requester.user_id().get()),
            Predicate::And(vec![
                Predicate::eq_text(DocumentField::Access, AccessLevel::Role.as_str()),
                Predicate::eq_int(DocumentField::OwnerRoleId, requester.role_id().get()),
            ]),
        ])
    }

    /// Filter for the document collection and document search.
    #[must_use]
    pub fn build_document_filter(
        &self,
        requester: &RequesterContext,
        options: &QueryOptions,
    ) -> CollectionQuery<DocumentField> {
        CollectionQuery {
            predicate: self.document_predicate(requester, options.search.as_ref()),
            page: options.page,
        }
    }

    /// Filter for the documents owned by `owner`.
    #[must_use]
    pub fn build_owner_document_filter(
        &self,
        requester: &RequesterContext,
        owner: UserId,
        options: &QueryOptions,
    ) -> CollectionQuery<DocumentField> {
        let visible = self.document_predicate(requester, options.search.as_ref());
        CollectionQuery {
            predicate: Predicate::all([
                Predicate::eq_int(DocumentField::OwnerId, owner.get()),
                visible,
            ]),
            page: options.page,
        }
    }

    /// Filter for the user collection and user search. Non-admins only ever
    /// see their own account.
    #[must_use]
    pub fn build_user_filter(
        &self,
        requester: &RequesterContext,
        options: &QueryOptions,
    ) -> CollectionQuery<UserField> {
        let search = options.search.as_ref().map_or(Predicate::True, |terms| {
            matches_any(
                &[
                    UserField::Username,
                    UserField::Firstname,
                    UserField::Lastname,
                    UserField::Email,
                ],
                terms,
            )
        });
        let predicate = if self.roles.is_admin(requester.role_id()) {
            search
        } else {
            Predicate::all([
                Predicate::eq_int(UserField::Id, requester.user_id().get()),
                search,
            ])
        };
        CollectionQuery {
            predicate,
            page: options.page,
        }
    }

    /// Apply the collection defaults: limit 20, offset 0, newest first.
    #[must_use]
    pub fn normalize_pagination(
        &self,
        limit: Option<NonZeroU32>,
        offset: Option<u32>,
        order: Option<SortOrder>,
    ) -> PageRequest {
        PageRequest::normalize(limit, offset, order)
    }

    fn document_predicate(
        &self,
        requester: &RequesterContext,
        search: Option<&SearchTerms>,
    ) -> Predicate<DocumentField> {
        let search = search.map_or(Predicate::True, |terms| {
            matches_any(&[DocumentField::Title, DocumentField::Content], terms)
        });
        if self.roles.is_admin(requester.role_id()) {
            search
        } else {
            Predicate::all([self.document_access_predicate(requester), search])
        }
    }
}

fn matches_any<F: Copy>(fields: &[F], terms: &SearchTerms) -> Predicate<F> {
    Predicate::any(
        fields
            .iter()
            .map(|field| Predicate::ContainsAny(*field, terms.to_vec())),
    )
}

#[cfg(test)]
#[path = "filters_tests.rs"]
mod tests;
