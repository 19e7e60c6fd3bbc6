//! Tests for the document service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockDocumentRepository, MockUserRepository, QueryResult};
use crate::domain::query::{DocumentField, Predicate, SearchTerms};
use crate::domain::{
    AccessLevel, DocumentContent, DocumentDraft, DocumentTitle, EmailAddress, ErrorCode,
    PersonName, RoleId, User, UserDraft, Username,
};
use chrono::Utc;
use pagination::PageRequest;
use rstest::rstest;

fn requester(user: i32, role: i32) -> RequesterContext {
    RequesterContext::new(
        UserId::new(user).expect("valid user id"),
        RoleId::new(role).expect("valid role id"),
    )
}

fn document(owner: i32, owner_role: i32, access: AccessLevel) -> Document {
    let now = Utc::now();
    Document::from(DocumentDraft {
        id: DocumentId::new(12).expect("valid id"),
        owner_id: UserId::new(owner).expect("valid owner"),
        owner_role_id: RoleId::new(owner_role).expect("valid role"),
        title: DocumentTitle::new("Plans").expect("valid title"),
        content: DocumentContent::new("World domination").expect("valid content"),
        access,
        created_at: now,
        updated_at: now,
    })
}

fn owner(id: i32, role: i32) -> User {
    let now = Utc::now();
    User::from(UserDraft {
        id: UserId::new(id).expect("valid id"),
        username: Username::new("owner").expect("valid username"),
        firstname: PersonName::first("Olive").expect("valid name"),
        lastname: PersonName::last("Owner").expect("valid name"),
        email: EmailAddress::new("owner@example.com").expect("valid email"),
        role_id: RoleId::new(role).expect("valid role"),
        created_at: now,
        updated_at: now,
    })
}

fn make_service(
    documents: MockDocumentRepository,
    users: MockUserRepository,
) -> DocumentService<MockDocumentRepository, MockUserRepository> {
    DocumentService::new(
        Arc::new(documents),
        Arc::new(users),
        AuthorizationPolicy::default(),
    )
}

fn doc_id() -> DocumentId {
    DocumentId::new(12).expect("valid id")
}

#[rstest]
#[tokio::test]
async fn create_snapshots_owner_role_and_defaults_to_public() {
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_create()
        .withf(|new_doc| {
            new_doc.owner_id.get() == 5
                && new_doc.owner_role_id.get() == 3
                && new_doc.access == AccessLevel::Public
        })
        .times(1)
        .returning(|_| Ok(document(5, 3, AccessLevel::Public)));

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .returning(|id| Ok(Some(owner(id.get(), 3))));
    let service = make_service(documents, users);
    let submission = DocumentSubmission {
        title: DocumentTitle::new("Plans").expect("valid title"),
        content: DocumentContent::new("World domination").expect("valid content"),
        access: None,
    };
    let created = service
        .create_document(&requester(5, 3), submission)
        .await
        .expect("create succeeds");
    assert_eq!(created.owner_role_id().get(), 3);
}

#[rstest]
#[tokio::test]
async fn create_snapshots_the_stored_role_over_a_stale_session() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .returning(|id| Ok(Some(owner(id.get(), 4))));
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_create()
        .withf(|new_doc| new_doc.owner_role_id.get() == 4)
        .times(1)
        .returning(|_| Ok(document(5, 4, AccessLevel::Role)));

    let service = make_service(documents, users);
    let submission = DocumentSubmission {
        title: DocumentTitle::new("Plans").expect("valid title"),
        content: DocumentContent::new("World domination").expect("valid content"),
        access: Some(AccessLevel::Role),
    };
    let created = service
        .create_document(&requester(5, 2), submission)
        .await
        .expect("create succeeds");
    assert_eq!(created.owner_role_id().get(), 4);
}

#[rstest]
#[tokio::test]
async fn create_rejects_a_deleted_requester() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).returning(|_| Ok(None));
    let mut documents = MockDocumentRepository::new();
    documents.expect_create().never();

    let service = make_service(documents, users);
    let submission = DocumentSubmission {
        title: DocumentTitle::new("Plans").expect("valid title"),
        content: DocumentContent::new("World domination").expect("valid content"),
        access: None,
    };
    let error = service
        .create_document(&requester(5, 2), submission)
        .await
        .expect_err("owner gone");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case::private_stranger(9, 2, AccessLevel::Private, Some(ErrorCode::Unauthorized))]
#[case::other_role(9, 3, AccessLevel::Role, Some(ErrorCode::Unauthorized))]
#[case::same_role(9, 2, AccessLevel::Role, None)]
#[case::public(9, 4, AccessLevel::Public, None)]
#[case::admin_private(1, 1, AccessLevel::Private, None)]
#[tokio::test]
async fn get_document_applies_read_policy(
    #[case] user: i32,
    #[case] role: i32,
    #[case] access: AccessLevel,
    #[case] expected_error: Option<ErrorCode>,
) {
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_find_by_id()
        .times(1)
        .returning(move |_| Ok(Some(document(5, 2, access))));

    let service = make_service(documents, MockUserRepository::new());
    let result = service.get_document(&requester(user, role), doc_id()).await;
    assert_eq!(result.err().map(|error| error.code()), expected_error);
}

#[rstest]
#[tokio::test]
async fn missing_document_is_not_found() {
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_find_by_id()
        .times(1)
        .returning(|_| Ok(None));

    let service = make_service(documents, MockUserRepository::new());
    let error = service
        .delete_document(&requester(1, 1), doc_id())
        .await
        .expect_err("missing document");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn readers_cannot_update_public_documents() {
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_find_by_id()
        .times(1)
        .returning(|_| Ok(Some(document(5, 2, AccessLevel::Public))));
    documents.expect_update().never();

    let service = make_service(documents, MockUserRepository::new());
    let changes = DocumentChanges {
        title: Some(DocumentTitle::new("Hijacked").expect("valid title")),
        ..DocumentChanges::default()
    };
    let error = service
        .update_document(&requester(9, 2), doc_id(), changes)
        .await
        .expect_err("update denied");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn owner_updates_access_level() {
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_find_by_id()
        .times(1)
        .returning(|_| Ok(Some(document(5, 2, AccessLevel::Public))));
    documents
        .expect_update()
        .withf(|_, changes| changes.access == Some(AccessLevel::Private))
        .times(1)
        .returning(|_, _| Ok(Some(document(5, 2, AccessLevel::Private))));

    let service = make_service(documents, MockUserRepository::new());
    let changes = DocumentChanges {
        access: Some(AccessLevel::Private),
        ..DocumentChanges::default()
    };
    let updated = service
        .update_document(&requester(5, 2), doc_id(), changes)
        .await
        .expect("owner update");
    assert_eq!(updated.access(), AccessLevel::Private);
}

#[rstest]
#[tokio::test]
async fn admin_deletes_any_document() {
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_find_by_id()
        .times(1)
        .returning(|_| Ok(Some(document(5, 2, AccessLevel::Private))));
    documents.expect_delete().times(1).returning(|_| Ok(true));

    let service = make_service(documents, MockUserRepository::new());
    service
        .delete_document(&requester(1, 1), doc_id())
        .await
        .expect("admin delete");
}

#[rstest]
#[tokio::test]
async fn listing_passes_the_access_predicate_and_paginates() {
    let requester = requester(9, 2);
    let expected = Predicate::all([
        QueryPredicateBuilder::default().document_access_predicate(&requester),
        Predicate::any([
            Predicate::ContainsAny(DocumentField::Title, vec!["andela".to_owned()]),
            Predicate::ContainsAny(DocumentField::Content, vec!["andela".to_owned()]),
        ]),
    ]);
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_list()
        .withf(move |query| query.predicate == expected && query.page.limit() == 2)
        .times(1)
        .returning(|_| {
            Ok(QueryResult {
                rows: vec![document(5, 2, AccessLevel::Public)],
                total: 5,
            })
        });

    let service = make_service(documents, MockUserRepository::new());
    let page_request = PageRequest::parse(Some("2"), Some("2"), None).expect("valid page");
    let options = QueryOptions::search(
        SearchTerms::parse("Andela").expect("terms"),
        page_request,
    );
    let page = service
        .list_documents(&requester, &options)
        .await
        .expect("list succeeds");
    assert_eq!(page.metadata.page_count, 3);
    assert_eq!(page.metadata.page, 2);
    assert_eq!(page.metadata.total_count, 5);
}

#[rstest]
#[tokio::test]
async fn owner_listing_requires_existing_owner() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).returning(|_| Ok(None));
    let mut documents = MockDocumentRepository::new();
    documents.expect_list().never();

    let service = make_service(documents, users);
    let error = service
        .list_user_documents(
            &requester(9, 2),
            UserId::new(5).expect("valid id"),
            &QueryOptions::default(),
        )
        .await
        .expect_err("missing owner");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn owner_listing_scopes_to_owner() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .returning(|id| Ok(Some(owner(id.get(), 2))));
    let mut documents = MockDocumentRepository::new();
    documents
        .expect_list()
        .withf(|query| query.predicate == Predicate::eq_int(DocumentField::OwnerId, 5))
        .times(1)
        .returning(|_| {
            Ok(QueryResult {
                rows: Vec::new(),
                total: 0,
            })
        });

    let service = make_service(documents, users);
    let page = service
        .list_user_documents(
            &requester(1, 1),
            UserId::new(5).expect("valid id"),
            &QueryOptions::default(),
        )
        .await
        .expect("owner listing");
    assert!(page.items.is_empty());
    assert_eq!(page.metadata.page_count, 0);
}
