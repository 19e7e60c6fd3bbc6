//! Behaviour of the in-memory repositories.

use pagination::{PageRequest, SortOrder};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, RoleRepository, RoleRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::query::{QueryOptions, QueryPredicateBuilder, SearchTerms};
use crate::domain::{
    AccessLevel, DefaultAccount, DocumentChanges, DocumentContent, DocumentTitle, EmailAddress,
    NewDocument, NewUser, PasswordHash, PersonName, RequesterContext, RoleId, RoleTitle,
    UserChanges, UserId, Username,
};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

fn new_user(name: &str, role: i32) -> NewUser {
    NewUser {
        username: Username::new(name).expect("valid username"),
        firstname: PersonName::first("Test").expect("valid name"),
        lastname: PersonName::last("User").expect("valid name"),
        email: EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        role_id: RoleId::new(role).expect("valid role"),
        password_hash: PasswordHash::new(format!("hash-{name}")),
    }
}

fn new_document(owner: UserId, role: RoleId, title: &str, access: AccessLevel) -> NewDocument {
    NewDocument {
        owner_id: owner,
        owner_role_id: role,
        title: DocumentTitle::new(title).expect("valid title"),
        content: DocumentContent::new("Body text").expect("valid content"),
        access,
    }
}

fn role_id(raw: i32) -> RoleId {
    RoleId::new(raw).expect("valid role")
}

#[rstest]
#[tokio::test]
async fn reserved_roles_are_seeded(store: InMemoryStore) {
    let roles = store.roles();
    let admin = roles.find_by_id(role_id(1)).await.expect("lookup");
    let regular = roles.find_by_id(role_id(2)).await.expect("lookup");

    assert_eq!(admin.map(|role| role.title().as_ref().to_owned()).as_deref(), Some("admin"));
    assert_eq!(
        regular.map(|role| role.title().as_ref().to_owned()).as_deref(),
        Some("regular")
    );

    let created = roles
        .create(&RoleTitle::new("editor").expect("valid title"))
        .await
        .expect("create role");
    assert_eq!(created.id().get(), 3);
}

#[rstest]
#[tokio::test]
async fn duplicate_usernames_and_emails_are_rejected(store: InMemoryStore) {
    let users = store.users();
    users.create(&new_user("ada", 2)).await.expect("first insert");

    let same_name = users.create(&new_user("ada", 2)).await.expect_err("duplicate");
    assert_eq!(same_name, UserRepositoryError::unique_violation("users_username_key"));

    let mut same_email = new_user("grace", 2);
    same_email.email = EmailAddress::new("ada@example.com").expect("valid email");
    let error = users.create(&same_email).await.expect_err("duplicate email");
    assert_eq!(error, UserRepositoryError::unique_violation("users_email_key"));
}

#[rstest]
#[tokio::test]
async fn unknown_roles_violate_the_foreign_key(store: InMemoryStore) {
    let error = store
        .users()
        .create(&new_user("ada", 42))
        .await
        .expect_err("unknown role");
    assert!(matches!(error, UserRepositoryError::ForeignKeyViolation { .. }));
}

#[rstest]
#[tokio::test]
async fn default_accounts_insert_once_and_advance_the_serial(store: InMemoryStore) {
    let users = store.users();
    let account = DefaultAccount {
        id: UserId::new(2).expect("valid id"),
        user: new_user("regular", 2),
    };

    assert!(users.insert_default_account(&account).await.expect("insert"));
    assert!(!users.insert_default_account(&account).await.expect("repeat"));

    let next = users.create(&new_user("ada", 2)).await.expect("create");
    assert_eq!(next.id().get(), 3);
}

#[rstest]
#[tokio::test]
async fn unseeded_signups_skip_the_default_account_ids(store: InMemoryStore) {
    let users = store.users();
    let first = users.create(&new_user("ada", 2)).await.expect("create");
    assert_eq!(first.id().get(), 3);

    let admin = DefaultAccount {
        id: UserId::new(1).expect("valid id"),
        user: new_user("admin", 1),
    };
    assert!(users.insert_default_account(&admin).await.expect("late seed"));
}

#[rstest]
#[tokio::test]
async fn updates_keep_the_password_unless_replaced(store: InMemoryStore) {
    let users = store.users();
    let created = users.create(&new_user("ada", 2)).await.expect("create");
    let changes = UserChanges {
        firstname: Some(PersonName::first("Augusta").expect("valid name")),
        ..UserChanges::default()
    };

    let updated = users
        .update(created.id(), &changes)
        .await
        .expect("update")
        .expect("user exists");
    assert_eq!(updated.firstname().as_ref(), "Augusta");

    let credentials = users
        .find_credentials_by_email("ada@example.com")
        .await
        .expect("lookup")
        .expect("credentials");
    assert_eq!(credentials.password_hash.as_str(), "hash-ada");
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_removes_their_documents(store: InMemoryStore) {
    let users = store.users();
    let documents = store.documents();
    let owner = users.create(&new_user("ada", 2)).await.expect("create");
    let document = documents
        .create(&new_document(owner.id(), owner.role_id(), "Notes", AccessLevel::Private))
        .await
        .expect("create document");

    assert!(users.delete(owner.id()).await.expect("delete"));
    assert!(documents.find_by_id(document.id()).await.expect("lookup").is_none());
    assert!(!users.delete(owner.id()).await.expect("second delete"));
}

#[rstest]
#[tokio::test]
async fn documents_require_an_existing_owner(store: InMemoryStore) {
    let error = store
        .documents()
        .create(&new_document(
            UserId::new(99).expect("valid id"),
            role_id(2),
            "Orphan",
            AccessLevel::Public,
        ))
        .await
        .expect_err("missing owner");
    assert!(matches!(error, DocumentRepositoryError::ForeignKeyViolation { .. }));
}

#[rstest]
#[tokio::test]
async fn roles_in_use_cannot_be_deleted(store: InMemoryStore) {
    let roles = store.roles();
    let editor = roles
        .create(&RoleTitle::new("editor").expect("valid title"))
        .await
        .expect("create role");
    let user = store
        .users()
        .create(&new_user("ada", editor.id().get()))
        .await
        .expect("create user");

    let error = roles.delete(editor.id()).await.expect_err("in use");
    assert!(matches!(error, RoleRepositoryError::ForeignKeyViolation { .. }));

    store.users().delete(user.id()).await.expect("delete user");
    assert!(roles.delete(editor.id()).await.expect("delete role"));
}

#[rstest]
#[tokio::test]
async fn duplicate_role_titles_conflict(store: InMemoryStore) {
    let error = store
        .roles()
        .update(role_id(2), &RoleTitle::new("admin").expect("valid title"))
        .await
        .expect_err("taken");
    assert_eq!(error, RoleRepositoryError::unique_violation("roles_title_key"));
}

#[rstest]
#[tokio::test]
async fn document_updates_touch_only_given_fields(store: InMemoryStore) {
    let owner = store.users().create(&new_user("ada", 2)).await.expect("create");
    let documents = store.documents();
    let created = documents
        .create(&new_document(owner.id(), owner.role_id(), "Draft", AccessLevel::Public))
        .await
        .expect("create document");

    let updated = documents
        .update(
            created.id(),
            &DocumentChanges {
                access: Some(AccessLevel::Role),
                ..DocumentChanges::default()
            },
        )
        .await
        .expect("update")
        .expect("exists");

    assert_eq!(updated.access(), AccessLevel::Role);
    assert_eq!(updated.title(), created.title());
    assert_eq!(updated.created_at(), created.created_at());
}

#[rstest]
#[tokio::test]
async fn listing_applies_visibility_search_and_paging(store: InMemoryStore) {
    let users = store.users();
    let documents = store.documents();
    let alice = users.create(&new_user("alice", 2)).await.expect("create");
    let bob = users.create(&new_user("bob", 2)).await.expect("create");
    for (owner, title, access) in [
        (&alice, "Andela public", AccessLevel::Public),
        (&alice, "Andela private", AccessLevel::Private),
        (&bob, "Andela private", AccessLevel::Private),
        (&bob, "Andela role", AccessLevel::Role),
        (&bob, "Unrelated", AccessLevel::Public),
    ] {
        documents
            .create(&new_document(owner.id(), owner.role_id(), title, access))
            .await
            .expect("create document");
    }

    let requester = RequesterContext::new(alice.id(), alice.role_id());
    let page = PageRequest::normalize(None, None, Some(SortOrder::Asc));
    let options = QueryOptions::search(SearchTerms::parse("andela").expect("terms"), page);
    let query = QueryPredicateBuilder::default().build_document_filter(&requester, &options);

    let result = documents.list(&query).await.expect("list");
    let ids: Vec<i32> = result.rows.iter().map(|doc| doc.id().get()).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert_eq!(result.total, 3);

    let second = PageRequest::parse(Some("1"), Some("1"), Some("ASC")).expect("page");
    let windowed = documents
        .list(&QueryPredicateBuilder::default().build_document_filter(
            &requester,
            &QueryOptions::page(second),
        ))
        .await
        .expect("list");
    assert_eq!(windowed.total, 4);
    assert_eq!(windowed.rows.len(), 1);
    assert_eq!(windowed.rows.first().map(|doc| doc.id().get()), Some(2));
}

#[rstest]
#[tokio::test]
async fn newest_first_is_the_default_order(store: InMemoryStore) {
    let users = store.users();
    for name in ["ada", "grace", "linus"] {
        users.create(&new_user(name, 2)).await.expect("create");
    }
    let requester = RequesterContext::new(UserId::new(1).expect("valid id"), role_id(1));
    let query = QueryPredicateBuilder::default()
        .build_user_filter(&requester, &QueryOptions::default());

    let result = users.list(&query).await.expect("list");
    let ids: Vec<i32> = result.rows.iter().map(|user| user.id().get()).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}
