//! Port implementations over [`InMemoryStore`].

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, QueryResult, RoleRepository, RoleRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::query::{CollectionQuery, DocumentField, UserField};
use crate::domain::{
    DefaultAccount, Document, DocumentChanges, DocumentDraft, DocumentId, NewDocument, NewUser,
    Role, RoleId, RoleTitle, StoredCredentials, User, UserChanges, UserDraft, UserId,
};

use super::store::{InMemoryStore, Tables, UserRecord, paginate};

const USERNAME_TAKEN: &str = "users_username_key";
const EMAIL_TAKEN: &str = "users_email_key";
const UNKNOWN_ROLE: &str = "users_role_id_fkey";
const UNKNOWN_OWNER: &str = "documents_owner_id_fkey";
const TITLE_TAKEN: &str = "roles_title_key";

/// In-memory [`UserRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

/// Name the unique constraint another account already holds, if any.
fn user_conflict(
    tables: &Tables,
    username: &str,
    email: &str,
    except: Option<i32>,
) -> Option<&'static str> {
    let others = tables
        .users
        .iter()
        .filter(|(id, _)| Some(**id) != except)
        .map(|(_, record)| &record.user);
    for other in others {
        if other.username().as_ref() == username {
            return Some(USERNAME_TAKEN);
        }
        if other.email().as_ref() == email {
            return Some(EMAIL_TAKEN);
        }
    }
    None
}

fn build_user(id: UserId, user: &NewUser) -> User {
    let now = Utc::now();
    User::from(UserDraft {
        id,
        username: user.username.clone(),
        firstname: user.firstname.clone(),
        lastname: user.lastname.clone(),
        email: user.email.clone(),
        role_id: user.role_id,
        created_at: now,
        updated_at: now,
    })
}

fn allocated_user_id(raw: i32) -> Result<UserId, UserRepositoryError> {
    UserId::new(raw).map_err(|err| UserRepositoryError::query(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut tables = self.store.lock().await;
        if let Some(constraint) =
            user_conflict(&tables, user.username.as_ref(), user.email.as_ref(), None)
        {
            return Err(UserRepositoryError::unique_violation(constraint));
        }
        if !tables.roles.contains_key(&user.role_id.get()) {
            return Err(UserRepositoryError::foreign_key_violation(UNKNOWN_ROLE));
        }
        let id = allocated_user_id(tables.allocate_user())?;
        let created = build_user(id, user);
        tables.users.insert(
            id.get(),
            UserRecord {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn insert_default_account(
        &self,
        account: &DefaultAccount,
    ) -> Result<bool, UserRepositoryError> {
        let mut tables = self.store.lock().await;
        let id = account.id.get();
        let taken = tables.users.contains_key(&id)
            || user_conflict(
                &tables,
                account.user.username.as_ref(),
                account.user.email.as_ref(),
                None,
            )
            .is_some();
        tables.reserve_user(id);
        if taken {
            return Ok(false);
        }
        if !tables.roles.contains_key(&account.user.role_id.get()) {
            return Err(UserRepositoryError::foreign_key_violation(UNKNOWN_ROLE));
        }
        tables.users.insert(
            id,
            UserRecord {
                user: build_user(account.id, &account.user),
                password_hash: account.user.password_hash.clone(),
            },
        );
        Ok(true)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.store.lock().await;
        Ok(tables.users.get(&id.get()).map(|record| record.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let tables = self.store.lock().await;
        Ok(tables
            .users
            .values()
            .find(|record| record.user.email().as_ref() == email)
            .map(|record| StoredCredentials {
                user: record.user.clone(),
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut tables = self.store.lock().await;
        let Some(existing) = tables.users.get(&id.get()).cloned() else {
            return Ok(None);
        };
        let current = existing.user;
        let draft = UserDraft {
            id,
            username: changes
                .username
                .clone()
                .unwrap_or_else(|| current.username().clone()),
            firstname: changes
                .firstname
                .clone()
                .unwrap_or_else(|| current.firstname().clone()),
            lastname: changes
                .lastname
                .clone()
                .unwrap_or_else(|| current.lastname().clone()),
            email: changes
                .email
                .clone()
                .unwrap_or_else(|| current.email().clone()),
            role_id: changes.role_id.unwrap_or(current.role_id()),
            created_at: current.created_at(),
            updated_at: Utc::now(),
        };
        if let Some(constraint) = user_conflict(
            &tables,
            draft.username.as_ref(),
            draft.email.as_ref(),
            Some(id.get()),
        ) {
            return Err(UserRepositoryError::unique_violation(constraint));
        }
        if !tables.roles.contains_key(&draft.role_id.get()) {
            return Err(UserRepositoryError::foreign_key_violation(UNKNOWN_ROLE));
        }
        let updated = User::from(draft);
        tables.users.insert(
            id.get(),
            UserRecord {
                user: updated.clone(),
                password_hash: changes
                    .password_hash
                    .clone()
                    .unwrap_or(existing.password_hash),
            },
        );
        Ok(Some(updated))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.store.lock().await;
        if tables.users.remove(&id.get()).is_none() {
            return Ok(false);
        }
        tables
            .documents
            .retain(|_, document| document.owner_id() != id);
        Ok(true)
    }

    async fn list(
        &self,
        query: &CollectionQuery<UserField>,
    ) -> Result<QueryResult<User>, UserRepositoryError> {
        let tables = self.store.lock().await;
        let matching = tables
            .users
            .values()
            .map(|record| &record.user)
            .filter(|user| query.predicate.matches(*user))
            .cloned()
            .collect();
        Ok(paginate(matching, &query.page, |user| {
            (user.created_at(), user.id().get())
        }))
    }
}

/// In-memory [`DocumentRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryDocumentRepository {
    store: InMemoryStore,
}

impl InMemoryDocumentRepository {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, document: &NewDocument) -> Result<Document, DocumentRepositoryError> {
        let mut tables = self.store.lock().await;
        if !tables.users.contains_key(&document.owner_id.get()) {
            return Err(DocumentRepositoryError::foreign_key_violation(UNKNOWN_OWNER));
        }
        let id = DocumentId::new(tables.allocate_document())
            .map_err(|err| DocumentRepositoryError::query(err.to_string()))?;
        let now = Utc::now();
        let created = Document::from(DocumentDraft {
            id,
            owner_id: document.owner_id,
            owner_role_id: document.owner_role_id,
            title: document.title.clone(),
            content: document.content.clone(),
            access: document.access,
            created_at: now,
            updated_at: now,
        });
        tables.documents.insert(id.get(), created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let tables = self.store.lock().await;
        Ok(tables.documents.get(&id.get()).cloned())
    }

    async fn update(
        &self,
        id: DocumentId,
        changes: &DocumentChanges,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut tables = self.store.lock().await;
        let Some(current) = tables.documents.get(&id.get()) else {
            return Ok(None);
        };
        let updated = Document::from(DocumentDraft {
            id,
            owner_id: current.owner_id(),
            owner_role_id: current.owner_role_id(),
            title: changes
                .title
                .clone()
                .unwrap_or_else(|| current.title().clone()),
            content: changes
                .content
                .clone()
                .unwrap_or_else(|| current.content().clone()),
            access: changes.access.unwrap_or(current.access()),
            created_at: current.created_at(),
            updated_at: Utc::now(),
        });
        tables.documents.insert(id.get(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: DocumentId) -> Result<bool, DocumentRepositoryError> {
        let mut tables = self.store.lock().await;
        Ok(tables.documents.remove(&id.get()).is_some())
    }

    async fn list(
        &self,
        query: &CollectionQuery<DocumentField>,
    ) -> Result<QueryResult<Document>, DocumentRepositoryError> {
        let tables = self.store.lock().await;
        let matching = tables
            .documents
            .values()
            .filter(|document| query.predicate.matches(*document))
            .cloned()
            .collect();
        Ok(paginate(matching, &query.page, |document| {
            (document.created_at(), document.id().get())
        }))
    }
}

/// In-memory [`RoleRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryRoleRepository {
    store: InMemoryStore,
}

impl InMemoryRoleRepository {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn title_taken(tables: &Tables, title: &RoleTitle, except: Option<i32>) -> bool {
    tables
        .roles
        .iter()
        .any(|(id, role)| Some(*id) != except && role.title() == title)
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create(&self, title: &RoleTitle) -> Result<Role, RoleRepositoryError> {
        let mut tables = self.store.lock().await;
        if title_taken(&tables, title, None) {
            return Err(RoleRepositoryError::unique_violation(TITLE_TAKEN));
        }
        let id = RoleId::new(tables.allocate_role())
            .map_err(|err| RoleRepositoryError::query(err.to_string()))?;
        let now = Utc::now();
        let role = Role::new(id, title.clone(), now, now);
        tables.roles.insert(id.get(), role.clone());
        Ok(role)
    }

    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, RoleRepositoryError> {
        let tables = self.store.lock().await;
        Ok(tables.roles.get(&id.get()).cloned())
    }

    async fn list(&self, page: &PageRequest) -> Result<QueryResult<Role>, RoleRepositoryError> {
        let tables = self.store.lock().await;
        let roles = tables.roles.values().cloned().collect();
        Ok(paginate(roles, page, |role| (role.created_at(), role.id().get())))
    }

    async fn update(
        &self,
        id: RoleId,
        title: &RoleTitle,
    ) -> Result<Option<Role>, RoleRepositoryError> {
        let mut tables = self.store.lock().await;
        if title_taken(&tables, title, Some(id.get())) {
            return Err(RoleRepositoryError::unique_violation(TITLE_TAKEN));
        }
        let Some(current) = tables.roles.get(&id.get()) else {
            return Ok(None);
        };
        let renamed = Role::new(id, title.clone(), current.created_at(), Utc::now());
        tables.roles.insert(id.get(), renamed.clone());
        Ok(Some(renamed))
    }

    async fn delete(&self, id: RoleId) -> Result<bool, RoleRepositoryError> {
        let mut tables = self.store.lock().await;
        if tables
            .users
            .values()
            .any(|record| record.user.role_id() == id)
        {
            return Err(RoleRepositoryError::foreign_key_violation(UNKNOWN_ROLE));
        }
        Ok(tables.roles.remove(&id.get()).is_some())
    }
}
