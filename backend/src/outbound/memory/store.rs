//! Shared tables behind the in-memory repositories.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagination::{PageRequest, SortOrder};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::ports::QueryResult;
use crate::domain::{
    ADMIN_ROLE_TITLE, DefaultAccounts, Document, PasswordHash, REGULAR_ROLE_TITLE, Role,
    RoleRegistry, RoleTitle, User,
};

use super::repositories::{
    InMemoryDocumentRepository, InMemoryRoleRepository, InMemoryUserRepository,
};

/// A stored account and its credential.
#[derive(Debug, Clone)]
pub(super) struct UserRecord {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// Rows keyed by id plus the next serial value for each table.
#[derive(Debug, Default)]
pub(super) struct Tables {
    pub roles: BTreeMap<i32, Role>,
    pub users: BTreeMap<i32, UserRecord>,
    pub documents: BTreeMap<i32, Document>,
    pub next_role: i32,
    pub next_user: i32,
    pub next_document: i32,
}

impl Tables {
    /// Take the next role id.
    pub fn allocate_role(&mut self) -> i32 {
        let id = self.next_role.max(1);
        self.next_role = id + 1;
        id
    }

    /// Take the next user id.
    pub fn allocate_user(&mut self) -> i32 {
        let id = self.next_user.max(1);
        self.next_user = id + 1;
        id
    }

    /// Take the next document id.
    pub fn allocate_document(&mut self) -> i32 {
        let id = self.next_document.max(1);
        self.next_document = id + 1;
        id
    }

    /// Move the user serial past an explicitly chosen id.
    pub fn reserve_user(&mut self, id: i32) {
        self.next_user = self.next_user.max(id + 1);
    }
}

/// Process-local storage for roles, users and documents.
///
/// Cloning shares the same tables. A new store already holds the two
/// reserved roles and keeps the default account ids out of the user serial,
/// as the first database migration does.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(RoleRegistry::default())
    }
}

impl InMemoryStore {
    /// Create a store seeded with the reserved roles.
    #[must_use]
    pub fn new(registry: RoleRegistry) -> Self {
        let mut tables = Tables::default();
        let now = Utc::now();
        for (id, title) in [
            (registry.admin(), ADMIN_ROLE_TITLE),
            (registry.regular(), REGULAR_ROLE_TITLE),
        ] {
            if let Ok(title) = RoleTitle::new(title) {
                tables
                    .roles
                    .insert(id.get(), Role::new(id, title, now, now));
                tables.next_role = tables.next_role.max(id.get() + 1);
            }
        }
        let accounts = DefaultAccounts::default();
        tables.reserve_user(accounts.admin().get());
        tables.reserve_user(accounts.regular().get());
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// User repository over this store.
    #[must_use]
    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.clone())
    }

    /// Document repository over this store.
    #[must_use]
    pub fn documents(&self) -> InMemoryDocumentRepository {
        InMemoryDocumentRepository::new(self.clone())
    }

    /// Role repository over this store.
    #[must_use]
    pub fn roles(&self) -> InMemoryRoleRepository {
        InMemoryRoleRepository::new(self.clone())
    }

    pub(super) async fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }
}

/// Order rows by creation time (ties broken by id) and cut out one page.
pub(super) fn paginate<T>(
    mut rows: Vec<T>,
    page: &PageRequest,
    key: impl Fn(&T) -> (DateTime<Utc>, i32),
) -> QueryResult<T> {
    rows.sort_by_key(|row| key(row));
    if page.order() == SortOrder::Desc {
        rows.reverse();
    }
    let total = u64::try_from(rows.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    QueryResult {
        rows: rows.into_iter().skip(offset).take(limit).collect(),
        total,
    }
}
