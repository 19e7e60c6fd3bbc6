//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::SortOrder;

use crate::domain::ports::{QueryResult, UserRepository, UserRepositoryError};
use crate::domain::query::{CollectionQuery, UserField};
use crate::domain::{
    DefaultAccount, EmailAddress, NewUser, PasswordHash, PersonName, RoleId, StoredCredentials,
    User, UserChanges, UserDraft, UserId, Username,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CredentialsRow, NewUserRow, SeededUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::predicate_sql::user_condition;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn invalid_row(error: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::query(format!("stored user is invalid: {error}"))
}

/// Convert a database row to a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    Ok(User::from(UserDraft {
        id: UserId::new(row.id).map_err(invalid_row)?,
        username: Username::new(row.username).map_err(invalid_row)?,
        firstname: PersonName::first(row.firstname).map_err(invalid_row)?,
        lastname: PersonName::last(row.lastname).map_err(invalid_row)?,
        email: EmailAddress::new(row.email).map_err(invalid_row)?,
        role_id: RoleId::new(row.role_id).map_err(invalid_row)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn new_user_row(user: &NewUser) -> NewUserRow<'_> {
    NewUserRow {
        username: user.username.as_ref(),
        firstname: user.firstname.as_ref(),
        lastname: user.lastname.as_ref(),
        email: user.email.as_ref(),
        password_hash: user.password_hash.as_str(),
        role_id: user.role_id.get(),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_user_row(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn insert_default_account(
        &self,
        account: &DefaultAccount,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = SeededUserRow {
            id: account.id.get(),
            user: new_user_row(&account.user),
        };
        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Explicit ids bypass the serial; keep it past them and the reserved ids.
        diesel::sql_query(
            "SELECT setval(pg_get_serial_sequence('users', 'id'), \
             GREATEST((SELECT MAX(id) FROM users), (SELECT last_value FROM users_id_seq), 2))",
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(inserted > 0)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CredentialsRow> = users::table
            .filter(users::email.eq(email))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|credentials| {
            Ok(StoredCredentials {
                user: row_to_user(credentials.user)?,
                password_hash: PasswordHash::new(credentials.password_hash),
            })
        })
        .transpose()
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserChangeset {
            username: changes.username.as_ref().map(|value| value.as_ref()),
            firstname: changes.firstname.as_ref().map(|value| value.as_ref()),
            lastname: changes.lastname.as_ref().map(|value| value.as_ref()),
            email: changes.email.as_ref().map(|value| value.as_ref()),
            password_hash: changes.password_hash.as_ref().map(PasswordHash::as_str),
            role_id: changes.role_id.map(RoleId::get),
            updated_at: Utc::now(),
        };
        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Documents follow through `ON DELETE CASCADE`.
        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn list(
        &self,
        query: &CollectionQuery<UserField>,
    ) -> Result<QueryResult<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = users::table
            .filter(user_condition(&query.predicate))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let page = users::table
            .filter(user_condition(&query.predicate))
            .select(UserRow::as_select())
            .into_boxed();
        let page = match query.page.order() {
            SortOrder::Asc => page.order((users::created_at.asc(), users::id.asc())),
            SortOrder::Desc => page.order((users::created_at.desc(), users::id.desc())),
        };
        let rows: Vec<UserRow> = page
            .limit(i64::from(query.page.limit()))
            .offset(i64::from(query.page.offset()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(QueryResult {
            rows: rows.into_iter().map(row_to_user).collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
