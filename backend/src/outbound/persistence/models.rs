//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{documents, roles, users};

/// Row struct for reading from the roles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new roles.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = roles)]
pub(crate) struct NewRoleRow<'a> {
    pub title: &'a str,
}

/// Changeset for renaming a role.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = roles)]
pub(crate) struct RoleTitleUpdate<'a> {
    pub title: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Public user columns. The password hash is only read through
/// [`CredentialsRow`].
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User columns plus the password hash, for login.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

/// Insertable struct for new users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role_id: i32,
}

/// Insertable struct for seeded users with a reserved id.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct SeededUserRow<'a> {
    pub id: i32,
    #[diesel(embed)]
    pub user: NewUserRow<'a>,
}

/// Changeset for partial user updates; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub username: Option<&'a str>,
    pub firstname: Option<&'a str>,
    pub lastname: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role_id: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: i32,
    pub owner_id: i32,
    pub owner_role_id: i32,
    pub title: String,
    pub content: String,
    pub access: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub owner_id: i32,
    pub owner_role_id: i32,
    pub title: &'a str,
    pub content: &'a str,
    pub access: &'a str,
}

/// Changeset for partial document updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = documents)]
pub(crate) struct DocumentChangeset<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub access: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
