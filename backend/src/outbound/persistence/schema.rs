//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Roles users can hold. Ids 1 and 2 are seeded by the first migration.
    roles (id) {
        /// Serial primary key.
        id -> Int4,
        /// Unique role name.
        title -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User accounts.
    users (id) {
        /// Serial primary key.
        id -> Int4,
        /// Unique login handle.
        username -> Varchar,
        /// First name.
        firstname -> Varchar,
        /// Last name.
        lastname -> Varchar,
        /// Unique email address used for login.
        email -> Varchar,
        /// PHC-formatted Argon2 hash.
        password_hash -> Text,
        /// Assigned role (restricts role deletion).
        role_id -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Documents; rows are removed with their owner.
    documents (id) {
        /// Serial primary key.
        id -> Int4,
        /// Owning user.
        owner_id -> Int4,
        /// Owner's role when the document was created.
        owner_role_id -> Int4,
        /// Title.
        title -> Varchar,
        /// Body.
        content -> Text,
        /// `public`, `private`, or `role`.
        access -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(users -> roles (role_id));
diesel::joinable!(documents -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(roles, users, documents);
