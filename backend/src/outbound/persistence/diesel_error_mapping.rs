//! Shared Diesel error mapping for every repository port.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{DocumentRepositoryError, RoleRepositoryError, UserRepositoryError};

use super::pool::PoolError;

/// Constructors a repository error type offers to the shared mappers.
///
/// Ports without a dedicated constraint variant report constraint failures
/// as query errors.
pub(crate) trait RepositoryErrorKind: Sized {
    fn from_connection(message: String) -> Self;
    fn from_query(message: String) -> Self;
    fn from_unique_violation(message: String) -> Self {
        Self::from_query(message)
    }
    fn from_foreign_key_violation(message: String) -> Self {
        Self::from_query(message)
    }
}

impl RepositoryErrorKind for UserRepositoryError {
    fn from_connection(message: String) -> Self {
        Self::connection(message)
    }
    fn from_query(message: String) -> Self {
        Self::query(message)
    }
    fn from_unique_violation(message: String) -> Self {
        Self::unique_violation(message)
    }
    fn from_foreign_key_violation(message: String) -> Self {
        Self::foreign_key_violation(message)
    }
}

impl RepositoryErrorKind for DocumentRepositoryError {
    fn from_connection(message: String) -> Self {
        Self::connection(message)
    }
    fn from_query(message: String) -> Self {
        Self::query(message)
    }
    fn from_foreign_key_violation(message: String) -> Self {
        Self::foreign_key_violation(message)
    }
}

impl RepositoryErrorKind for RoleRepositoryError {
    fn from_connection(message: String) -> Self {
        Self::connection(message)
    }
    fn from_query(message: String) -> Self {
        Self::query(message)
    }
    fn from_unique_violation(message: String) -> Self {
        Self::unique_violation(message)
    }
    fn from_foreign_key_violation(message: String) -> Self {
        Self::foreign_key_violation(message)
    }
}

/// Map pool errors into the repository's connection variant.
pub(crate) fn map_pool_error<E: RepositoryErrorKind>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::from_connection(message)
}

/// Map Diesel failures, keeping constraint names for unique and foreign-key
/// violations.
pub(crate) fn map_diesel_error<E: RepositoryErrorKind>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::from_query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::from_query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::from_connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            E::from_unique_violation(constraint_or(info.constraint_name(), "unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            E::from_foreign_key_violation(constraint_or(
                info.constraint_name(),
                "foreign key constraint",
            ))
        }
        _ => E::from_query("database error".to_owned()),
    }
}

fn constraint_or(name: Option<&str>, fallback: &str) -> String {
    name.unwrap_or(fallback).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct Info {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(Info {
                message: "constraint failed",
                constraint,
            }),
        )
    }

    #[rstest]
    fn unique_violations_keep_constraint_name() {
        let error: UserRepositoryError = map_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("users_email_key"),
        ));
        assert_eq!(error, UserRepositoryError::unique_violation("users_email_key"));
    }

    #[rstest]
    fn foreign_key_violations_map_for_roles() {
        let error: RoleRepositoryError = map_diesel_error(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            None,
        ));
        assert_eq!(
            error,
            RoleRepositoryError::foreign_key_violation("foreign key constraint")
        );
    }

    #[rstest]
    fn documents_report_unique_violations_as_query_errors() {
        let error: DocumentRepositoryError =
            map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation, None));
        assert!(matches!(error, DocumentRepositoryError::Query { .. }));
    }

    #[rstest]
    fn closed_connections_are_connection_errors() {
        let error: RoleRepositoryError =
            map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(error, RoleRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let error: UserRepositoryError = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, UserRepositoryError::connection("timed out"));
    }
}
