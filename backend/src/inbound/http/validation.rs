//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected input becomes `400 invalid_request` with
//! `details: { field, code }` so clients can point at the offending field.

use serde_json::json;

use crate::domain::query::PaginationError;
use crate::domain::{
    DocumentId, DocumentValidationError, Error, LoginValidationError, PasswordValidationError,
    RoleId, RoleValidationError, UserId, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidId,
    InvalidQuery,
    InvalidPagination,
    Field(&'static str),
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidQuery => "invalid_query",
            Self::InvalidPagination => "invalid_pagination",
            Self::Field(code) => code,
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ValidationCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ValidationCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Field names used by the JSON payloads.
pub(crate) mod fields {
    use super::FieldName;

    pub(crate) const ID: FieldName = FieldName::new("id");
    pub(crate) const USERNAME: FieldName = FieldName::new("username");
    pub(crate) const FIRSTNAME: FieldName = FieldName::new("firstname");
    pub(crate) const LASTNAME: FieldName = FieldName::new("lastname");
    pub(crate) const EMAIL: FieldName = FieldName::new("email");
    pub(crate) const PASSWORD: FieldName = FieldName::new("password");
    pub(crate) const ROLE_ID: FieldName = FieldName::new("roleId");
    pub(crate) const TITLE: FieldName = FieldName::new("title");
    pub(crate) const CONTENT: FieldName = FieldName::new("content");
    pub(crate) const QUERY: FieldName = FieldName::new("query");
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ValidationCode::MissingField)
}

/// Unwrap a required payload field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a positive integer"))
        .with_value(ValidationCode::InvalidId, value)
}

fn parse_positive(raw: &str, field: FieldName) -> Result<i32, Error> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_id_error(field, raw))
}

/// Parse a `{id}` path segment into a user id.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    let id = parse_positive(raw, fields::ID)?;
    UserId::new(id).map_err(|_| invalid_id_error(fields::ID, raw))
}

/// Parse a `{id}` path segment into a document id.
pub(crate) fn parse_document_id(raw: &str) -> Result<DocumentId, Error> {
    let id = parse_positive(raw, fields::ID)?;
    DocumentId::new(id).map_err(|_| invalid_id_error(fields::ID, raw))
}

/// Parse a `{id}` path segment into a role id.
pub(crate) fn parse_role_id(raw: &str) -> Result<RoleId, Error> {
    let id = parse_positive(raw, fields::ID)?;
    RoleId::new(id).map_err(|_| invalid_id_error(fields::ID, raw))
}

/// Parse a `roleId` body value.
pub(crate) fn parse_role_field(raw: i32) -> Result<RoleId, Error> {
    RoleId::new(raw).map_err(|_| invalid_id_error(fields::ROLE_ID, &raw.to_string()))
}

pub(crate) fn user_field_error(error: &UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

pub(crate) fn document_field_error(error: &DocumentValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

pub(crate) fn role_field_error(error: &RoleValidationError) -> Error {
    let (field, code) = match error {
        RoleValidationError::InvalidId => (fields::ID, "invalid_id"),
        RoleValidationError::EmptyTitle => (fields::TITLE, "empty"),
        RoleValidationError::InvalidTitle => (fields::TITLE, "invalid_characters"),
        RoleValidationError::TitleTooLong { .. } => (fields::TITLE, "too_long"),
    };
    ValidationError::new(field, error.to_string()).with_code(ValidationCode::Field(code))
}

pub(crate) fn password_field_error(error: &PasswordValidationError) -> Error {
    ValidationError::new(fields::PASSWORD, error.to_string())
        .with_code(ValidationCode::Field(error.code()))
}

pub(crate) fn login_field_error(error: &LoginValidationError) -> Error {
    let field = match error {
        LoginValidationError::EmptyEmail => fields::EMAIL,
        LoginValidationError::EmptyPassword => fields::PASSWORD,
    };
    ValidationError::new(field, error.to_string()).with_code(ValidationCode::Field("empty"))
}

/// Map a rejected `limit` or `offset` onto `400 invalid_request`.
pub(crate) fn pagination_error(error: &PaginationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "value": error.value(),
        "code": ValidationCode::InvalidPagination.as_str(),
    }))
}

pub(crate) fn invalid_query_error(value: &str) -> Error {
    ValidationError::new(fields::QUERY, "query must contain letters or digits")
        .with_value(ValidationCode::InvalidQuery, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("7", Some(7))]
    #[case(" 12 ", Some(12))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    #[case("99999999999", None)]
    fn parses_path_ids(#[case] raw: &str, #[case] expected: Option<i32>) {
        let parsed = parse_document_id(raw).ok().map(DocumentId::get);
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn invalid_ids_name_the_field() {
        let error = parse_user_id("nope").expect_err("invalid id");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "id", "value": "nope", "code": "invalid_id" }))
        );
    }

    #[rstest]
    fn missing_fields_report_missing_field() {
        let error = require::<String>(None, fields::EMAIL).expect_err("missing");
        assert_eq!(error.message(), "missing required field: email");
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "email", "code": "missing_field" }))
        );
    }

    #[rstest]
    fn pagination_errors_keep_the_client_message() {
        let error = PaginationError::InvalidLimit {
            value: "-1".to_owned(),
        };
        let mapped = pagination_error(&error);
        assert_eq!(mapped.message(), "Only positive number is allowed for limit value");
        assert_eq!(
            mapped.details(),
            Some(&json!({ "field": "limit", "value": "-1", "code": "invalid_pagination" }))
        );
    }

    #[rstest]
    #[case(RoleValidationError::EmptyTitle, "empty")]
    #[case(RoleValidationError::TitleTooLong { max: 64 }, "too_long")]
    fn role_errors_point_at_title(#[case] error: RoleValidationError, #[case] code: &str) {
        let mapped = role_field_error(&error);
        assert_eq!(mapped.details(), Some(&json!({ "field": "title", "code": code })));
    }
}
