//! Tests for HTTP error mapping.

use std::collections::HashMap;

use super::*;
use actix_web::body::to_bytes;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

async fn body_of(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body()).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
#[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
#[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn every_code_has_a_status(#[case] code: ErrorCode, #[case] status: StatusCode) {
    assert_eq!(status_for(code), status);
    assert_eq!(Error::new(code, "x").status_code(), status);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_details_and_trace() {
    let error = Error::conflict("email already registered")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "field": "email", "code": "duplicate_email" }));

    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    let body = body_of(response).await;
    assert_eq!(body["message"], "email already registered");
    assert_eq!(body["details"]["code"], "duplicate_email");
    assert_eq!(body["traceId"], TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("relation \"documents\" does not exist")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "sql": "select 1" }));

    let body = body_of(error.error_response()).await;
    assert_eq!(body["message"], INTERNAL_MESSAGE);
    assert_eq!(body["traceId"], TRACE_ID);
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn responses_without_trace_omit_the_header() {
    let response = Error::not_found("document not found").error_response();
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    assert_eq!(body_of(response).await["code"], "not_found");
}

#[rstest]
fn actix_errors_become_opaque_internal_errors() {
    let error: Error = actix_web::error::ErrorBadRequest("stack detail").into();
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), INTERNAL_MESSAGE);
    assert!(error.details().is_none());
}

#[rstest]
#[case::content_type(JsonPayloadError::ContentType, "unsupported_content_type")]
#[case::overflow(JsonPayloadError::Overflow { limit: 16 }, "payload_too_large")]
#[case::syntax(
    JsonPayloadError::Deserialize(
        serde_json::from_str::<Value>("{").expect_err("truncated json")
    ),
    "invalid_json"
)]
#[actix_web::test]
async fn rejected_json_bodies_are_bad_requests(
    #[case] rejection: JsonPayloadError,
    #[case] code: &str,
) {
    let req = TestRequest::default().to_http_request();
    let response = json_error_handler(rejection, &req).error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_of(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn rejected_query_strings_are_bad_requests() {
    let req = TestRequest::default().to_http_request();
    let rejection = actix_web::web::Query::<HashMap<String, u32>>::from_query("limit=ten")
        .map(|_| ())
        .expect_err("non-numeric limit");
    let response = query_error_handler(rejection, &req).error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_of(response).await["details"]["code"], "invalid_query");
}
