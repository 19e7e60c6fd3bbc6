//! Handler tests for the users API over in-memory repositories.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{
    ADMIN_EMAIL, ADMIN_PASSWORD, REGULAR_EMAIL, REGULAR_PASSWORD, init_api, init_unseeded_api,
    login, seed_default_accounts, session_cookie,
};

fn signup_body(username: &str, role_id: Option<i32>) -> Value {
    let mut body = json!({
        "username": username,
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": format!("{username}@example.com"),
        "password": "correct horse",
    });
    if let Some(role) = role_id {
        body["roleId"] = json!(role);
    }
    body
}

#[derive(Debug)]
struct ValidationExpectation<'a> {
    field: &'a str,
    code: &'a str,
}

#[rstest]
#[actix_web::test]
async fn signup_creates_a_regular_account_and_logs_in() {
    let (app, _store) = init_api().await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(signup_body("ada", None))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res).expect("signup starts a session");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "success");
    assert_eq!(body["user"]["roleId"], 2);
    assert_eq!(body["user"]["id"], 3);
    assert!(body["user"].get("password").is_none());

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(listed).await;
    assert_eq!(body["users"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["users"][0]["username"], "ada");
    assert_eq!(body["pagination"]["totalCount"], 1);
}

#[rstest]
#[actix_web::test]
async fn anonymous_admin_signup_is_forbidden() {
    let (app, _store) = init_api().await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(signup_body("mallory", Some(1)))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_conflicts() {
    let (app, _store) = init_api().await;
    let mut body = signup_body("copycat", None);
    body["email"] = json!(REGULAR_EMAIL);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case("email", ValidationExpectation { field: "email", code: "missing_field" })]
#[case("password", ValidationExpectation { field: "password", code: "missing_field" })]
#[actix_web::test]
async fn signup_reports_missing_fields(
    #[case] removed: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let (app, _store) = init_api().await;
    let mut body = signup_body("grace", None);
    body.as_object_mut().expect("object").remove(removed);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], expected.field);
    assert_eq!(value["details"]["code"], expected.code);
}

#[rstest]
#[case::wrong_password(ADMIN_EMAIL, "not-the-password")]
#[case::unknown_email("ghost@example.com", ADMIN_PASSWORD)]
#[actix_web::test]
async fn login_failures_look_the_same(#[case] email: &str, #[case] password: &str) {
    let (app, _store) = init_api().await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["message"], "user verification failed");
}

#[rstest]
#[actix_web::test]
async fn blank_login_email_is_invalid() {
    let (app, _store) = init_api().await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": "  ", "password": "whatever" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["details"]["field"], "email");
}

#[rstest]
#[actix_web::test]
async fn logout_clears_the_session() {
    let (app, _store) = init_api().await;
    let cookie = login(&app, REGULAR_EMAIL, REGULAR_PASSWORD).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = session_cookie(&res).expect("removal cookie");
    assert_eq!(cleared.value(), "");

    let after = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::admin_reads_anyone(ADMIN_EMAIL, ADMIN_PASSWORD, "/api/v1/users/2", StatusCode::OK)]
#[case::regular_reads_self(REGULAR_EMAIL, REGULAR_PASSWORD, "/api/v1/users/2", StatusCode::OK)]
#[case::regular_reads_admin(
    REGULAR_EMAIL,
    REGULAR_PASSWORD,
    "/api/v1/users/1",
    StatusCode::UNAUTHORIZED
)]
#[case::missing_before_policy(
    REGULAR_EMAIL,
    REGULAR_PASSWORD,
    "/api/v1/users/99",
    StatusCode::NOT_FOUND
)]
#[case::malformed_id(ADMIN_EMAIL, ADMIN_PASSWORD, "/api/v1/users/abc", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn profile_reads_follow_policy(
    #[case] email: &str,
    #[case] password: &str,
    #[case] uri: &str,
    #[case] expected: StatusCode,
) {
    let (app, _store) = init_api().await;
    let cookie = login(&app, email, password).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn regular_user_cannot_promote_themselves() {
    let (app, _store) = init_api().await;
    let cookie = login(&app, REGULAR_EMAIL, REGULAR_PASSWORD).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/2")
            .cookie(cookie.clone())
            .set_json(json!({ "roleId": 1 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let renamed = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/2")
            .cookie(cookie)
            .set_json(json!({ "firstname": "Regina" }))
            .to_request(),
    )
    .await;
    assert_eq!(renamed.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(renamed).await;
    assert_eq!(body["user"]["firstname"], "Regina");
}

#[rstest]
#[actix_web::test]
async fn default_accounts_cannot_be_deleted() {
    let (app, _store) = init_api().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/users/1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case::admin_demoted("/api/v1/users/1", 2)]
#[case::regular_promoted("/api/v1/users/2", 1)]
#[actix_web::test]
async fn default_account_roles_are_fixed(#[case] path: &str, #[case] role_id: i32) {
    let (app, _store) = init_api().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(path)
            .cookie(cookie.clone())
            .set_json(json!({ "roleId": role_id }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let renamed = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(path)
            .cookie(cookie)
            .set_json(json!({ "lastname": "Renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(renamed.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(renamed).await;
    assert_ne!(body["user"]["roleId"], role_id);
}

#[rstest]
#[actix_web::test]
async fn signups_before_seeding_leave_default_ids_free() {
    let (app, store) = init_unseeded_api().await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(signup_body("early", None))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"]["id"], 3);

    seed_default_accounts(&store).await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let admin = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(admin.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(admin).await;
    assert_eq!(body["user"]["roleId"], 1);
}

#[rstest]
#[actix_web::test]
async fn admin_search_matches_any_term() {
    let (app, _store) = init_api().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/search?query=regular%20nobody")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["users"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["users"][0]["id"], 2);

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/search")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn collections_require_a_session() {
    let (app, _store) = init_api().await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
