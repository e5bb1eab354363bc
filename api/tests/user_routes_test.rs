//! End-to-end tests for the /api/user routes over the in-memory user store

mod common;

use actix_web::{cookie::Cookie, http::StatusCode, test, App};
use bl_api::app::configure;
use bl_core::domain::entities::token::Role;
use bl_core::repositories::MockUserRepository;
use serde_json::{json, Value};

macro_rules! routes_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.state.clone())
                .app_data($ctx.token_data.clone())
                .configure(configure::<MockUserRepository>),
        )
        .await
    };
}

const PASSWORD: &str = "Secret123";

fn register_body(username: &str) -> Value {
    json!({ "username": username, "password": PASSWORD, "nickname": "Alice" })
}

#[actix_web::test]
async fn test_register_returns_created_with_tokens() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(register_body("alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["userId"], 1);
    assert!(body["data"]["accessToken"].is_string());
    assert!(body["data"]["refreshToken"].is_string());
    assert!(body["data"]["expiresIn"].as_i64().unwrap() > 0);
    assert_eq!(ctx.repo.len().await, 1);
}

#[actix_web::test]
async fn test_register_duplicate_username_conflicts() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/user/register")
            .set_json(register_body("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);

        if expected == StatusCode::CONFLICT {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "user_already_exists");
        }
    }
}

#[actix_web::test]
async fn test_register_validation_errors() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let invalid = [
        json!({ "username": "a", "password": PASSWORD }),
        json!({ "username": "bad name", "password": PASSWORD }),
        json!({ "username": "alice", "password": "short" }),
        json!({ "username": "alice", "password": "alllowercase1" }),
    ];

    for payload in invalid {
        let req = test::TestRequest::post()
            .uri("/api/user/register")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
    }
    assert!(ctx.repo.is_empty().await);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "bad_request");
}

#[actix_web::test]
async fn test_login_and_wrong_credentials() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(register_body("alice"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({ "username": "alice", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["nickname"], "Alice");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    let access = body["data"]["accessToken"].as_str().unwrap();
    assert_eq!(ctx.tokens.verify_access_token(access).unwrap().user_id(), Ok(1));

    for (username, password) in [("alice", "Wrong1234"), ("nobody", PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/api/user/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_credentials");
    }
}

#[actix_web::test]
async fn test_refresh_token_from_body() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);
    let pair = ctx
        .tokens
        .issue_token_pair(&bl_core::domain::entities::token::TokenPayload::new(7, Role::User))
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/user/refresh-token")
        .set_json(json!({ "refreshToken": pair.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let access = body["data"]["accessToken"].as_str().unwrap();
    assert_eq!(ctx.tokens.verify_access_token(access).unwrap().user_id(), Ok(7));
}

#[actix_web::test]
async fn test_refresh_with_access_token_is_rejected() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);
    let pair = ctx
        .tokens
        .issue_token_pair(&bl_core::domain::entities::token::TokenPayload::new(7, Role::User))
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/user/refresh-token")
        .set_json(json!({ "refreshToken": pair.access_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_invalid");
}

#[actix_web::test]
async fn test_refresh_without_token_is_missing() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/refresh-token")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_missing");
}

#[actix_web::test]
async fn test_refresh_token_from_cookie() {
    let ctx = common::context(true);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(register_body("alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "refreshToken")
        .map(|c| c.value().to_string())
        .expect("register should set the refresh cookie");

    let req = test::TestRequest::post()
        .uri("/api/user/refresh-token")
        .cookie(Cookie::new("refreshToken", cookie.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let rotated = resp
        .response()
        .cookies()
        .find(|c| c.name() == "refreshToken")
        .map(|c| (c.value().to_string(), c.http_only()))
        .unwrap();
    assert_eq!(rotated.1, Some(true));
    assert!(ctx.tokens.verify_refresh_token(&rotated.0).is_ok());
}

#[actix_web::test]
async fn test_cookie_ignored_when_disabled() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);
    let pair = ctx
        .tokens
        .issue_token_pair(&bl_core::domain::entities::token::TokenPayload::new(7, Role::User))
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/user/refresh-token")
        .cookie(Cookie::new("refreshToken", pair.refresh_token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_clears_cookie() {
    let ctx = common::context(true);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/logout")
        .insert_header(("Authorization", common::bearer(&ctx.tokens, 1, Role::User)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == "refreshToken")
        .map(|c| c.value().to_string())
        .unwrap();
    assert!(cleared.is_empty());

    let req = test::TestRequest::post().uri("/api/user/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_me_and_change_password() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(register_body("alice"))
        .to_request();
    test::call_service(&app, req).await;
    let auth = common::bearer(&ctx.tokens, 1, Role::User);

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["role"], 0);

    let req = test::TestRequest::put()
        .uri("/api/user/me/password")
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({ "oldPassword": "Wrong1234", "newPassword": "Another456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri("/api/user/me/password")
        .insert_header(("Authorization", auth))
        .set_json(json!({ "oldPassword": PASSWORD, "newPassword": "Another456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({ "username": "alice", "password": "Another456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_me_for_deleted_account_is_not_found() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header(("Authorization", common::bearer(&ctx.tokens, 99, Role::User)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_access_rules() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    for username in ["alice", "bob"] {
        let req = test::TestRequest::post()
            .uri("/api/user/register")
            .set_json(register_body(username))
            .to_request();
        test::call_service(&app, req).await;
    }

    let cases = [
        (1, Role::User, "/api/user/1/profile", StatusCode::OK),
        (1, Role::User, "/api/user/2/profile", StatusCode::FORBIDDEN),
        (5, Role::Admin, "/api/user/2/profile", StatusCode::OK),
        (1, Role::User, "/api/user/0/profile", StatusCode::BAD_REQUEST),
        (1, Role::User, "/api/user/abc/profile", StatusCode::BAD_REQUEST),
    ];

    for (caller, role, uri, expected) in cases {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", common::bearer(&ctx.tokens, caller, role)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "{} as {}", uri, caller);
    }
}

#[actix_web::test]
async fn test_detail_requires_admin() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(register_body("alice"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/user/1")
        .insert_header(("Authorization", common::bearer(&ctx.tokens, 1, Role::User)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "insufficient_permissions");

    let req = test::TestRequest::get()
        .uri("/api/user/1")
        .insert_header(("Authorization", common::bearer(&ctx.tokens, 2, Role::Admin)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["username"], "alice");
}

#[actix_web::test]
async fn test_health_and_unknown_route() {
    let ctx = common::context(false);
    let app = routes_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}
