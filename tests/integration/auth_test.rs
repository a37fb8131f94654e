//! Integration tests for the login/logout/session flow.

mod helpers;

use http::StatusCode;

use nousquest_auth::credential::{ACCOUNT_LOCKED_MESSAGE, INVALID_CREDENTIALS_MESSAGE};
use nousquest_database::CredentialStore;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_login_success_sets_cookies_and_resets_counter() {
    let app = TestApp::new().await;

    let response = app.login("student@email.com", "wrong").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let stored = app
        .store
        .find_by_id(app.student.id, app.org_a)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.logon_attempt, 1);

    let response = app.login("student@email.com", PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Login successful");
    assert_eq!(response.body["status"], 200);
    assert_eq!(response.body["data"]["user"]["email"], "student@email.com");
    assert_eq!(
        response.body["data"]["user"]["org_id"],
        app.org_a.to_string()
    );
    assert!(response.body["data"]["user"].get("password_hash").is_none());

    let access = response.cookie("access_token").expect("access cookie");
    assert!(!access.value.is_empty());
    assert!(access.has_flag("HttpOnly"));
    assert_eq!(access.max_age(), Some(30 * 60));
    assert_eq!(access.attribute("Path"), Some("/api"));

    let refresh = response.cookie("refresh_token").expect("refresh cookie");
    assert!(refresh.has_flag("HttpOnly"));
    assert_eq!(refresh.max_age(), Some(7 * 24 * 60 * 60));
    assert_eq!(refresh.attribute("Path"), Some("/api/refresh"));

    let stored = app
        .store
        .find_by_id(app.student.id, app.org_a)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.logon_attempt, 0);
    assert!(stored.last_logon.is_some());
}

#[tokio::test]
async fn test_sixth_failure_locks_account() {
    let app = TestApp::new().await;

    for attempt in 1..=5 {
        let response = app.login("student@email.com", "wrong").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "attempt {attempt}");
        assert_eq!(response.message(), INVALID_CREDENTIALS_MESSAGE);
    }

    let response = app.login("student@email.com", "wrong").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), ACCOUNT_LOCKED_MESSAGE);

    let response = app.login("student@email.com", PASSWORD).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), ACCOUNT_LOCKED_MESSAGE);
    assert!(response.cookie("access_token").is_none());

    let stored = app
        .store
        .find_by_id(app.student.id, app.org_a)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.locked);
    assert_eq!(stored.logon_attempt, 6);
}

#[tokio::test]
async fn test_unlocked_account_can_log_in_again() {
    let app = TestApp::new().await;
    for _ in 0..6 {
        app.login("teacher@email.com", "wrong").await;
    }
    assert!(
        app.store
            .clear_lockout(app.teacher.id, app.org_a)
            .await
            .unwrap()
    );

    let response = app.login("teacher@email.com", PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_identifier_matches_bad_password() {
    let app = TestApp::new().await;

    let unknown = app.login("nobody@email.com", PASSWORD).await;
    let wrong = app.login("student@email.com", "wrong").await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn test_login_validation_errors() {
    let app = TestApp::new().await;

    let missing = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({ "identifier": "student@email.com" })),
            &[],
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.message(), "Validation error");
    assert_eq!(missing.body["status"], 400);

    let empty = app.login("student@email.com", "").await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let stored = app
        .store
        .find_by_id(app.student.id, app.org_a)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.logon_attempt, 0);
}

#[tokio::test]
async fn test_login_accepts_legacy_field_names() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({ "userId": "student@email.com", "password": PASSWORD })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_returns_principal() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("teacher@email.com").await;

    let response = app
        .request("GET", "/api/session", None, &[("access_token", access.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], app.teacher.id.to_string());
    assert_eq!(response.body["data"]["org_id"], app.org_a.to_string());
}

#[tokio::test]
async fn test_session_accepts_bearer_header() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = app.request_with_bearer("GET", "/api/session", &access).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], app.student.id.to_string());
}

#[tokio::test]
async fn test_session_requires_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/session", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], 401);

    let response = app
        .request("GET", "/api/session", None, &[("access_token", "not-a-jwt")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookies_and_revokes_tokens() {
    let app = TestApp::new().await;
    let (access, refresh) = app.login_tokens("student@email.com").await;

    let response = app
        .request(
            "POST",
            "/api/logout",
            None,
            &[("access_token", access.as_str()), ("refresh_token", refresh.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Logout successful");

    let cleared = response.cookie("access_token").expect("access removal");
    assert!(cleared.value.is_empty());
    assert_eq!(cleared.max_age(), Some(0));
    let cleared = response.cookie("refresh_token").expect("refresh removal");
    assert!(cleared.value.is_empty());
    assert_eq!(cleared.attribute("Path"), Some("/api/refresh"));

    let response = app
        .request("GET", "/api/session", None, &[("access_token", access.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("POST", "/api/refresh", None, &[("refresh_token", refresh.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_revocation_leaves_token_valid() {
    let mut config = helpers::test_config();
    config.auth.revoke_on_logout = false;
    let app = TestApp::with_config(config).await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = app
        .request("POST", "/api/logout", None, &[("access_token", access.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/session", None, &[("access_token", access.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_requires_session() {
    let app = TestApp::new().await;
    let response = app.request("POST", "/api/logout", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["store"], "connected");
}
