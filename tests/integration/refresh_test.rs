//! Integration tests for silent refresh and refresh-token rotation.

mod helpers;

use chrono::Duration;
use http::StatusCode;

use nousquest_auth::TokenType;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_near_expiry_access_token_is_refreshed() {
    let app = TestApp::new().await;
    let access = app.mint(&app.student, TokenType::Access, Duration::seconds(60));
    let refresh = app.mint(&app.student, TokenType::Refresh, Duration::days(1));

    let response = app
        .request(
            "GET",
            "/api/session",
            None,
            &[("access_token", access.as_str()), ("refresh_token", refresh.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let renewed = response.cookie("access_token").expect("refreshed cookie");
    assert_ne!(renewed.value, access);
    assert!(renewed.has_flag("HttpOnly"));
    assert_eq!(renewed.max_age(), Some(30 * 60));
    assert!(response.cookie("refresh_token").is_none());

    let response = app
        .request("GET", "/api/session", None, &[("access_token", renewed.value.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], app.student.id.to_string());
}

#[tokio::test]
async fn test_refreshed_access_never_outlives_refresh_token() {
    let app = TestApp::new().await;
    let access = app.mint(&app.student, TokenType::Access, Duration::seconds(60));
    let refresh = app.mint(&app.student, TokenType::Refresh, Duration::minutes(10));

    let response = app
        .request(
            "GET",
            "/api/session",
            None,
            &[("access_token", access.as_str()), ("refresh_token", refresh.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let max_age = response
        .cookie("access_token")
        .and_then(|c| c.max_age())
        .expect("refreshed cookie");
    assert!(max_age <= 10 * 60, "max_age {max_age} exceeds refresh lifetime");
    assert!(max_age > 9 * 60);
}

#[tokio::test]
async fn test_fresh_access_token_is_left_alone() {
    let app = TestApp::new().await;
    let (access, refresh) = app.login_tokens("student@email.com").await;

    let response = app
        .request(
            "GET",
            "/api/session",
            None,
            &[("access_token", access.as_str()), ("refresh_token", refresh.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_near_expiry_without_refresh_token_proceeds_unchanged() {
    let app = TestApp::new().await;
    let access = app.mint(&app.student, TokenType::Access, Duration::seconds(60));

    let response = app
        .request("GET", "/api/session", None, &[("access_token", access.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_near_expiry_with_expired_refresh_token_proceeds_unchanged() {
    let app = TestApp::new().await;
    let access = app.mint(&app.student, TokenType::Access, Duration::seconds(60));
    let refresh = app.mint(&app.student, TokenType::Refresh, Duration::seconds(-30));

    let response = app
        .request(
            "GET",
            "/api/session",
            None,
            &[("access_token", access.as_str()), ("refresh_token", refresh.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_refresh_token_of_another_user_is_ignored() {
    let app = TestApp::new().await;
    let access = app.mint(&app.student, TokenType::Access, Duration::seconds(60));
    let refresh = app.mint(&app.outsider, TokenType::Refresh, Duration::days(1));

    let response = app
        .request(
            "GET",
            "/api/session",
            None,
            &[("access_token", access.as_str()), ("refresh_token", refresh.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_public_route_ignores_missing_token() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_refresh_endpoint_rotates_pair() {
    let app = TestApp::new().await;
    let (_, refresh) = app.login_tokens("student@email.com").await;

    let response = app
        .request("POST", "/api/refresh", None, &[("refresh_token", refresh.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Token refreshed");

    let access = response.cookie("access_token").expect("new access cookie");
    let rotated = response.cookie("refresh_token").expect("new refresh cookie");
    assert_ne!(rotated.value, refresh);

    let session = app
        .request("GET", "/api/session", None, &[("access_token", access.value.as_str())])
        .await;
    assert_eq!(session.status, StatusCode::OK);

    // The consumed refresh token cannot be replayed.
    let replay = app
        .request("POST", "/api/refresh", None, &[("refresh_token", refresh.as_str())])
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert!(replay.set_cookies.is_empty());
}

#[tokio::test]
async fn test_refresh_endpoint_without_token() {
    let app = TestApp::new().await;
    let response = app.request("POST", "/api/refresh", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], 401);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_refresh_endpoint_with_expired_token() {
    let app = TestApp::new().await;
    let refresh = app.mint(&app.student, TokenType::Refresh, Duration::seconds(-1));

    let response = app
        .request("POST", "/api/refresh", None, &[("refresh_token", refresh.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_refresh_endpoint_rejects_access_token() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = app
        .request("POST", "/api/refresh", None, &[("refresh_token", access.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_refresh_endpoint_refuses_locked_account() {
    let app = TestApp::new().await;
    let (_, refresh) = app.login_tokens("student@email.com").await;

    for _ in 0..6 {
        app.login("student@email.com", "wrong").await;
    }
    assert_eq!(
        app.login("student@email.com", PASSWORD).await.status,
        StatusCode::UNAUTHORIZED
    );

    let response = app
        .request("POST", "/api/refresh", None, &[("refresh_token", refresh.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.set_cookies.is_empty());
}
