//! Integration tests for permission checks and tenant isolation.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

async fn check(app: &TestApp, access: &str, resource: &str, action: &str) -> helpers::TestResponse {
    app.request(
        "GET",
        &format!("/api/authorizations/check?resource={resource}&action={action}"),
        None,
        &[("access_token", access)],
    )
    .await
}

#[tokio::test]
async fn test_student_permissions() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = check(&app, &access, "usergroup", "read").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["allowed"], true);

    let response = check(&app, &access, "quiz", "attempt").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = check(&app, &access, "usergroup", "delete").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["status"], 403);
    assert_eq!(response.message(), "Missing permission usergroup:delete");
}

#[tokio::test]
async fn test_identical_names_in_another_tenant_grant_nothing() {
    let app = TestApp::new().await;

    // Org B's "student" role holds class:delete; org A's does not.
    let (outsider, _) = app.login_tokens("outsider@email.com").await;
    let response = check(&app, &outsider, "class", "delete").await;
    assert_eq!(response.status, StatusCode::OK);

    let (student, _) = app.login_tokens("student@email.com").await;
    let response = check(&app, &student, "class", "delete").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Org A's teacher grants do not leak to org B.
    let response = check(&app, &outsider, "class", "update").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_revocation_applies_mid_session() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    assert_eq!(
        check(&app, &access, "quiz", "read").await.status,
        StatusCode::OK
    );

    assert!(
        app.store
            .revoke_role(app.org_a, app.student.id, app.student_role)
            .await
    );

    assert_eq!(
        check(&app, &access, "quiz", "read").await.status,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_trusted_claims_outlive_role_revocation() {
    let mut config = helpers::test_config();
    config.auth.trust_token_claims = true;
    let app = TestApp::with_config(config).await;
    let (access, _) = app.login_tokens("student@email.com").await;

    app.store
        .revoke_role(app.org_a, app.student.id, app.student_role)
        .await;

    // The snapshot in the token still grants until it expires.
    assert_eq!(
        check(&app, &access, "quiz", "read").await.status,
        StatusCode::OK
    );
    assert_eq!(
        check(&app, &access, "class", "delete").await.status,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_check_requires_resource_and_action() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = app
        .request(
            "GET",
            "/api/authorizations/check?resource=quiz",
            None,
            &[("access_token", access.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_authorization_map_filtered() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = app
        .request(
            "GET",
            "/api/authorizations?resources=quiz,class,usergroup",
            None,
            &[("access_token", access.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"],
        json!({
            "class": {},
            "quiz": { "attempt": true, "read": true },
            "usergroup": { "read": true }
        })
    );
}

#[tokio::test]
async fn test_authorization_map_unfiltered_lists_every_resource() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("teacher@email.com").await;

    let response = app
        .request("GET", "/api/authorizations", None, &[("access_token", access.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.body["data"];
    assert_eq!(
        data["class"],
        json!({ "create": true, "delete": true, "read": true, "update": true })
    );
    assert_eq!(data["quiz"], json!({}));
    assert_eq!(data["usergroup"], json!({}));
}

#[tokio::test]
async fn test_authorization_map_drops_unknown_resources() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = app
        .request(
            "GET",
            "/api/authorizations?resources=quiz,grading",
            None,
            &[("access_token", access.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"],
        json!({ "quiz": { "attempt": true, "read": true } })
    );
}

#[tokio::test]
async fn test_authorizations_require_session() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/authorizations", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_resource_filter_lists_every_resource() {
    let app = TestApp::new().await;
    let (access, _) = app.login_tokens("student@email.com").await;

    let response = app
        .request(
            "GET",
            "/api/authorizations?resources=,",
            None,
            &[("access_token", access.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.body["data"];
    assert_eq!(data["quiz"], json!({ "attempt": true, "read": true }));
    assert_eq!(data["class"], json!({}));
    assert_eq!(data["usergroup"], json!({ "read": true }));
}
