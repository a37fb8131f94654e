//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use nousquest_api::{AppState, build_app};
use nousquest_auth::{Claims, JwtEncoder, PasswordHasher, TokenType};
use nousquest_core::config::AppConfig;
use nousquest_core::types::{OrgId, RoleId, TokenId};
use nousquest_database::{MemoryStore, Stores};
use nousquest_entity::organization::Organization;
use nousquest_entity::user::{CreateUser, User};

/// Signing secret used by every test app.
pub const SECRET: &str = "integration-test-secret";

/// Password of every seeded user.
pub const PASSWORD: &str = "123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, shared with the router
    pub store: MemoryStore,
    /// Application config
    pub config: AppConfig,
    /// First tenant
    pub org_a: OrgId,
    /// Second tenant; every name matches the first
    pub org_b: OrgId,
    /// Org A, role "student": usergroup:read, quiz:read, quiz:attempt
    pub student: User,
    /// The student's role
    pub student_role: RoleId,
    /// Org A, role "teacher": class create/read/update/delete
    pub teacher: User,
    /// Org B, role "student": class:delete
    pub outsider: User,
}

/// Defaults plus a known secret and a five minute refresh threshold, so
/// freshly issued 30 minute tokens are not refreshed.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = SECRET.to_string();
    config.auth.access_ttl_minutes = 30;
    config.auth.refresh_ttl_days = 7;
    config.auth.refresh_threshold_minutes = Some(5);
    config
}

impl TestApp {
    /// Create a new test application over a seeded two-tenant store
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application with a custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::with_params(1024, 1, 1).expect("valid test params");

        let org_a = Organization::new("Academy", "UTC");
        let org_b = Organization::new("Academy", "UTC");
        let (a, b) = (org_a.id, org_b.id);
        store.insert_organization(org_a).await.expect("org A");
        store.insert_organization(org_b).await.expect("org B");

        let student = add_user(&store, &hasher, a, "student@email.com").await;
        let teacher = add_user(&store, &hasher, a, "teacher@email.com").await;
        let outsider = add_user(&store, &hasher, b, "outsider@email.com").await;

        let student_role = store.insert_role(a, "student").await.expect("role");
        for (resource, action) in [("usergroup", "read"), ("quiz", "read"), ("quiz", "attempt")] {
            store
                .grant(a, student_role.id, resource, action)
                .await
                .expect("grant");
        }
        store
            .assign_role(a, student.id, student_role.id)
            .await
            .expect("assign");

        let teacher_role = store.insert_role(a, "teacher").await.expect("role");
        for action in ["create", "read", "update", "delete"] {
            store
                .grant(a, teacher_role.id, "class", action)
                .await
                .expect("grant");
        }
        store
            .assign_role(a, teacher.id, teacher_role.id)
            .await
            .expect("assign");

        let foreign_role = store.insert_role(b, "student").await.expect("role");
        store
            .grant(b, foreign_role.id, "class", "delete")
            .await
            .expect("grant");
        store
            .assign_role(b, outsider.id, foreign_role.id)
            .await
            .expect("assign");

        let state = AppState::with_hasher(
            config.clone(),
            Stores::from_memory(store.clone()),
            hasher,
        )
        .expect("Failed to build app state");

        Self {
            router: build_app(state),
            store,
            config,
            org_a: a,
            org_b: b,
            student,
            student_role: student_role.id,
            teacher,
            outsider,
        }
    }

    /// Send a request with optional JSON body and cookies
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookies: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json");

        if !cookies.is_empty() {
            let header = cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            req = req.header(COOKIE, header);
        }

        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send(req.body(Body::from(body_str)).expect("Failed to build request"))
            .await
    }

    /// Send a request authenticated with a bearer header instead of a cookie
    pub async fn request_with_bearer(&self, method: &str, path: &str, token: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(SetCookie::parse)
            .collect();

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            set_cookies,
        }
    }

    /// POST /api/login
    pub async fn login(&self, identifier: &str, secret: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/login",
            Some(serde_json::json!({ "identifier": identifier, "secret": secret })),
            &[],
        )
        .await
    }

    /// Log in and return `(access, refresh)` cookie values
    pub async fn login_tokens(&self, identifier: &str) -> (String, String) {
        let response = self.login(identifier, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        let access = response.cookie("access_token").expect("access cookie").value.clone();
        let refresh = response.cookie("refresh_token").expect("refresh cookie").value.clone();
        (access, refresh)
    }

    /// Sign a token for `user` directly, bypassing the issuer
    pub fn mint(&self, user: &User, token_type: TokenType, ttl: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            org_id: user.org_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: TokenId::new(),
            token_type,
            roles: Vec::new(),
            permissions: Vec::new(),
        };
        JwtEncoder::new(SECRET).encode(&claims).expect("sign")
    }
}

async fn add_user(
    store: &MemoryStore,
    hasher: &PasswordHasher,
    org_id: OrgId,
    email: &str,
) -> User {
    store
        .insert_user(CreateUser {
            org_id,
            username: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: hasher.hash_password(PASSWORD).expect("hash"),
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
        })
        .await
        .expect("user")
}

/// One parsed `Set-Cookie` header
#[derive(Debug, Clone)]
pub struct SetCookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Full header text
    pub raw: String,
}

impl SetCookie {
    fn parse(raw: &str) -> Self {
        let pair = raw.split(';').next().unwrap_or_default();
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        Self {
            name: name.trim().to_string(),
            value: value.trim().trim_matches('"').to_string(),
            raw: raw.to_string(),
        }
    }

    /// Value of an attribute such as `Max-Age` or `Path`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.raw.split(';').skip(1).find_map(|part| {
            let (k, v) = part.trim().split_once('=')?;
            k.eq_ignore_ascii_case(key).then_some(v)
        })
    }

    /// Whether a flag attribute such as `HttpOnly` is present
    pub fn has_flag(&self, flag: &str) -> bool {
        self.raw
            .split(';')
            .skip(1)
            .any(|part| part.trim().eq_ignore_ascii_case(flag))
    }

    /// `Max-Age` in seconds
    pub fn max_age(&self) -> Option<i64> {
        self.attribute("Max-Age").and_then(|v| v.parse().ok())
    }
}

/// Test response wrapper
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Every `Set-Cookie` header, in order
    pub set_cookies: Vec<SetCookie>,
}

impl TestResponse {
    /// The last `Set-Cookie` for `name`
    pub fn cookie(&self, name: &str) -> Option<&SetCookie> {
        self.set_cookies.iter().rev().find(|c| c.name == name)
    }

    /// `message` field of the envelope
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}
