use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use staff_portal::{
    AppState,
    auth::{AuthStaff, Claims},
    config::{AppConfig, Env},
    models::{Staff, StaffRole},
    repository::{MemoryRepository, RepositoryState},
};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn seeded_repo(id: Uuid, username: &str, role: StaffRole) -> Arc<MemoryRepository> {
    let repo = Arc::new(MemoryRepository::new());
    repo.seed_staff(Staff {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role,
    });
    repo
}

/// Builds a signed token whose expiry is `exp_offset` seconds from now
/// (negative for an already-expired token).
fn create_token(staff_id: Uuid, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: staff_id,
        iat: (now - 10) as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env, repo: Arc<MemoryRepository>) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState {
        repo: repo as RepositoryState,
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request.
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let staff_id = Uuid::new_v4();
    let token = create_token(staff_id, 3600);
    let app_state = create_app_state(
        Env::Production,
        seeded_repo(staff_id, "ada", StaffRole::Admin),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let principal = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .expect("valid token should resolve");
    assert_eq!(principal.id, staff_id);
    assert_eq!(principal.username, "ada");
    assert_eq!(principal.role, StaffRole::Admin);
}

#[tokio::test]
async fn test_resolution_is_idempotent_within_a_request() {
    let staff_id = Uuid::new_v4();
    let token = create_token(staff_id, 3600);
    let app_state = create_app_state(
        Env::Production,
        seeded_repo(staff_id, "tom", StaffRole::Tosm),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let first = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    let second = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.role, second.role);
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(Env::Production, Arc::new(MemoryRepository::new()));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let err = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    let staff_id = Uuid::new_v4();
    // Expired two hours ago, well past the default validation leeway.
    let token = create_token(staff_id, -7200);
    let app_state = create_app_state(
        Env::Production,
        seeded_repo(staff_id, "ada", StaffRole::Admin),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let err = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_for_removed_staff_member() {
    // Token is valid but the staff member no longer exists in the repository.
    let staff_id = Uuid::new_v4();
    let token = create_token(staff_id, 3600);
    let app_state = create_app_state(Env::Production, Arc::new(MemoryRepository::new()));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let err = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_success() {
    let staff_id = Uuid::new_v4();
    let app_state =
        create_app_state(Env::Local, seeded_repo(staff_id, "hana", StaffRole::Hr));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-staff-id"),
        header::HeaderValue::from_str(&staff_id.to_string()).unwrap(),
    );

    let principal = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(principal.id, staff_id);
    assert_eq!(principal.role, StaffRole::Hr);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let staff_id = Uuid::new_v4();
    // The staff member exists, but the bypass header must be ignored outside Local.
    let app_state = create_app_state(
        Env::Production,
        seeded_repo(staff_id, "hana", StaffRole::Hr),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-staff-id"),
        header::HeaderValue::from_str(&staff_id.to_string()).unwrap(),
    );

    let err = AuthStaff::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}
