use axum::{body, http::StatusCode, response::IntoResponse};
use staff_portal::{
    error::AppError,
    models::{Message, StaffRole},
};

/// Wire-shape tests: these pin the JSON contracts consumed by the frontend,
/// independent of any HTTP stack.

#[test]
fn staff_role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(StaffRole::Admin).unwrap(), "admin");
    assert_eq!(serde_json::to_value(StaffRole::Tosm).unwrap(), "tosm");
    assert_eq!(serde_json::to_value(StaffRole::Hr).unwrap(), "hr");

    let parsed: StaffRole = serde_json::from_str("\"tosm\"").unwrap();
    assert_eq!(parsed, StaffRole::Tosm);
}

#[test]
fn message_uses_the_documented_wire_shape() {
    let json = r#"{
        "timestamp": "2026-02-10T12:30:00Z",
        "message": "meeting room 2 is free",
        "staffUsername": "ada"
    }"#;
    let parsed: Message = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.timestamp, "2026-02-10T12:30:00Z");
    assert_eq!(parsed.staff_username.as_deref(), Some("ada"));

    // Attribution is optional on the wire.
    let json = r#"{ "timestamp": "2026-02-10T12:30:00Z", "message": "hello" }"#;
    let parsed: Message = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.staff_username, None);

    // And omitted, not null, when serializing without it.
    let value = serde_json::to_value(&parsed).unwrap();
    assert!(value.get("staffUsername").is_none());
}

#[tokio::test]
async fn internal_error_crossing_the_boundary_keeps_its_message() {
    let response = AppError::internal("db unavailable").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "db unavailable");
    assert_eq!(json["statusCode"], 500);
}

#[tokio::test]
async fn forbidden_error_renders_403_body() {
    let response = AppError::forbidden("role \"hr\" is not permitted here").into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["statusCode"], 403);
}
