use crate::{
    AppState,
    auth::{self, AuthStaff},
    error::AppError,
    models::{
        CreateOfficeRequest, CreateStaffRequest, Message, Office, PostMessageRequest, Staff,
        StaffProfile,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

// --- Offices ---

/// get_all_offices
///
/// [Admin Route] Lists every office. The admin-only gate sits on the router
/// layer above this module; by the time this runs the caller's role has
/// already been checked.
#[utoipa::path(
    get,
    path = "/offices",
    responses((status = 200, description = "All offices", body = [Office]))
)]
pub async fn get_all_offices(State(state): State<AppState>) -> Result<Json<Vec<Office>>, AppError> {
    let offices = state.repo.list_offices().await?;
    Ok(Json(offices))
}

/// get_office
///
/// [Admin Route] Retrieves a single office by ID.
#[utoipa::path(
    get,
    path = "/offices/{id}",
    params(("id" = Uuid, Path, description = "Office ID")),
    responses(
        (status = 200, description = "Found", body = Office),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_office(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Office>, AppError> {
    state
        .repo
        .get_office(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no office with id {id}")))
}

/// create_office
///
/// [Admin Route] Registers a new office.
#[utoipa::path(
    post,
    path = "/offices",
    request_body = CreateOfficeRequest,
    responses((status = 201, description = "Created", body = Office))
)]
pub async fn create_office(
    State(state): State<AppState>,
    Json(payload): Json<CreateOfficeRequest>,
) -> Result<(StatusCode, Json<Office>), AppError> {
    let office = state.repo.create_office(payload).await?;
    Ok((StatusCode::CREATED, Json(office)))
}

// --- Staff ---

/// get_all_staff
///
/// [Directory Route] Lists the staff directory. The route gate admits both
/// Admin and Tosm, so no further role check is needed here.
#[utoipa::path(
    get,
    path = "/staff",
    responses((status = 200, description = "Staff directory", body = [Staff]))
)]
pub async fn get_all_staff(State(state): State<AppState>) -> Result<Json<Vec<Staff>>, AppError> {
    let staff = state.repo.list_staff().await?;
    Ok(Json(staff))
}

/// create_staff
///
/// [Directory Route] Adds a staff member.
///
/// *RBAC*: the directory gate admits Tosm as well, so creation tightens to
/// Admin with an explicit in-handler check. A duplicate username is a 409.
#[utoipa::path(
    post,
    path = "/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Created", body = Staff),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Duplicate username")
    )
)]
pub async fn create_staff(
    AuthStaff { role, .. }: AuthStaff,
    State(state): State<AppState>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Staff>), AppError> {
    auth::authorize(role, auth::ADMIN_ONLY)?;
    let staff = state.repo.create_staff(payload).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

/// get_me
///
/// [Authenticated Route] Returns the caller's own profile, built entirely from
/// the resolved principal.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = StaffProfile))
)]
pub async fn get_me(AuthStaff { id, username, role }: AuthStaff) -> Json<StaffProfile> {
    Json(StaffProfile { id, username, role })
}

// --- Message Log ---

/// get_messages
///
/// [Authenticated Route] Lists the office message log in chronological order.
#[utoipa::path(
    get,
    path = "/messages",
    responses((status = 200, description = "Message log", body = [Message]))
)]
pub async fn get_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.repo.list_messages().await?;
    Ok(Json(messages))
}

/// post_message
///
/// [Authenticated Route] Appends a message to the log. The server stamps the
/// RFC 3339 timestamp and attributes the entry to the caller's username.
#[utoipa::path(
    post,
    path = "/messages",
    request_body = PostMessageRequest,
    responses((status = 201, description = "Recorded", body = Message))
)]
pub async fn post_message(
    AuthStaff { username, .. }: AuthStaff,
    State(state): State<AppState>,
    Json(payload): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let entry = Message {
        timestamp: Utc::now().to_rfc3339(),
        message: payload.message,
        staff_username: Some(username),
    };
    let recorded = state.repo.record_message(entry).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}
