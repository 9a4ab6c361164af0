use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Offices Router Module
///
/// Office management endpoints, restricted to administrators.
///
/// Access Control:
/// This entire router is wrapped in `require_role(ADMIN_ONLY)` in
/// `create_router`. The gate resolves the caller's principal (401 without a
/// valid credential) and rejects any non-admin role with 403 before a handler
/// here can run.
pub fn office_routes() -> Router<AppState> {
    Router::new()
        // GET /offices
        // Lists every registered office.
        .route("/offices", get(handlers::get_all_offices))
        // POST /offices
        // Registers a new office.
        .route("/offices", post(handlers::create_office))
        // GET /offices/{id}
        // Retrieves a single office record.
        .route("/offices/{id}", get(handlers::get_office))
}
