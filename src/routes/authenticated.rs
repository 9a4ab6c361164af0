use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Routes available to every signed-in staff member regardless of role.
///
/// Access Control Strategy:
/// The `require_role(ALL_STAFF)` layer above this module guarantees every
/// handler here receives a resolved `AuthStaff` principal; no role tier is
/// excluded, so the gate is effectively an authentication requirement.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /me
        // Retrieves the caller's own profile from the resolved principal.
        .route("/me", get(handlers::get_me))
        // GET /messages
        // Lists the shared office message log.
        .route("/messages", get(handlers::get_messages))
        // POST /messages
        // Appends a message; the server stamps time and attribution.
        .route("/messages", post(handlers::post_message))
}
