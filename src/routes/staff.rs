use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Staff Router Module
///
/// Staff directory endpoints.
///
/// Access Control:
/// The router is wrapped in `require_role(STAFF_DIRECTORY)` in `create_router`,
/// admitting the union set {Admin, Tosm} in a single registration rather than
/// registering the same path once per role. Creation is additionally tightened
/// to Admin inside the handler.
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        // GET /staff
        // Lists the staff directory. Visible to Admin and Tosm.
        .route("/staff", get(handlers::get_all_staff))
        // POST /staff
        // Adds a staff member. Admin only, enforced in the handler.
        .route("/staff", post(handlers::create_staff))
}
