/// Router Module Index
///
/// Organizes the routing logic into access-tier modules. Each tier maps to one
/// named role set, and the corresponding gate is applied as a router layer in
/// `create_router`, so access control is visible in one place rather than
/// scattered across handlers.
///
/// The route table is assembled once at startup and read-only afterwards; it is
/// shared freely across concurrent requests.

/// Routes accessible without any credential.
pub mod public;

/// Routes open to every signed-in staff member (`ALL_STAFF` gate).
pub mod authenticated;

/// Office management routes (`ADMIN_ONLY` gate).
pub mod offices;

/// Staff directory routes (`STAFF_DIRECTORY` gate: Admin or Tosm).
pub mod staff;
