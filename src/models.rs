use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// StaffRole
///
/// The closed set of roles a staff member can hold. Authorization is decided by
/// exact membership of a role in a route's allowed set; there is no hierarchy
/// between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum StaffRole {
    /// Full administrative access (office management, staff management).
    Admin,
    /// Technical operations & site management. Can view the staff directory.
    Tosm,
    /// Human resources staff. Standard authenticated access only.
    Hr,
}

impl StaffRole {
    /// Stable string form used in the `staff.role` database column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Tosm => "tosm",
            Self::Hr => "hr",
        }
    }

    /// Parses the database string form back into a role.
    /// Returns `None` for unknown values so callers decide how to fail.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "tosm" => Some(Self::Tosm),
            "hr" => Some(Self::Hr),
            _ => None,
        }
    }
}

/// Staff
///
/// The canonical staff record stored in the `staff` table. This is the minimal
/// identity data resolved during authentication and listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Staff {
    pub id: Uuid,
    /// Unique login/display name, also used for message attribution.
    pub username: String,
    pub email: String,
    /// The RBAC field checked by the route gates.
    pub role: StaffRole,
}

/// Office
///
/// An office record from the `offices` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Office {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    /// Maximum number of staff the office seats.
    pub capacity: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Message
///
/// A single entry in the office message log. Purely a transport shape: the
/// timestamp stays string-encoded (RFC 3339) end to end and the attribution is
/// omitted from the JSON when absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Message {
    pub timestamp: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_username: Option<String>,
}

/// --- Request Payloads (Input Schemas) ---

/// CreateOfficeRequest
///
/// Input payload for registering a new office (POST /offices).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateOfficeRequest {
    pub name: String,
    pub location: String,
    pub capacity: i32,
}

/// CreateStaffRequest
///
/// Input payload for adding a staff member (POST /staff). The username must be
/// unique; a duplicate is rejected with 409 at the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateStaffRequest {
    pub username: String,
    pub email: String,
    pub role: StaffRole,
}

/// PostMessageRequest
///
/// Input payload for appending to the message log (POST /messages). The server
/// stamps the timestamp and the caller's username; clients only supply the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PostMessageRequest {
    pub message: String,
}

/// --- Profile Schemas (Output) ---

/// StaffProfile
///
/// Output schema for the authenticated caller's own profile (GET /me).
/// Built entirely from the resolved principal, no extra lookup.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct StaffProfile {
    pub id: Uuid,
    pub username: String,
    pub role: StaffRole,
}
