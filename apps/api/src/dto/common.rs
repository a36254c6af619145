use serde::Serialize;
use ts_rs::TS;

mod conversions;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// API representation of the authenticated actor and its effective privileges.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/current-actor-response.ts"
)]
pub struct CurrentActorResponse {
    pub actor_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
    pub rank: u8,
    /// Granted permission names, sorted.
    pub permissions: Vec<String>,
    pub has_permission_overrides: bool,
}
