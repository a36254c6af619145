use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
    message: String,
}

impl ErrorResponse {
    pub(super) fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_owned(),
            message,
        }
    }
}

/// Access denial payload naming the unmet requirement.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-denied-response.ts"
)]
pub struct AccessDeniedResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub required_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub required_permission: Option<String>,
}
