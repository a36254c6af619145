use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelnet_application::AssignmentError;
use reelnet_core::AppError;
use reelnet_domain::{AccessRequirement, DenyCode, DenyReason};
use tracing::{error, warn};

mod types;

pub use types::{AccessDeniedResponse, ErrorResponse};

/// HTTP API error wrapper around application errors and access denials.
#[derive(Debug)]
pub enum ApiError {
    /// Categorized application error.
    App(AppError),
    /// Authorization check denied the request.
    AccessDenied(DenyReason),
    /// Role assignment workflow failure.
    Assignment(AssignmentError),
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<DenyReason> for ApiError {
    fn from(value: DenyReason) -> Self {
        Self::AccessDenied(value)
    }
}

impl From<AssignmentError> for ApiError {
    fn from(value: AssignmentError) -> Self {
        match value {
            AssignmentError::Unauthorized(reason) => Self::AccessDenied(reason),
            other => Self::Assignment(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::App(error) => app_error_response(error),
            Self::AccessDenied(reason) => access_denied_response(reason),
            Self::Assignment(error) => assignment_error_response(error),
        }
    }
}

fn app_error_response(error: AppError) -> Response {
    let (status, code) = match error {
        AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
        AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
        AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %error, "request failed");
    }

    (status, Json(ErrorResponse::new(code, error.to_string()))).into_response()
}

fn access_denied_response(reason: DenyReason) -> Response {
    let status = match reason.code() {
        DenyCode::NoSession => StatusCode::UNAUTHORIZED,
        DenyCode::InsufficientRole | DenyCode::MissingPermission => StatusCode::FORBIDDEN,
    };
    warn!(reason = %reason, "access denied");

    let mut payload = AccessDeniedResponse {
        error: reason.code().as_str().to_owned(),
        required_role: None,
        required_permission: None,
    };
    if reason.code() != DenyCode::NoSession {
        match reason.requirement() {
            AccessRequirement::MinimumRole(role) => {
                payload.required_role = Some(role.as_str().to_owned());
            }
            AccessRequirement::Permission(permission) => {
                payload.required_permission = Some(permission.as_str().to_owned());
            }
        }
    }

    (status, Json(payload)).into_response()
}

fn assignment_error_response(error: AssignmentError) -> Response {
    let (status, code) = match &error {
        AssignmentError::Unauthorized(reason) => return access_denied_response(*reason),
        AssignmentError::InvalidRole(_) => (StatusCode::BAD_REQUEST, "invalid_role"),
        AssignmentError::NoActiveAssignment(_) => (StatusCode::NOT_FOUND, "no_active_assignment"),
        AssignmentError::PersistenceFailure(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "persistence_failure")
        }
        AssignmentError::AuditFailure { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "audit_failure")
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %error, "role assignment failed");
    }

    (status, Json(ErrorResponse::new(code, error.to_string()))).into_response()
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
