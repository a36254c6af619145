use reelnet_core::{ActorId, AppError};
use reelnet_domain::{DenyReason, InvalidRoleError};
use thiserror::Error;

/// Expected failures of role assignment mutations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// Caller lacks the privilege to perform the mutation.
    #[error("role assignment denied: {0}")]
    Unauthorized(DenyReason),

    /// Requested role is not part of the role set.
    #[error(transparent)]
    InvalidRole(#[from] InvalidRoleError),

    /// Target actor has nothing to revoke.
    #[error("actor '{0}' has no active role assignment")]
    NoActiveAssignment(ActorId),

    /// Persistence layer reported a failure.
    #[error("role assignment could not be persisted: {0}")]
    PersistenceFailure(#[source] AppError),

    /// The role change was saved but its audit event was not.
    #[error("role change for actor '{actor_id}' was saved but its audit event failed: {source}")]
    AuditFailure {
        /// Actor whose role change is already in effect.
        actor_id: ActorId,
        /// Audit store failure.
        source: AppError,
    },
}

impl From<DenyReason> for AssignmentError {
    fn from(value: DenyReason) -> Self {
        Self::Unauthorized(value)
    }
}

impl From<AssignmentError> for AppError {
    fn from(value: AssignmentError) -> Self {
        match value {
            AssignmentError::Unauthorized(reason) => reason.into(),
            AssignmentError::InvalidRole(error) => error.into(),
            AssignmentError::NoActiveAssignment(actor_id) => AppError::NotFound(format!(
                "actor '{actor_id}' has no active role assignment"
            )),
            AssignmentError::PersistenceFailure(error) => error,
            error @ AssignmentError::AuditFailure { .. } => AppError::Internal(error.to_string()),
        }
    }
}
