//! Stateless authorization decisions over explicit session context.

use std::fmt::{Display, Formatter};

use reelnet_core::{ActorId, AppError};
use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionSet, Role, default_permissions};

/// Requirement declared by a route or use-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AccessRequirement {
    /// Caller role rank must be at least the given role.
    MinimumRole(Role),
    /// Caller effective permission set must grant the capability.
    Permission(Permission),
}

impl Display for AccessRequirement {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinimumRole(role) => write!(formatter, "role:{role}"),
            Self::Permission(permission) => write!(formatter, "permission:{permission}"),
        }
    }
}

/// Machine-readable deny reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyCode {
    /// Caller role ranks below the required role.
    InsufficientRole,
    /// Caller effective permissions lack the capability.
    MissingPermission,
    /// Caller has no session.
    NoSession,
}

impl DenyCode {
    /// Returns a stable transport value for this code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientRole => "insufficient_role",
            Self::MissingPermission => "missing_permission",
            Self::NoSession => "no_session",
        }
    }
}

/// Why a requirement was not satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyReason {
    code: DenyCode,
    requirement: AccessRequirement,
}

impl DenyReason {
    /// Creates a deny reason for an unmet requirement.
    #[must_use]
    pub fn new(code: DenyCode, requirement: AccessRequirement) -> Self {
        Self { code, requirement }
    }

    /// Returns the reason code.
    #[must_use]
    pub fn code(&self) -> DenyCode {
        self.code
    }

    /// Returns the requirement that was not met.
    #[must_use]
    pub fn requirement(&self) -> AccessRequirement {
        self.requirement
    }
}

impl Display for DenyReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} ({})", self.code.as_str(), self.requirement)
    }
}

impl From<DenyReason> for AppError {
    fn from(value: DenyReason) -> Self {
        match value.code() {
            DenyCode::NoSession => AppError::Unauthorized(value.to_string()),
            DenyCode::InsufficientRole | DenyCode::MissingPermission => {
                AppError::Forbidden(value.to_string())
            }
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Requirement satisfied.
    Allow,
    /// Requirement not satisfied.
    Deny(DenyReason),
}

impl Decision {
    /// Returns whether access is allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the deny reason, if any.
    #[must_use]
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(*reason),
        }
    }

    /// Converts the decision into a result for `?` propagation.
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason),
        }
    }
}

/// Privileges of an authenticated actor resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorAccess {
    actor_id: ActorId,
    role: Role,
    permissions: PermissionSet,
    has_overrides: bool,
}

impl ActorAccess {
    /// Creates actor access from a role and optional explicit permission overrides.
    ///
    /// Overrides replace the role defaults entirely.
    #[must_use]
    pub fn new(actor_id: ActorId, role: Role, permission_overrides: Option<PermissionSet>) -> Self {
        let has_overrides = permission_overrides.is_some();
        let permissions = permission_overrides.unwrap_or_else(|| default_permissions(role));

        Self {
            actor_id,
            role,
            permissions,
            has_overrides,
        }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the actor role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the effective permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether the effective set came from an explicit override.
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        self.has_overrides
    }

    /// Evaluates a single requirement against this actor.
    #[must_use]
    pub fn check(&self, requirement: AccessRequirement) -> Decision {
        match requirement {
            AccessRequirement::MinimumRole(required) if self.role.is_at_least(required) => {
                Decision::Allow
            }
            AccessRequirement::MinimumRole(_) => {
                Decision::Deny(DenyReason::new(DenyCode::InsufficientRole, requirement))
            }
            AccessRequirement::Permission(permission)
                if self.permissions.is_granted(permission) =>
            {
                Decision::Allow
            }
            AccessRequirement::Permission(_) => {
                Decision::Deny(DenyReason::new(DenyCode::MissingPermission, requirement))
            }
        }
    }
}

/// Caller context passed explicitly into authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    /// No authenticated session.
    Anonymous,
    /// Authenticated actor with resolved privileges.
    Actor(ActorAccess),
}

impl SessionContext {
    /// Returns the authenticated actor, if any.
    #[must_use]
    pub fn actor(&self) -> Option<&ActorAccess> {
        match self {
            Self::Anonymous => None,
            Self::Actor(access) => Some(access),
        }
    }
}

/// Evaluates one requirement for the session.
///
/// Anonymous callers are always denied with [`DenyCode::NoSession`].
#[must_use]
pub fn authorize(session: &SessionContext, requirement: AccessRequirement) -> Decision {
    match session {
        SessionContext::Anonymous => {
            Decision::Deny(DenyReason::new(DenyCode::NoSession, requirement))
        }
        SessionContext::Actor(access) => access.check(requirement),
    }
}

/// Evaluates a conjunction of requirements, returning the first denial in order.
#[must_use]
pub fn authorize_all(session: &SessionContext, requirements: &[AccessRequirement]) -> Decision {
    requirements
        .iter()
        .map(|requirement| authorize(session, *requirement))
        .find(|decision| !decision.is_allowed())
        .unwrap_or(Decision::Allow)
}
