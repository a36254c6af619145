use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is assigned to an actor.
    SecurityRoleAssigned,
    /// Emitted when an actor's active role is revoked.
    SecurityRoleRevoked,
    /// Emitted when the bootstrap token seeds an operator account.
    SecuritySessionBootstrapped,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityRoleAssigned => "security.role.assigned",
            Self::SecurityRoleRevoked => "security.role.revoked",
            Self::SecuritySessionBootstrapped => "security.session.bootstrapped",
        }
    }
}
