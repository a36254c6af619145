use serde::{Deserialize, Serialize};

use crate::ActorId;

/// Actor information persisted in the authenticated session.
///
/// The identity carries no privilege data: roles are resolved per request from
/// the assignment store so that revocations take effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    actor_id: ActorId,
    display_name: String,
    email: Option<String>,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    #[must_use]
    pub fn new(actor_id: ActorId, display_name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            actor_id,
            display_name: display_name.into(),
            email,
        }
    }

    /// Returns the stable actor identifier.
    #[must_use]
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
