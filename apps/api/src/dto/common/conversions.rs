use reelnet_core::UserIdentity;
use reelnet_domain::ActorAccess;

use super::CurrentActorResponse;

impl CurrentActorResponse {
    /// Creates a response from the session identity and its resolved access.
    #[must_use]
    pub fn from_identity_and_access(identity: &UserIdentity, access: &ActorAccess) -> Self {
        Self {
            actor_id: identity.actor_id().to_string(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            role: access.role().as_str().to_owned(),
            rank: access.role().rank(),
            permissions: access
                .permissions()
                .granted()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            has_permission_overrides: access.has_overrides(),
        }
    }
}
