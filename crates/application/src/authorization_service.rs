use std::sync::Arc;

use reelnet_core::{ActorId, AppResult, UserIdentity};
use reelnet_domain::{
    AccessRequirement, ActorAccess, Decision, Role, SessionContext, authorize, authorize_all,
};

use crate::RoleAssignmentRepository;

/// Application service resolving session context and evaluating access requirements.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn RoleAssignmentRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleAssignmentRepository>) -> Self {
        Self { repository }
    }

    /// Builds the session context for an optional authenticated identity.
    ///
    /// Actors without an active assignment resolve to the `user` role.
    pub async fn resolve_session(
        &self,
        identity: Option<&UserIdentity>,
    ) -> AppResult<SessionContext> {
        match identity {
            None => Ok(SessionContext::Anonymous),
            Some(identity) => Ok(SessionContext::Actor(
                self.resolve_actor_access(identity.actor_id()).await?,
            )),
        }
    }

    /// Resolves effective privileges for one actor.
    pub async fn resolve_actor_access(&self, actor_id: &ActorId) -> AppResult<ActorAccess> {
        Ok(self
            .repository
            .find_active_assignment(actor_id)
            .await?
            .map(|assignment| assignment.to_access())
            .unwrap_or_else(|| ActorAccess::new(actor_id.clone(), Role::User, None)))
    }

    /// Evaluates one requirement for the session.
    #[must_use]
    pub fn authorize(&self, session: &SessionContext, requirement: AccessRequirement) -> Decision {
        authorize(session, requirement)
    }

    /// Evaluates a conjunction of requirements for the session.
    #[must_use]
    pub fn authorize_all(
        &self,
        session: &SessionContext,
        requirements: &[AccessRequirement],
    ) -> Decision {
        authorize_all(session, requirements)
    }

    /// Ensures the session satisfies the requirement.
    pub fn require(&self, session: &SessionContext, requirement: AccessRequirement) -> AppResult<()> {
        Ok(authorize(session, requirement).into_result()?)
    }
}
