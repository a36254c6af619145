use reelnet_application::{NewRoleAssignment, RoleAssignmentQuery, RoleAssignmentRepository};
use reelnet_core::ActorId;
use reelnet_domain::Role;

use super::InMemoryRoleAssignmentRepository;

fn actor(value: &str) -> ActorId {
    ActorId::new(value).unwrap_or_else(|_| unreachable!())
}

fn new_assignment(actor_id: &str, role: Role) -> NewRoleAssignment {
    NewRoleAssignment {
        actor_id: actor(actor_id),
        role,
        permission_overrides: None,
        assigned_by: actor("operator"),
    }
}

#[tokio::test]
async fn upsert_replaces_active_assignment() {
    let repository = InMemoryRoleAssignmentRepository::new();

    let first = repository
        .upsert_active_assignment(new_assignment("director", Role::PremiumUser))
        .await;
    assert!(first.is_ok());
    let second = repository
        .upsert_active_assignment(new_assignment("director", Role::Moderator))
        .await;
    assert!(second.is_ok());

    let listed = repository
        .list_active_assignments(RoleAssignmentQuery::default())
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].role, Role::Moderator);

    let history = repository
        .list_assignment_history(&actor("director"))
        .await
        .unwrap_or_default();
    let roles: Vec<Role> = history.iter().map(|assignment| assignment.role).collect();
    assert_eq!(roles, vec![Role::Moderator, Role::PremiumUser]);
    assert_eq!(
        history
            .iter()
            .filter(|assignment| assignment.is_active)
            .count(),
        1
    );
}

#[tokio::test]
async fn deactivate_hides_assignment_from_active_queries() {
    let repository = InMemoryRoleAssignmentRepository::new();
    let saved = repository
        .upsert_active_assignment(new_assignment("critic", Role::ContentAdmin))
        .await;
    assert!(saved.is_ok());

    let revoked = repository
        .deactivate_assignment(&actor("critic"), &actor("operator"))
        .await;
    assert!(matches!(revoked, Ok(Some(ref assignment)) if !assignment.is_active));

    let found = repository.find_active_assignment(&actor("critic")).await;
    assert!(matches!(found, Ok(None)));

    let repeated = repository
        .deactivate_assignment(&actor("critic"), &actor("operator"))
        .await;
    assert!(matches!(repeated, Ok(None)));

    let history = repository
        .list_assignment_history(&actor("critic"))
        .await
        .unwrap_or_default();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].revoked_by, Some(actor("operator")));
}

#[tokio::test]
async fn list_active_assignments_filters_and_paginates() {
    let repository = InMemoryRoleAssignmentRepository::new();
    for (actor_id, role) in [
        ("c-actor", Role::Moderator),
        ("a-actor", Role::Moderator),
        ("b-actor", Role::Admin),
    ] {
        let saved = repository
            .upsert_active_assignment(new_assignment(actor_id, role))
            .await;
        assert!(saved.is_ok());
    }

    let moderators = repository
        .list_active_assignments(RoleAssignmentQuery {
            role: Some(Role::Moderator),
            ..RoleAssignmentQuery::default()
        })
        .await
        .unwrap_or_default();
    let actor_ids: Vec<&str> = moderators
        .iter()
        .map(|assignment| assignment.actor_id.as_str())
        .collect();
    assert_eq!(actor_ids, vec!["a-actor", "c-actor"]);

    let second_page = repository
        .list_active_assignments(RoleAssignmentQuery {
            role: None,
            limit: 1,
            offset: 1,
        })
        .await
        .unwrap_or_default();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].actor_id.as_str(), "b-actor");
}
