use reelnet_application::{NewRoleAssignment, RoleAssignmentQuery, RoleAssignmentRepository};
use reelnet_core::ActorId;
use reelnet_domain::{Permission, PermissionSet, Role};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresRoleAssignmentRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres role assignment tests: {error}");
    }

    Some(pool)
}

fn unique_actor(prefix: &str) -> ActorId {
    ActorId::new(format!("{prefix}-{}", Uuid::new_v4())).unwrap_or_else(|_| unreachable!())
}

fn new_assignment(actor_id: &ActorId, role: Role) -> NewRoleAssignment {
    NewRoleAssignment {
        actor_id: actor_id.clone(),
        role,
        permission_overrides: None,
        assigned_by: ActorId::new("operator").unwrap_or_else(|_| unreachable!()),
    }
}

#[tokio::test]
async fn upsert_keeps_single_active_row_and_archives_previous() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleAssignmentRepository::new(pool);
    let actor_id = unique_actor("casting");

    let first = repository
        .upsert_active_assignment(new_assignment(&actor_id, Role::ContentAdmin))
        .await;
    assert!(first.is_ok());

    let second = repository
        .upsert_active_assignment(new_assignment(&actor_id, Role::Moderator))
        .await;
    assert!(second.is_ok());

    let active = repository.find_active_assignment(&actor_id).await;
    assert_eq!(
        active.ok().flatten().map(|assignment| assignment.role),
        Some(Role::Moderator)
    );

    let history = repository
        .list_assignment_history(&actor_id)
        .await
        .unwrap_or_default();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_active);
    assert_eq!(history[0].role, Role::Moderator);
    assert!(!history[1].is_active);
    assert_eq!(history[1].role, Role::ContentAdmin);
}

#[tokio::test]
async fn overrides_round_trip_as_granted_permissions() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleAssignmentRepository::new(pool);
    let actor_id = unique_actor("editor");
    let mut input = new_assignment(&actor_id, Role::ContentAdmin);
    input.permission_overrides = Some(PermissionSet::from_granted([
        Permission::ManageArticles,
        Permission::ViewAnalytics,
    ]));

    let saved = repository.upsert_active_assignment(input).await;
    assert!(saved.is_ok());

    let found = repository
        .find_active_assignment(&actor_id)
        .await
        .ok()
        .flatten();
    let overrides = found.and_then(|assignment| assignment.permission_overrides);
    assert_eq!(
        overrides.map(|set| set.granted().collect::<Vec<_>>()),
        Some(vec![Permission::ManageArticles, Permission::ViewAnalytics])
    );
}

#[tokio::test]
async fn deactivate_marks_row_revoked_once() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleAssignmentRepository::new(pool);
    let actor_id = unique_actor("reviewer");
    let revoker = ActorId::new("operator").unwrap_or_else(|_| unreachable!());

    let saved = repository
        .upsert_active_assignment(new_assignment(&actor_id, Role::PremiumUser))
        .await;
    assert!(saved.is_ok());

    let revoked = repository
        .deactivate_assignment(&actor_id, &revoker)
        .await
        .ok()
        .flatten();
    assert!(revoked.as_ref().is_some_and(|assignment| !assignment.is_active));
    assert_eq!(
        revoked.and_then(|assignment| assignment.revoked_by),
        Some(revoker.clone())
    );

    let again = repository.deactivate_assignment(&actor_id, &revoker).await;
    assert!(matches!(again, Ok(None)));

    let active = repository.find_active_assignment(&actor_id).await;
    assert!(matches!(active, Ok(None)));
}

#[tokio::test]
async fn list_active_assignments_filters_by_role() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleAssignmentRepository::new(pool);
    let moderator = unique_actor("zz-moderator");
    let revoked = unique_actor("zz-revoked");
    let revoker = ActorId::new("operator").unwrap_or_else(|_| unreachable!());

    for (actor_id, role) in [(&moderator, Role::Moderator), (&revoked, Role::Moderator)] {
        let saved = repository
            .upsert_active_assignment(new_assignment(actor_id, role))
            .await;
        assert!(saved.is_ok());
    }
    let revoke = repository.deactivate_assignment(&revoked, &revoker).await;
    assert!(revoke.is_ok());

    let listed = repository
        .list_active_assignments(RoleAssignmentQuery {
            role: Some(Role::Moderator),
            limit: 500,
            offset: 0,
        })
        .await
        .unwrap_or_default();

    assert!(listed.iter().all(|assignment| assignment.role == Role::Moderator));
    assert!(listed.iter().any(|assignment| assignment.actor_id == moderator));
    assert!(!listed.iter().any(|assignment| assignment.actor_id == revoked));
}
