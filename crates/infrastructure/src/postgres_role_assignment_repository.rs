use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use reelnet_application::{
    NewRoleAssignment, RoleAssignment, RoleAssignmentQuery, RoleAssignmentRepository,
};
use reelnet_core::{ActorId, AppError, AppResult};
use reelnet_domain::{Permission, PermissionSet, Role};

const ASSIGNMENT_COLUMNS: &str = r#"
    assignment_id,
    actor_id,
    role,
    permission_overrides,
    assigned_by,
    assigned_at,
    is_active,
    revoked_by,
    revoked_at
"#;

/// PostgreSQL-backed role assignment repository.
///
/// `actor_roles` holds one row per actor keyed by `actor_id`; superseded rows
/// are copied into `actor_role_history` inside the same transaction.
#[derive(Clone)]
pub struct PostgresRoleAssignmentRepository {
    pool: PgPool,
}

impl PostgresRoleAssignmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ActorRoleRow {
    assignment_id: Uuid,
    actor_id: String,
    role: String,
    permission_overrides: Option<Vec<String>>,
    assigned_by: String,
    assigned_at: DateTime<Utc>,
    is_active: bool,
    revoked_by: Option<String>,
    revoked_at: Option<DateTime<Utc>>,
}

impl ActorRoleRow {
    fn into_assignment(self) -> AppResult<RoleAssignment> {
        let role = Role::from_str(self.role.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "persisted assignment '{}' is corrupt: {error}",
                self.assignment_id
            ))
        })?;

        let permission_overrides = self
            .permission_overrides
            .map(|values| parse_overrides(self.assignment_id, values))
            .transpose()?;

        Ok(RoleAssignment {
            assignment_id: self.assignment_id,
            actor_id: stored_actor_id(self.actor_id)?,
            role,
            permission_overrides,
            assigned_by: stored_actor_id(self.assigned_by)?,
            assigned_at: self.assigned_at,
            is_active: self.is_active,
            revoked_by: self.revoked_by.map(stored_actor_id).transpose()?,
            revoked_at: self.revoked_at,
        })
    }
}

fn parse_overrides(assignment_id: Uuid, values: Vec<String>) -> AppResult<PermissionSet> {
    let permissions = values
        .iter()
        .map(|value| Permission::from_transport(value.as_str()))
        .collect::<AppResult<Vec<_>>>()
        .map_err(|error| {
            AppError::Internal(format!(
                "persisted overrides for assignment '{assignment_id}' are corrupt: {error}"
            ))
        })?;

    Ok(PermissionSet::from_granted(permissions))
}

fn stored_actor_id(value: String) -> AppResult<ActorId> {
    ActorId::new(value)
        .map_err(|error| AppError::Internal(format!("persisted actor id is corrupt: {error}")))
}

fn overrides_to_storage(overrides: Option<&PermissionSet>) -> Option<Vec<String>> {
    overrides.map(|set| {
        set.granted()
            .map(|permission| permission.as_str().to_owned())
            .collect()
    })
}

fn into_assignments(rows: Vec<ActorRoleRow>) -> AppResult<Vec<RoleAssignment>> {
    rows.into_iter().map(ActorRoleRow::into_assignment).collect()
}

#[async_trait]
impl RoleAssignmentRepository for PostgresRoleAssignmentRepository {
    async fn find_active_assignment(
        &self,
        actor_id: &ActorId,
    ) -> AppResult<Option<RoleAssignment>> {
        let row = sqlx::query_as::<_, ActorRoleRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM actor_roles WHERE actor_id = $1 AND is_active"
        ))
        .bind(actor_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find role assignment for actor '{actor_id}': {error}"
            ))
        })?;

        row.map(ActorRoleRow::into_assignment).transpose()
    }

    async fn upsert_active_assignment(
        &self,
        input: NewRoleAssignment,
    ) -> AppResult<RoleAssignment> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        // Serializes writers for the same actor, including the first insert.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(input.actor_id.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock actor role row: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO actor_role_history (
                assignment_id,
                actor_id,
                role,
                permission_overrides,
                assigned_by,
                assigned_at,
                revoked_by,
                revoked_at
            )
            SELECT
                assignment_id,
                actor_id,
                role,
                permission_overrides,
                assigned_by,
                assigned_at,
                revoked_by,
                revoked_at
            FROM actor_roles
            WHERE actor_id = $1
            ON CONFLICT (assignment_id) DO NOTHING
            "#,
        )
        .bind(input.actor_id.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to archive superseded assignment: {error}"))
        })?;

        let row = sqlx::query_as::<_, ActorRoleRow>(&format!(
            r#"
            INSERT INTO actor_roles (
                actor_id,
                assignment_id,
                role,
                permission_overrides,
                assigned_by,
                assigned_at,
                is_active,
                revoked_by,
                revoked_at
            )
            VALUES ($1, $2, $3, $4, $5, now(), true, NULL, NULL)
            ON CONFLICT (actor_id) DO UPDATE
            SET
                assignment_id = EXCLUDED.assignment_id,
                role = EXCLUDED.role,
                permission_overrides = EXCLUDED.permission_overrides,
                assigned_by = EXCLUDED.assigned_by,
                assigned_at = EXCLUDED.assigned_at,
                is_active = true,
                revoked_by = NULL,
                revoked_at = NULL
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        ))
        .bind(input.actor_id.as_str())
        .bind(Uuid::new_v4())
        .bind(input.role.as_str())
        .bind(overrides_to_storage(input.permission_overrides.as_ref()))
        .bind(input.assigned_by.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            warn!(error = %error, actor_id = %input.actor_id, "role assignment upsert failed");
            AppError::Internal(format!("failed to persist role assignment: {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        row.into_assignment()
    }

    async fn deactivate_assignment(
        &self,
        actor_id: &ActorId,
        revoked_by: &ActorId,
    ) -> AppResult<Option<RoleAssignment>> {
        let row = sqlx::query_as::<_, ActorRoleRow>(&format!(
            r#"
            UPDATE actor_roles
            SET
                is_active = false,
                revoked_by = $2,
                revoked_at = now()
            WHERE actor_id = $1
                AND is_active
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        ))
        .bind(actor_id.as_str())
        .bind(revoked_by.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to revoke role assignment for actor '{actor_id}': {error}"
            ))
        })?;

        row.map(ActorRoleRow::into_assignment).transpose()
    }

    async fn list_active_assignments(
        &self,
        query: RoleAssignmentQuery,
    ) -> AppResult<Vec<RoleAssignment>> {
        let capped_limit = query.limit.clamp(1, 500) as i64;
        let capped_offset = query.offset.min(10_000) as i64;
        let rows = sqlx::query_as::<_, ActorRoleRow>(&format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
            FROM actor_roles
            WHERE is_active
                AND ($1::TEXT IS NULL OR role = $1)
            ORDER BY actor_id
            LIMIT $2
            OFFSET $3
            "#
        ))
        .bind(query.role.map(|role| role.as_str()))
        .bind(capped_limit)
        .bind(capped_offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role assignments: {error}"))
        })?;

        into_assignments(rows)
    }

    async fn list_assignment_history(&self, actor_id: &ActorId) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, ActorRoleRow>(&format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
            FROM actor_roles
            WHERE actor_id = $1
            UNION ALL
            SELECT
                assignment_id,
                actor_id,
                role,
                permission_overrides,
                assigned_by,
                assigned_at,
                false AS is_active,
                revoked_by,
                revoked_at
            FROM actor_role_history
            WHERE actor_id = $1
            ORDER BY assigned_at DESC, assignment_id
            "#
        ))
        .bind(actor_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list role assignment history for actor '{actor_id}': {error}"
            ))
        })?;

        into_assignments(rows)
    }
}

#[cfg(test)]
mod tests;
