//! Default permission grants per role.

use std::str::FromStr;

use crate::{InvalidRoleError, Permission, PermissionSet, Role};

/// Returns whether `role` holds `permission` when no override is assigned.
///
/// The match is exhaustive over permissions so adding a capability forces a
/// decision for every role. `super_admin` holds the full catalog.
#[must_use]
pub fn grants_by_default(role: Role, permission: Permission) -> bool {
    if role == Role::SuperAdmin {
        return true;
    }

    match permission {
        Permission::ManageUsers => matches!(role, Role::Admin),
        Permission::ManageContent
        | Permission::ModerateContent
        | Permission::ManageArticles
        | Permission::ManageBanners
        | Permission::ManageAds
        | Permission::ManageComments
        | Permission::ViewAnalytics => matches!(role, Role::Admin | Role::ContentAdmin),
        Permission::ManageSystem | Permission::ManageRoles | Permission::DeleteContent => false,
        Permission::ViewReports => matches!(role, Role::Admin | Role::Moderator),
        Permission::ViewPremiumContent | Permission::PrioritySupport => {
            matches!(role, Role::PremiumUser)
        }
    }
}

/// Returns the immutable default permission set for a role.
#[must_use]
pub fn default_permissions(role: Role) -> PermissionSet {
    PermissionSet::from_fn(|permission| grants_by_default(role, permission))
}

/// Returns the default permission set for an untrusted role value.
pub fn default_permissions_for(role: &str) -> Result<PermissionSet, InvalidRoleError> {
    Role::from_str(role).map(default_permissions)
}
