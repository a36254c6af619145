use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use reelnet_core::AppError;
use serde::{Deserialize, Serialize};

/// Fine-grained capabilities checked independently of role rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows managing member accounts.
    ManageUsers,
    /// Allows managing any published content.
    ManageContent,
    /// Allows moderating member-submitted content.
    ModerateContent,
    /// Allows managing articles, news and reviews.
    ManageArticles,
    /// Allows managing homepage banners.
    ManageBanners,
    /// Allows managing advertisement placements.
    ManageAds,
    /// Allows managing comments.
    ManageComments,
    /// Allows changing system settings.
    ManageSystem,
    /// Allows assigning and revoking roles.
    ManageRoles,
    /// Allows permanently deleting content.
    DeleteContent,
    /// Allows reading analytics dashboards.
    ViewAnalytics,
    /// Allows reading moderation reports and the audit log.
    ViewReports,
    /// Allows reading premium-only content.
    ViewPremiumContent,
    /// Routes support requests to the priority queue.
    PrioritySupport,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => "manage_users",
            Self::ManageContent => "manage_content",
            Self::ModerateContent => "moderate_content",
            Self::ManageArticles => "manage_articles",
            Self::ManageBanners => "manage_banners",
            Self::ManageAds => "manage_ads",
            Self::ManageComments => "manage_comments",
            Self::ManageSystem => "manage_system",
            Self::ManageRoles => "manage_roles",
            Self::DeleteContent => "delete_content",
            Self::ViewAnalytics => "view_analytics",
            Self::ViewReports => "view_reports",
            Self::ViewPremiumContent => "view_premium_content",
            Self::PrioritySupport => "priority_support",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ManageUsers,
            Permission::ManageContent,
            Permission::ModerateContent,
            Permission::ManageArticles,
            Permission::ManageBanners,
            Permission::ManageAds,
            Permission::ManageComments,
            Permission::ManageSystem,
            Permission::ManageRoles,
            Permission::DeleteContent,
            Permission::ViewAnalytics,
            Permission::ViewReports,
            Permission::ViewPremiumContent,
            Permission::PrioritySupport,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

/// Total mapping of every [`Permission`] to a granted flag.
///
/// Every constructor fills the full catalog, so lookups never miss a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Permission, bool>",
    into = "BTreeMap<Permission, bool>"
)]
pub struct PermissionSet {
    grants: BTreeMap<Permission, bool>,
}

impl PermissionSet {
    /// Creates a set with every permission denied.
    #[must_use]
    pub fn none() -> Self {
        Self::from_fn(|_| false)
    }

    /// Creates a set with every permission granted.
    #[must_use]
    pub fn all() -> Self {
        Self::from_fn(|_| true)
    }

    /// Creates a set by evaluating `granted` for every known permission.
    #[must_use]
    pub fn from_fn(mut granted: impl FnMut(Permission) -> bool) -> Self {
        Self {
            grants: Permission::all()
                .iter()
                .map(|permission| (*permission, granted(*permission)))
                .collect(),
        }
    }

    /// Creates a set granting exactly the listed permissions.
    #[must_use]
    pub fn from_granted(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut set = Self::none();
        for permission in permissions {
            set.set(permission, true);
        }

        set
    }

    /// Returns whether the permission is granted.
    #[must_use]
    pub fn is_granted(&self, permission: Permission) -> bool {
        self.grants.get(&permission).copied().unwrap_or(false)
    }

    /// Updates the flag for one permission.
    pub fn set(&mut self, permission: Permission, granted: bool) {
        self.grants.insert(permission, granted);
    }

    /// Returns granted permissions in catalog order.
    pub fn granted(&self) -> impl Iterator<Item = Permission> + '_ {
        self.grants
            .iter()
            .filter_map(|(permission, granted)| granted.then_some(*permission))
    }

    /// Returns every permission with its flag.
    pub fn iter(&self) -> impl Iterator<Item = (Permission, bool)> + '_ {
        self.grants
            .iter()
            .map(|(permission, granted)| (*permission, *granted))
    }

    /// Returns whether no permission is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.granted().next().is_none()
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::none()
    }
}

impl From<BTreeMap<Permission, bool>> for PermissionSet {
    fn from(value: BTreeMap<Permission, bool>) -> Self {
        Self::from_fn(|permission| value.get(&permission).copied().unwrap_or(false))
    }
}

impl From<PermissionSet> for BTreeMap<Permission, bool> {
    fn from(value: PermissionSet) -> Self {
        value.grants
    }
}
