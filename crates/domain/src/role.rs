use std::fmt::{Display, Formatter};
use std::str::FromStr;

use reelnet_core::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Privilege levels assignable to an actor, ordered by [`Role::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular member account.
    User,
    /// Paying member with access to premium features.
    PremiumUser,
    /// Community moderator.
    Moderator,
    /// Back-office editor for articles, banners and ads.
    ContentAdmin,
    /// Back-office administrator.
    Admin,
    /// Unrestricted operator account.
    SuperAdmin,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::PremiumUser => "premium_user",
            Self::Moderator => "moderator",
            Self::ContentAdmin => "content_admin",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Returns the privilege rank, contiguous from 1 (`user`) to 6 (`super_admin`).
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::User => 1,
            Self::PremiumUser => 2,
            Self::Moderator => 3,
            Self::ContentAdmin => 4,
            Self::Admin => 5,
            Self::SuperAdmin => 6,
        }
    }

    /// Returns whether this role is at least as privileged as `required`.
    #[must_use]
    pub fn is_at_least(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Returns all roles from least to most privileged.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::User,
            Role::PremiumUser,
            Role::Moderator,
            Role::ContentAdmin,
            Role::Admin,
            Role::SuperAdmin,
        ];

        ALL
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, InvalidRoleError> {
        Self::from_str(value)
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "premium_user" => Ok(Self::PremiumUser),
            "moderator" => Ok(Self::Moderator),
            "content_admin" => Ok(Self::ContentAdmin),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(InvalidRoleError::new(value)),
        }
    }
}

/// Raised when a role value falls outside the closed role set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role value '{value}'")]
pub struct InvalidRoleError {
    value: String,
}

impl InvalidRoleError {
    /// Creates an error for the rejected value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the rejected value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

impl From<InvalidRoleError> for AppError {
    fn from(value: InvalidRoleError) -> Self {
        AppError::Validation(value.to_string())
    }
}

/// Compares two untrusted role values by rank.
///
/// Fails instead of defaulting when either value is not a known role.
pub fn role_is_at_least(current: &str, required: &str) -> Result<bool, InvalidRoleError> {
    let current = Role::from_str(current)?;
    let required = Role::from_str(required)?;

    Ok(current.is_at_least(required))
}
