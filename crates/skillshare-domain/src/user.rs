//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User permission level.
///
/// Wire format: lowercase string (`"user"`, `"moderator"`, `"admin"`), both in
/// JSON bodies and in the `role` claim of access tokens. Variants are declared
/// in privilege order so `Ord` ranks them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Moderator,
    Admin,
}

/// Returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// `true` for moderator and admin.
    pub fn is_privileged(self) -> bool {
        self >= Self::Moderator
    }

    /// Role granted at self-registration. Privileged roles cannot be
    /// self-assigned and fall back to [`UserRole::User`].
    pub fn for_registration(requested: Option<Self>) -> Self {
        match requested {
            Some(role) if !role.is_privileged() => role,
            _ => Self::User,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
