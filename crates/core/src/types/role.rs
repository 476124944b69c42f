//! User roles.

use serde::{Deserialize, Serialize};

/// Role attached to a storefront profile.
///
/// Stored by the hosted profile table as `"user"` or `"admin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    #[serde(rename = "user")]
    Standard,
    /// Can reach the catalog administration screens.
    #[serde(rename = "admin")]
    Admin,
}

impl UserRole {
    /// Whether this role grants access to catalog administration.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::Standard),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}
