//! Signed-in user identity.
//!
//! The auth collaborator owns sign-in and sign-out; the shopping state only
//! keeps whatever identity it was last handed. It is never persisted.

use luxemarket_core::{Email, UserId, UserRole};
use serde::{Deserialize, Serialize};

/// The authenticated shopper.
///
/// Deserializes from the auth collaborator's payload
/// (`{"id", "email", "full_name", "role"}`); a missing role means a standard
/// shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "id")]
    pub user_id: UserId,
    pub email: Email,
    #[serde(rename = "full_name", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl SessionUser {
    #[must_use]
    pub const fn new(
        user_id: UserId,
        email: Email,
        display_name: Option<String>,
        role: UserRole,
    ) -> Self {
        Self {
            user_id,
            email,
            display_name,
            role,
        }
    }

    /// Name shown in the header: the display name, or the email's local part.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.email.local_part())
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_defaults() {
        let user: SessionUser =
            serde_json::from_str(r#"{"id":"u1","email":"jo@shop.fr"}"#).unwrap();
        assert_eq!(user.role, UserRole::Standard);
        assert_eq!(user.display_name, None);
        assert_eq!(user.label(), "jo");
    }

    #[test]
    fn test_label_prefers_display_name() {
        let user = SessionUser::new(
            UserId::new("u1"),
            Email::parse("jo@shop.fr").unwrap(),
            Some("Jo Martin".to_string()),
            UserRole::Admin,
        );
        assert_eq!(user.label(), "Jo Martin");
        assert!(user.is_admin());
    }
}
