//! Signed-in back-office user.

use serde::{Deserialize, Serialize};

/// Back-office role as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every section.
    #[serde(alias = "ADMIN", alias = "Admin")]
    Admin,
    /// Can manage content but not accounts.
    #[serde(alias = "EDITOR", alias = "Editor")]
    Editor,
    /// Any role this client does not know about.
    #[default]
    #[serde(other)]
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Editor => write!(f, "editor"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Identity held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(deserialize_with = "crate::domain::serde_utils::string_or_number::deserialize")]
    id: String,
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: Role,
}

impl SessionUser {
    /// Creates new user.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
        }
    }

    /// Server id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Display name as stored; may be blank.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Granted role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the user may manage every collection.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Name when set, email otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_api_payload() {
        let json = r#"{"id": 1, "email": "admin@example.com", "name": "مدير", "role": "ADMIN"}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();

        assert_eq!(user.id(), "1");
        assert_eq!(user.name(), "مدير");
        assert!(user.is_admin());
    }

    #[test]
    fn test_unknown_role_falls_back() {
        let json = r#"{"id": "u1", "email": "a@b.c", "role": "moderator"}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();

        assert_eq!(user.role(), Role::User);
        assert_eq!(user.display_name(), "a@b.c");
    }

    #[test]
    fn test_persisted_form_round_trips() {
        let user = SessionUser::new("7", "e@x.io", "Editor", Role::Editor);
        let stored = serde_json::to_string(&user).unwrap();
        let restored: SessionUser = serde_json::from_str(&stored).unwrap();

        assert_eq!(restored, user);
    }
}
