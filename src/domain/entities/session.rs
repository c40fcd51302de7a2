//! Session state and authentication inputs.

use std::fmt;

use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{AuthToken, SessionUser, TokenPair};

/// In-memory view of the signed-in session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Signed-in identity.
    pub user: Option<SessionUser>,
    /// Credential stamped on outgoing requests.
    pub access_token: Option<AuthToken>,
    /// Credential used to mint new access tokens.
    pub refresh_token: Option<AuthToken>,
}

impl Session {
    /// Creates an authenticated session.
    #[must_use]
    pub fn authenticated(user: SessionUser, tokens: TokenPair) -> Self {
        Self {
            user: Some(user),
            access_token: Some(tokens.access),
            refresh_token: Some(tokens.refresh),
        }
    }

    /// Requires both an identity and an access token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    /// Returns whether nothing is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user.is_none() && self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Authenticated user.
    pub user: SessionUser,
    /// Issued tokens.
    pub tokens: TokenPair,
}

/// Email and password submitted to the login endpoint.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Creates new credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns names of empty required fields.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.is_empty() {
            missing.push("email");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Body of the change-password endpoint.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    current_password: String,
    new_password: String,
}

impl PasswordChange {
    /// Creates new password change.
    #[must_use]
    pub fn new(current_password: impl Into<String>, new_password: impl Into<String>) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
        }
    }

    /// Returns a reason the change would be rejected locally.
    #[must_use]
    pub fn problem(&self) -> Option<&'static str> {
        if self.current_password.is_empty() {
            Some("current password is required")
        } else if self.new_password.is_empty() {
            Some("new password is required")
        } else if self.new_password == self.current_password {
            Some("new password must differ from the current one")
        } else {
            None
        }
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}
