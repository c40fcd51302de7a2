//! Wire formats of the REST API.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AuthToken, PageMeta, SessionUser, TokenPair};

/// Success envelope wrapping every API payload.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Server message, often localized.
    #[serde(default)]
    pub message: String,
    /// Payload.
    pub data: T,
    /// Pagination, on list endpoints only.
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Error envelope returned with 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Server message. Some validation errors send a list.
    #[serde(default, deserialize_with = "message_or_list")]
    pub message: String,
    /// Status echoed by the server.
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Short error name such as `Unauthorized`.
    #[serde(default)]
    pub error: Option<String>,
}

fn message_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Message {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Message>::deserialize(deserializer)? {
        Some(Message::One(message)) => message,
        Some(Message::Many(messages)) => messages.join("، "),
        None => String::new(),
    })
}

/// `POST /auth/login` response data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Signed-in user.
    pub user: SessionUser,
    /// Bearer token.
    pub access_token: String,
    /// Token for renewing the pair.
    pub refresh_token: String,
}

/// `POST /auth/refresh` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody<'a> {
    /// Token being exchanged.
    pub refresh_token: &'a str,
}

/// `POST /auth/refresh` response data.
///
/// Servers that do not rotate refresh tokens omit `refreshToken`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    /// New bearer token.
    pub access_token: String,
    /// Absent when the server does not rotate it.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenData {
    /// Builds the new pair, keeping `previous` when the refresh token was not rotated.
    pub fn into_pair(self, previous: &AuthToken) -> Option<TokenPair> {
        let access = AuthToken::new(self.access_token)?;
        let refresh = self
            .refresh_token
            .and_then(AuthToken::new)
            .unwrap_or_else(|| previous.clone());
        Some(TokenPair::new(access, refresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_with_list_message() {
        let json = r#"{"message": ["title should not be empty", "slug must be unique"], "statusCode": 400, "error": "Bad Request"}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.message, "title should not be empty، slug must be unique");
        assert_eq!(envelope.status_code, Some(400));
    }

    #[test]
    fn test_error_envelope_minimal() {
        let envelope: ErrorEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.message.is_empty());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_token_data_keeps_unrotated_refresh_token() {
        let data: TokenData = serde_json::from_str(r#"{"accessToken": "new-access"}"#).unwrap();
        let pair = data.into_pair(&AuthToken::new_unchecked("old-refresh")).unwrap();

        assert_eq!(pair.access.as_str(), "new-access");
        assert_eq!(pair.refresh.as_str(), "old-refresh");
    }

    #[test]
    fn test_token_data_rejects_blank_access_token() {
        let data: TokenData = serde_json::from_str(r#"{"accessToken": " "}"#).unwrap();
        assert!(data.into_pair(&AuthToken::new_unchecked("r")).is_none());
    }
}
