//! OAuth bearer tokens and the application-only grant.

use crate::client::decode::decode_json;
use crate::client::error::RedditClientError;
use crate::client::request::{ApiRequest, Parameters};
use crate::client::transport::Transport;
use log::debug;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Deserialize;

/// Where reddit issues access tokens.
pub const TOKEN_ENDPOINT_URL: &str = "https://www.reddit.com/";
pub const ACCESS_TOKEN_PATH: &str = "/api/v1/access_token";
pub const INSTALLED_CLIENT_GRANT: &str = "https://oauth.reddit.com/grants/installed_client";
pub const DO_NOT_TRACK_DEVICE_ID: &str = "DO_NOT_TRACK_THIS_DEVICE";

/// An issued bearer credential. Never modified after it is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    scope: String,
    #[serde(skip)]
    obtained_at: i64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Token {
    /// Wrap an access token obtained elsewhere. Its lifetime is unknown.
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            token_type: default_token_type(),
            expires_in: 0,
            scope: String::new(),
            obtained_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// True once the token is within five minutes of expiry.
    /// Tokens with an unknown lifetime never expire here.
    pub fn is_expired(&self) -> bool {
        if self.expires_in == 0 {
            return false;
        }
        let expires_at = self.obtained_at.saturating_add(self.expires_in as i64);
        chrono::Utc::now().timestamp() + 300 >= expires_at
    }

    /// Get an application-only token for reading public data.
    ///
    /// Uses the `installed_client` grant, which needs only the client id of
    /// an installed app; the Basic credentials are the client id followed by
    /// a colon. The token cannot be used for actions that need a user
    /// account.
    pub async fn app_only(
        transport: &dyn Transport,
        endpoint: &str,
        client_id: &str,
        device_id: &str,
    ) -> Result<Self, RedditClientError> {
        let mut params = Parameters::new();
        params.insert("grant_type".to_string(), INSTALLED_CLIENT_GRANT.to_string());
        params.insert("device_id".to_string(), device_id.to_string());

        let mut request =
            ApiRequest::build(endpoint, ACCESS_TOKEN_PATH, Some(&params), Method::POST, None)?;
        let auth = base64::encode(format!("{}:", client_id));
        let value = HeaderValue::from_str(&format!("Basic {}", auth))
            .map_err(|e| RedditClientError::UrlConstruction(e.to_string()))?;
        request.headers.insert(AUTHORIZATION, value);

        let outcome = transport.execute(request).await;
        if let Ok(response) = &outcome {
            if response.status == 401 || response.status == 403 {
                return Err(RedditClientError::Auth(format!(
                    "token endpoint returned status {}",
                    response.status
                )));
            }
        }

        let json = decode_json(outcome)?;
        if let Some(error) = json.get("error").and_then(|e| e.as_str()) {
            return Err(RedditClientError::Auth(error.to_string()));
        }

        let mut token: Token = serde_json::from_value(json).map_err(|e| {
            RedditClientError::Auth(format!("failed to read access token: {}", e))
        })?;
        token.obtained_at = chrono::Utc::now().timestamp();

        debug!(
            "Application-only access token obtained, expires in {}s",
            token.expires_in
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplied_token_has_unknown_lifetime() {
        let token = Token::new("abc");
        assert_eq!(token.access_token(), "abc");
        assert_eq!(token.token_type(), "bearer");
        assert!(!token.is_expired());
    }

    #[test]
    fn token_close_to_expiry_is_expired() {
        let token: Token = serde_json::from_value(serde_json::json!({
            "access_token": "abc",
            "token_type": "bearer",
            "expires_in": 60,
            "scope": "*"
        }))
        .expect("token should decode");
        // obtained_at is skipped during deserialisation, so it sits at the epoch
        assert!(token.is_expired());
    }
}
