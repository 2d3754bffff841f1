//! Configuration module for handling environment variables and .env files

use crate::client::token::{DO_NOT_TRACK_DEVICE_ID, TOKEN_ENDPOINT_URL};
use crate::client::{RedditClientError, Session, Token, DEFAULT_USER_AGENT};
use chrono_tz::Tz;
use dotenv::dotenv;
use log::{debug, info};
use std::env;

/// Application configuration derived from environment variables and .env file
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Reddit API credentials
    pub client_id: Option<String>,
    pub device_id: String,

    // Reddit API settings
    pub user_agent: String,
    pub base_url: Option<String>,
    pub token_endpoint: String,

    // OAuth token (if provided directly)
    pub access_token: Option<String>,

    // Display settings
    pub timezone: Tz,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            device_id: DO_NOT_TRACK_DEVICE_ID.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: None,
            token_endpoint: TOKEN_ENDPOINT_URL.to_string(),
            access_token: None,
            timezone: chrono_tz::America::Los_Angeles,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn load() -> Result<Self, RedditClientError> {
        // Try to load .env file, but continue even if it doesn't exist
        match dotenv() {
            Ok(_) => info!("Loaded environment from .env file"),
            Err(_) => debug!("No .env file found, using system environment variables only"),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, RedditClientError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.client_id = get("REDDIT_CLIENT_ID");
        config.access_token = get("REDDIT_ACCESS_TOKEN");
        config.base_url = get("REDDIT_BASE_URL");

        if let Some(device_id) = get("REDDIT_DEVICE_ID") {
            config.device_id = device_id;
        }

        // User agent - use environment variable if available, otherwise use default
        if let Some(user_agent) = get("REDDIT_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Some(endpoint) = get("REDDIT_TOKEN_ENDPOINT") {
            config.token_endpoint = endpoint;
        }

        if let Some(zone) = get("REDDIT_TIMEZONE") {
            config.timezone = zone.parse::<Tz>().map_err(|e| {
                RedditClientError::Config(format!("REDDIT_TIMEZONE {:?}: {}", zone, e))
            })?;
        }

        Ok(config)
    }

    /// Get client ID, failing if not set
    pub fn require_client_id(&self) -> Result<&str, RedditClientError> {
        self.client_id.as_deref().ok_or_else(|| {
            RedditClientError::Config("REDDIT_CLIENT_ID environment variable must be set".to_string())
        })
    }

    /// Create a Session from this configuration.
    ///
    /// A supplied access token wins; otherwise, when `app_only` is set, an
    /// application-only token is requested with the client id. Without
    /// either the session is anonymous.
    pub async fn create_session(&self, app_only: bool) -> Result<Session, RedditClientError> {
        let anonymous = Session::with_user_agent(None, &self.user_agent)?;

        let token = match (&self.access_token, app_only) {
            (Some(token), _) => Some(Token::new(token)),
            (None, true) => {
                let client_id = self.require_client_id()?;
                info!("Requesting application-only token");
                let token = Token::app_only(
                    anonymous.transport().as_ref(),
                    &self.token_endpoint,
                    client_id,
                    &self.device_id,
                )
                .await?;
                Some(token)
            }
            (None, false) => None,
        };

        let session = match token {
            Some(token) => Session::with_transport(Some(token), anonymous.transport()),
            None => anonymous,
        };

        Ok(match &self.base_url {
            Some(base_url) => session.with_base_url(base_url),
            None => session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config should load");
        assert!(config.client_id.is_none());
        assert_eq!(config.device_id, DO_NOT_TRACK_DEVICE_ID);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timezone, chrono_tz::America::Los_Angeles);
        assert!(config.require_client_id().is_err());
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("REDDIT_CLIENT_ID", "abc"),
            ("REDDIT_USER_AGENT", "test-agent/1.0"),
            ("REDDIT_ACCESS_TOKEN", "   "),
            ("REDDIT_TIMEZONE", "Europe/Oslo"),
        ]))
        .expect("config should load");
        assert_eq!(config.require_client_id(), Ok("abc"));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert!(config.access_token.is_none(), "blank values are unset");
        assert_eq!(config.timezone, chrono_tz::Europe::Oslo);
    }

    #[test]
    fn invalid_timezone_is_a_config_error() {
        let result = AppConfig::from_lookup(lookup(&[("REDDIT_TIMEZONE", "Mars/Olympus")]));
        assert!(matches!(result, Err(RedditClientError::Config(_))));
    }

    #[tokio::test]
    async fn anonymous_session_uses_public_endpoint() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config should load");
        let session = config.create_session(false).await.expect("session");
        assert!(session.token().is_none());
        assert_eq!(session.base_url(), crate::client::PUBLIC_ENDPOINT_URL);
    }

    #[tokio::test]
    async fn supplied_token_selects_oauth_endpoint() {
        let config = AppConfig::from_lookup(lookup(&[("REDDIT_ACCESS_TOKEN", "tok")]))
            .expect("config should load");
        let session = config.create_session(true).await.expect("session");
        assert_eq!(session.token().map(Token::access_token), Some("tok"));
        assert_eq!(session.base_url(), crate::client::OAUTH_ENDPOINT_URL);
    }
}
