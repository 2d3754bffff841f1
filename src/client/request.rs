//! Construction of authenticated API requests.

use crate::client::error::RedditClientError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use std::collections::BTreeMap;
use url::form_urlencoded;
use url::Url;

/// Query or form parameters, kept sorted so requests are deterministic.
pub type Parameters = BTreeMap<String, String>;

/// A fully formed request ready to hand to a [`Transport`](crate::client::transport::Transport).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl ApiRequest {
    /// Build a request from a base URL, an absolute path and parameters.
    ///
    /// For `GET` and `DELETE` the parameters are encoded into the query
    /// string; for other methods they become an
    /// `application/x-www-form-urlencoded` body. When `token` is given it is
    /// sent as a bearer `Authorization` header.
    pub fn build(
        base_url: &str,
        path: &str,
        parameters: Option<&Parameters>,
        method: Method,
        token: Option<&str>,
    ) -> Result<Self, RedditClientError> {
        if base_url.trim().is_empty() {
            return Err(RedditClientError::UrlConstruction(
                "base URL is empty".to_string(),
            ));
        }
        if !path.starts_with('/') {
            return Err(RedditClientError::UrlConstruction(format!(
                "path must be absolute: {}",
                path
            )));
        }

        let mut url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            return Err(RedditClientError::UrlConstruction(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        let joined_path = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined_path);
        url.set_query(None);

        let mut body = None;
        let mut headers = HeaderMap::new();

        if let Some(parameters) = parameters.filter(|p| !p.is_empty()) {
            if Self::uses_query_string(&method) {
                let mut pairs = url.query_pairs_mut();
                for (name, value) in parameters {
                    pairs.append_pair(name, value);
                }
            } else {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(parameters.iter())
                    .finish();
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                body = Some(encoded);
            }
        }

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                RedditClientError::UrlConstruction(format!("invalid access token: {}", e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        debug!("Built {} request for {}", method, url);

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }

    fn uses_query_string(method: &Method) -> bool {
        *method == Method::GET || *method == Method::DELETE || *method == Method::HEAD
    }

    /// Returns the decoded value of a query parameter, if present.
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}
