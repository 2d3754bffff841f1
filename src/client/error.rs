//! Error taxonomy shared by every stage of the request pipeline.

use thiserror::Error;

/// Failure kinds surfaced by the Reddit client.
///
/// Every stage of the pipeline returns `Result<_, RedditClientError>` and the
/// first failure is the one delivered to the caller. The client only
/// classifies failures; user-facing messaging is left to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedditClientError {
    /// The base URL, path or parameters could not form a valid request.
    #[error("could not construct request: {0}")]
    UrlConstruction(String),

    /// The transport failed or the server answered with a non-2xx status.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered successfully but sent no body.
    #[error("response contained no data")]
    EmptyData,

    /// The body was not valid JSON.
    #[error("malformed JSON: {0}")]
    JsonParse(String),

    /// The JSON was neither a tagged object nor a pair of tagged objects.
    #[error("unexpected response shape: {0}")]
    ShapeMismatch(String),

    /// The tagged value had an unsupported kind or malformed fields.
    #[error("unexpected kind or fields: {0}")]
    KindMismatch(String),

    /// reddit refused to issue an access token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Required configuration was missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// No Tokio runtime was available to dispatch the request on.
    #[error("no async runtime available: {0}")]
    Runtime(String),
}

impl From<serde_json::Error> for RedditClientError {
    fn from(err: serde_json::Error) -> Self {
        RedditClientError::JsonParse(err.to_string())
    }
}

impl From<url::ParseError> for RedditClientError {
    fn from(err: url::ParseError) -> Self {
        RedditClientError::UrlConstruction(err.to_string())
    }
}
