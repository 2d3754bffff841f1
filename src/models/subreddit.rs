use serde::Deserialize;
use std::fmt;

/// Subreddit data, kind `t5`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Subreddit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub public_description: String,
    pub subscribers: Option<u64>,
    #[serde(default)]
    pub over18: bool,
    #[serde(default)]
    pub url: String,
}

/// Name of a subreddit used to scope a request path, e.g. `rust` for `/r/rust`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubredditName(String);

impl SubredditName {
    /// Accepts `rust`, `r/rust` or `/r/rust`.
    pub fn new(name: &str) -> Self {
        let trimmed = name.trim().trim_start_matches('/');
        let bare = trimmed.strip_prefix("r/").unwrap_or(trimmed);
        Self(bare.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path prefix for requests scoped to this subreddit.
    pub fn path(&self) -> String {
        format!("/r/{}", self.0)
    }
}

impl fmt::Display for SubredditName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "r/{}", self.0)
    }
}

impl From<&Subreddit> for SubredditName {
    fn from(subreddit: &Subreddit) -> Self {
        Self::new(&subreddit.display_name)
    }
}
