pub mod decode;
pub mod error;
pub mod rate_limit;
pub mod request;
pub mod task;
pub mod token;
pub mod transport;

use crate::client::decode::FromRedditValue;
use crate::models::{
    CommentSort, Link, LinkSortType, Listing, Paginator, SubredditName, TimeFilterWithin,
};
use log::debug;
use reqwest::Method;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

pub use error::RedditClientError;
pub use rate_limit::{RateLimit, RateLimitTracker};
pub use request::{ApiRequest, Parameters};
pub use task::{DataTask, TaskState};
pub use token::Token;
pub use transport::{RawResponse, ReqwestTransport, Transport};

/// Base URL used when the session holds a token.
pub const OAUTH_ENDPOINT_URL: &str = "https://oauth.reddit.com/";
/// Base URL used for anonymous sessions.
pub const PUBLIC_ENDPOINT_URL: &str = "https://www.reddit.com/";
pub const DEFAULT_USER_AGENT: &str = "redstream/0.1 (listing reader)";
/// Page size used when the caller does not pick one.
pub const DEFAULT_LIMIT: u32 = 25;

/// Options for [`Session::get_list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: LinkSortType,
    /// Only sent for `top` and `controversial`.
    pub time_filter: TimeFilterWithin,
    pub limit: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: LinkSortType::Hot,
            time_filter: TimeFilterWithin::Day,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Options for [`Session::get_articles`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleOptions {
    pub sort: CommentSort,
    /// ID36s of comments to focus on.
    pub comments: Vec<String>,
    /// Maximum depth of subtrees in the thread.
    pub depth: Option<u32>,
    /// Maximum number of comments to return.
    pub limit: Option<u32>,
}

/// Session to communicate with reddit.
///
/// Holds the token and base URL, and owns the rate-limit counters updated by
/// every completed call. Each endpoint method builds its request
/// synchronously, spawns the call on the current Tokio runtime and returns a
/// [`DataTask`]. The completion callback runs on the runtime's worker thread
/// that finishes the call, exactly once, unless the task was cancelled first.
#[derive(Clone)]
pub struct Session {
    token: Option<Token>,
    base_url: String,
    transport: Arc<dyn Transport>,
    rate_limit: Arc<RateLimitTracker>,
    next_task_id: Arc<AtomicU64>,
}

impl Session {
    /// Create a session backed by reqwest. With a token the OAuth endpoint
    /// is used, otherwise the public one.
    pub fn new(token: Option<Token>) -> Result<Self, RedditClientError> {
        Self::with_user_agent(token, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(
        token: Option<Token>,
        user_agent: &str,
    ) -> Result<Self, RedditClientError> {
        let transport = ReqwestTransport::new(user_agent)?;
        Ok(Self::with_transport(token, Arc::new(transport)))
    }

    pub fn with_transport(token: Option<Token>, transport: Arc<dyn Transport>) -> Self {
        let base_url = if token.is_some() {
            debug!("Using OAuth API endpoint with access token");
            OAUTH_ENDPOINT_URL
        } else {
            debug!("Using public API endpoint (no access token)");
            PUBLIC_ENDPOINT_URL
        };
        Self {
            token,
            base_url: base_url.to_string(),
            transport,
            rate_limit: Arc::new(RateLimitTracker::new()),
            next_task_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Point the session at another endpoint, e.g. a mock server.
    /// The URL is validated when requests are built.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Rate-limit counters from the most recently completed call.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit.current()
    }

    /// Get Links from the front page or a subreddit.
    ///
    /// The time filter is only sent for `top` and `controversial`.
    pub fn get_list<F>(
        &self,
        paginator: &Paginator,
        subreddit: Option<&SubredditName>,
        options: &ListOptions,
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        F: FnOnce(Result<Listing, RedditClientError>) + Send + 'static,
    {
        let mut params = Parameters::new();
        params.insert("limit".to_string(), options.limit.to_string());
        params.insert("show".to_string(), "all".to_string());
        if options.sort.uses_time_filter() {
            params.insert("t".to_string(), options.time_filter.param().to_string());
        }
        paginator.add_parameters(&mut params);

        let prefix = subreddit_prefix(subreddit)?;
        let path = format!("{}/{}.json", prefix, options.sort.path());
        let request = self.build_request(&path, &params)?;
        self.dispatch(request, completion)
    }

    /// Get the comment tree for an article, given the link's ID36.
    ///
    /// Delivers the link's own listing first and its comments second.
    pub fn get_articles<F>(
        &self,
        article_id: &str,
        options: &ArticleOptions,
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        F: FnOnce(Result<(Listing, Listing), RedditClientError>) + Send + 'static,
    {
        let mut params = Parameters::new();
        params.insert("sort".to_string(), options.sort.param().to_string());
        params.insert("showmore".to_string(), "True".to_string());
        if let Some(depth) = options.depth {
            params.insert("depth".to_string(), depth.to_string());
        }
        if let Some(limit) = options.limit {
            params.insert("limit".to_string(), limit.to_string());
        }
        if !options.comments.is_empty() {
            params.insert("comment".to_string(), options.comments.join(","));
        }

        let path = format!("/comments/{}.json", require_article_id(article_id)?);
        let request = self.build_request(&path, &params)?;
        self.dispatch(request, completion)
    }

    /// Related page: a search using the article's title as the query.
    pub fn get_related_articles<F>(
        &self,
        paginator: &Paginator,
        article_id: &str,
        limit: u32,
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        F: FnOnce(Result<(Listing, Listing), RedditClientError>) + Send + 'static,
    {
        self.get_article_neighbours("related", paginator, article_id, limit, completion)
    }

    /// Other submissions of the same URL.
    pub fn get_duplicated_articles<F>(
        &self,
        paginator: &Paginator,
        article_id: &str,
        limit: u32,
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        F: FnOnce(Result<(Listing, Listing), RedditClientError>) + Send + 'static,
    {
        self.get_article_neighbours("duplicates", paginator, article_id, limit, completion)
    }

    fn get_article_neighbours<F>(
        &self,
        action: &str,
        paginator: &Paginator,
        article_id: &str,
        limit: u32,
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        F: FnOnce(Result<(Listing, Listing), RedditClientError>) + Send + 'static,
    {
        let mut params = Parameters::new();
        params.insert("limit".to_string(), limit.to_string());
        params.insert("show".to_string(), "all".to_string());
        paginator.add_parameters(&mut params);

        let path = format!("/{}/{}", action, require_article_id(article_id)?);
        let request = self.build_request(&path, &params)?;
        self.dispatch(request, completion)
    }

    /// Get a listing of things by fullname, e.g. `t3_abc`.
    pub fn get_things_by_fullname<I, S, F>(
        &self,
        fullnames: I,
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(Result<Listing, RedditClientError>) + Send + 'static,
    {
        let joined = fullnames
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        if joined.is_empty() {
            return Err(RedditClientError::UrlConstruction(
                "no fullnames to look up".to_string(),
            ));
        }

        let path = format!("/by_id/{}", joined);
        let request = self.build_request(&path, &Parameters::new())?;
        self.dispatch(request, completion)
    }

    /// Get a listing of Links by their fullnames.
    pub fn get_links_by_id<F>(
        &self,
        links: &[Link],
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        F: FnOnce(Result<Listing, RedditClientError>) + Send + 'static,
    {
        self.get_things_by_fullname(links.iter().map(|link| link.name.as_str()), completion)
    }

    /// A random link, optionally from one subreddit.
    ///
    /// reddit answers this endpoint with a redirect that does not always
    /// resolve to a comment page. The transport's redirect handling applies
    /// and whatever the decoder makes of the final response is delivered.
    pub fn get_random<F>(
        &self,
        subreddit: Option<&SubredditName>,
        completion: F,
    ) -> Result<DataTask, RedditClientError>
    where
        F: FnOnce(Result<(Listing, Listing), RedditClientError>) + Send + 'static,
    {
        let path = format!("{}/random", subreddit_prefix(subreddit)?);
        let request = self.build_request(&path, &Parameters::new())?;
        self.dispatch(request, completion)
    }

    fn build_request(
        &self,
        path: &str,
        params: &Parameters,
    ) -> Result<ApiRequest, RedditClientError> {
        ApiRequest::build(
            &self.base_url,
            path,
            Some(params),
            Method::GET,
            self.token.as_ref().map(Token::access_token),
        )
    }

    /// Spawn transport, rate-limit update, decoding and delivery as one task.
    fn dispatch<T, F>(&self, request: ApiRequest, completion: F) -> Result<DataTask, RedditClientError>
    where
        T: FromRedditValue + Send + 'static,
        F: FnOnce(Result<T, RedditClientError>) + Send + 'static,
    {
        let runtime =
            Handle::try_current().map_err(|e| RedditClientError::Runtime(e.to_string()))?;
        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let state = Arc::new(task::SharedState::default());

        let transport = Arc::clone(&self.transport);
        let rate_limit = Arc::clone(&self.rate_limit);
        let task_state = Arc::clone(&state);
        debug!("Dispatching task {}: {} {}", id, request.method, request.url);

        let handle = runtime.spawn(async move {
            let outcome = transport.execute(request).await;
            if task_state.get() == TaskState::Cancelled {
                debug!("Task {} was cancelled, dropping response", id);
                return;
            }

            if let Ok(response) = &outcome {
                rate_limit.update(&response.headers);
            }

            let result = decode::decode::<T>(outcome);
            let terminal = if result.is_ok() {
                TaskState::Succeeded
            } else {
                TaskState::Failed
            };
            if !task_state.finish(terminal) {
                debug!("Task {} was cancelled during decoding", id);
                return;
            }

            match &result {
                Ok(_) => debug!("Task {} succeeded", id),
                Err(e) => debug!("Task {} failed: {}", id, e),
            }
            completion(result);
        });

        Ok(DataTask::new(id, state, handle))
    }
}

/// `/r/<name>` for a subreddit, empty for the front page.
fn subreddit_prefix(subreddit: Option<&SubredditName>) -> Result<String, RedditClientError> {
    match subreddit {
        Some(name) if name.as_str().is_empty() => Err(RedditClientError::UrlConstruction(
            "subreddit name is empty".to_string(),
        )),
        Some(name) => Ok(name.path()),
        None => Ok(String::new()),
    }
}

fn require_article_id(article_id: &str) -> Result<&str, RedditClientError> {
    let id = article_id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(RedditClientError::UrlConstruction(format!(
            "invalid article id {:?}",
            article_id
        )));
    }
    Ok(id)
}
