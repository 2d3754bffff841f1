use crate::client::DEFAULT_LIMIT;
use crate::models::{CommentSort, LinkSortType, TimeFilterWithin};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "redstream",
    version,
    about = "Read reddit listings and comment trees from the terminal."
)]
pub struct Cli {
    /// Request an application-only token using REDDIT_CLIENT_ID.
    #[arg(long, global = true)]
    pub app_only: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Show a listing from a subreddit or the front page, one row per entry.
    Stream {
        /// The name of the subreddit to read.
        /// If not provided, the front page is read.
        #[arg(long, short, help = "Subreddit name (optional)")]
        subreddit: Option<String>,

        /// Sort order: hot, new, top or controversial.
        #[arg(long, default_value = "hot")]
        sort: LinkSortType,

        /// Time window for top and controversial: hour, day, week, month, year, all.
        #[arg(long, short, default_value = "day")]
        time: TimeFilterWithin,

        /// Number of entries per page.
        #[arg(long, short, default_value_t = DEFAULT_LIMIT)]
        limit: u32,

        /// Number of pages to fetch.
        #[arg(long, short, default_value_t = 1)]
        pages: u32,

        /// Start after this fullname, e.g. t3_abc123.
        #[arg(long)]
        after: Option<String>,

        /// Display entries in a brief, one-line format.
        #[arg(long, short)]
        brief: bool,
    },

    /// Show an article and its comment tree.
    Comments {
        /// ID36 of the article (t3_ prefix optional).
        #[arg(required = true)]
        article_id: String,

        /// Comment sort: confidence, top, new, controversial, old, random, qa.
        #[arg(long, default_value = "confidence")]
        sort: CommentSort,

        /// ID36s of comments to focus on.
        #[arg(long, value_delimiter = ',')]
        comment: Vec<String>,

        /// Maximum depth of subtrees.
        #[arg(long)]
        depth: Option<u32>,

        /// Maximum number of comments.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show articles related to an article.
    Related {
        /// ID36 of the article.
        #[arg(required = true)]
        article_id: String,

        #[arg(long, short, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Show other submissions of the same URL.
    Duplicates {
        /// ID36 of the article.
        #[arg(required = true)]
        article_id: String,

        #[arg(long, short, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Look up things by fullname, e.g. t3_abc123 t1_def456.
    ById {
        #[arg(required = true, num_args = 1..)]
        fullnames: Vec<String>,
    },

    /// Fetch a random article. reddit's redirect for this is unreliable.
    Random {
        #[arg(long, short)]
        subreddit: Option<String>,
    },
}
