use crate::client::{ArticleOptions, RedditClientError, Session};
use crate::models::{Link, Listing, Thing};
use crate::operations::stream::truncate;
use crate::operations::{await_delivery, delivery};
use chrono_tz::Tz;
use log::{error, info};

/// Configuration options for reading a comment tree
#[derive(Debug, Clone)]
pub struct CommentsOptions {
    /// ID36 of the article, without the `t3_` prefix
    pub article_id: String,
    /// Sort, focus comments, depth and limit
    pub article: ArticleOptions,
    /// Zone used for timestamps
    pub timezone: Tz,
}

/// Result of a comment tree fetch
#[derive(Debug)]
pub struct CommentsResult {
    /// The article itself, if the first listing held it
    pub link: Option<Link>,
    /// Top level of the comment tree
    pub comments: Listing,
    /// Number of comments rendered, counting nested replies
    pub comment_count: usize,
    /// Formatted output (for CLI display)
    pub formatted_output: String,
}

/// Operation for reading an article and its comment tree
pub struct CommentsOperation {
    options: CommentsOptions,
    session: Session,
}

impl CommentsOperation {
    pub fn new(options: CommentsOptions, session: Session) -> Self {
        Self { options, session }
    }

    /// Execute the comments operation
    pub async fn execute(&self) -> Result<CommentsResult, RedditClientError> {
        let article_id = self.options.article_id.trim_start_matches("t3_");
        info!("Fetching comments for article {}", article_id);

        let (completion, rx) = delivery::<(Listing, Listing)>();
        let task = self
            .session
            .get_articles(article_id, &self.options.article, completion)?;
        let (article, comments) = await_delivery(task, rx).await?;

        let link = article.links().next().cloned();
        let mut output = String::new();
        if let Some(link) = &link {
            output.push_str(&format!(
                "[{}]\n{}\n\n",
                link.format_timestamp(self.options.timezone, "%Y-%m-%d %H:%M:%S %Z"),
                link.format_summary()
            ));
        }

        let mut comment_count = 0;
        for thing in &comments.children {
            match thing {
                Thing::Comment(comment) => {
                    for (depth, c) in comment.walk() {
                        comment_count += 1;
                        output.push_str(&format!(
                            "{}- u/{} ({} pts): {}\n",
                            "  ".repeat(depth),
                            c.author,
                            c.score,
                            truncate(&c.body.replace('\n', " "), 120)
                        ));
                    }
                }
                Thing::More(more) => {
                    output.push_str(&format!("- [{} more replies]\n", more.count));
                }
                other => output.push_str(&format!("- [{}] {}\n", other.kind(), other.name())),
            }
        }

        if comment_count == 0 {
            output.push_str("No comments yet.\n");
        }

        Ok(CommentsResult {
            link,
            comments,
            comment_count,
            formatted_output: output,
        })
    }
}

/// CLI handler function for the comments command
pub async fn handle_comments_command(
    options: CommentsOptions,
    session: Session,
) -> Result<(), RedditClientError> {
    let operation = CommentsOperation::new(options, session);
    match operation.execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error fetching comments: {}", err);
            Err(err)
        }
    }
}
