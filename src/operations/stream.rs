use crate::client::{ListOptions, RedditClientError, Session};
use crate::models::{Listing, Paginator, SubredditName, Thing};
use crate::operations::{await_delivery, delivery};
use chrono_tz::Tz;
use log::{error, info};

/// Configuration options for streaming a listing
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Subreddit to read (None for the front page)
    pub subreddit: Option<SubredditName>,
    /// Sort, time window and page size
    pub list: ListOptions,
    /// Number of pages to fetch, following `after` cursors
    pub pages: u32,
    /// Cursor to start after, e.g. `t3_abc` from a previous run
    pub after: Option<String>,
    /// Display entries in a brief, one-line format
    pub brief: bool,
    /// Zone used for timestamps
    pub timezone: Tz,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            subreddit: None,
            list: ListOptions::default(),
            pages: 1,
            after: None,
            brief: false,
            timezone: chrono_tz::America::Los_Angeles,
        }
    }
}

/// Result of a stream operation
#[derive(Debug)]
pub struct StreamResult {
    /// Every listing fetched, in request order
    pub listings: Vec<Listing>,
    /// Paginator positioned after the last listing
    pub paginator: Paginator,
    /// Formatted output (for CLI display)
    pub formatted_output: String,
}

impl StreamResult {
    pub fn item_count(&self) -> usize {
        self.listings.iter().map(Listing::len).sum()
    }
}

/// Operation that reads a listing page by page and renders one row per thing
pub struct StreamOperation {
    options: StreamOptions,
    session: Session,
}

impl StreamOperation {
    pub fn new(options: StreamOptions, session: Session) -> Self {
        Self { options, session }
    }

    /// Execute the stream operation
    pub async fn execute(&self) -> Result<StreamResult, RedditClientError> {
        info!(
            "Fetching {} {} posts from {}",
            self.options.list.limit,
            self.options.list.sort,
            self.options
                .subreddit
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "the front page".to_string())
        );

        let mut paginator = Paginator::with_cursors(None, self.options.after.clone(), 0);
        let mut listings = Vec::new();

        for page in 0..self.options.pages.max(1) {
            if paginator.is_exhausted() {
                info!("No more pages after page {}", page);
                break;
            }

            let (completion, rx) = delivery::<Listing>();
            let task = self.session.get_list(
                &paginator,
                self.options.subreddit.as_ref(),
                &self.options.list,
                completion,
            )?;
            let listing = await_delivery(task, rx).await?;
            paginator.update(&listing);

            let rate = self.session.rate_limit();
            info!(
                "Page {}: {} items ({} calls remaining, reset in {}s)",
                page + 1,
                listing.len(),
                rate.remaining,
                rate.reset_seconds
            );
            listings.push(listing);
        }

        let formatted_output = self.render(&listings);
        Ok(StreamResult {
            listings,
            paginator,
            formatted_output,
        })
    }

    fn render(&self, listings: &[Listing]) -> String {
        let mut output = String::new();
        let total: usize = listings.iter().map(Listing::len).sum();

        if total == 0 {
            output.push_str("No posts found.\n");
            return output;
        }
        output.push_str(&format!("Found {} posts\n", total));

        let things = listings.iter().flat_map(|l| l.children.iter());
        for (i, thing) in things.enumerate() {
            if self.options.brief {
                output.push_str(&format!("{:2}. {}\n", i + 1, self.brief_row(thing)));
            } else {
                output.push_str(&self.detailed_row(thing));
            }
        }

        if self.options.brief {
            output.push_str("\nPost Type Legend:\n");
            output.push_str("[T] = Text post\n");
            output.push_str("[V] = Video\n");
            output.push_str("[I] = Image\n");
            output.push_str("[G] = Gallery\n");
            output.push_str("[L] = Link\n");
        }
        output
    }

    fn brief_row(&self, thing: &Thing) -> String {
        match thing {
            Thing::Link(link) => {
                let title = truncate(&link.title, 30);
                format!(
                    "[{}] [{}] {} r/{} | ID: {} | https://reddit.com{}",
                    link.type_indicator(),
                    link.format_timestamp(self.options.timezone, "%H:%M"),
                    title,
                    link.subreddit,
                    link.name,
                    link.permalink
                )
            }
            Thing::Subreddit(subreddit) => {
                format!("[S] r/{} - {}", subreddit.display_name, truncate(&subreddit.title, 30))
            }
            other => format!("[{}] {}", other.kind(), other.name()),
        }
    }

    fn detailed_row(&self, thing: &Thing) -> String {
        match thing {
            Thing::Link(link) => format!(
                "\n============ POST =============\n[{}]\nThing ID: {}\n{}\n================================\n\n",
                link.format_timestamp(self.options.timezone, "%Y-%m-%d %H:%M:%S %Z"),
                link.name,
                link.format_summary()
            ),
            other => format!("\n[{}] {}\n", other.kind(), other.name()),
        }
    }
}

/// Truncate to `max` chars, safely handling UTF-8
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// CLI handler function for the stream command
pub async fn handle_stream_command(
    options: StreamOptions,
    session: Session,
) -> Result<(), RedditClientError> {
    let operation = StreamOperation::new(options, session);
    match operation.execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            if let Some(after) = result.paginator.after() {
                info!("Continue with --after {}", after);
            }
            Ok(())
        }
        Err(err) => {
            error!("Error fetching posts: {}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("ééééééééééé", 8), "ééééé...");
    }
}
