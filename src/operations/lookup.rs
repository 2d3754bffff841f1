use crate::client::{RedditClientError, Session};
use crate::models::{Listing, Paginator, SubredditName, Thing};
use crate::operations::{await_delivery, delivery};
use log::{error, info, warn};

/// Which lookup to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKind {
    /// Articles related to the given link ID36
    Related { article_id: String, limit: u32 },
    /// Other submissions of the same URL as the given link ID36
    Duplicates { article_id: String, limit: u32 },
    /// Things by fullname, e.g. `t3_abc`
    ById { fullnames: Vec<String> },
    /// A random link, optionally from a subreddit
    Random { subreddit: Option<SubredditName> },
}

/// Result of a lookup
#[derive(Debug)]
pub struct LookupResult {
    /// One listing for `ById`, two for the others
    pub listings: Vec<Listing>,
    /// Formatted output (for CLI display)
    pub formatted_output: String,
}

/// Operation for the related, duplicates, by-id and random endpoints
pub struct LookupOperation {
    kind: LookupKind,
    session: Session,
}

impl LookupOperation {
    pub fn new(kind: LookupKind, session: Session) -> Self {
        Self { kind, session }
    }

    /// Execute the lookup operation
    pub async fn execute(&self) -> Result<LookupResult, RedditClientError> {
        let paginator = Paginator::new();
        let listings = match &self.kind {
            LookupKind::Related { article_id, limit } => {
                info!("Fetching articles related to {}", article_id);
                let (completion, rx) = delivery::<(Listing, Listing)>();
                let task =
                    self.session
                        .get_related_articles(&paginator, article_id, *limit, completion)?;
                let (first, second) = await_delivery(task, rx).await?;
                vec![first, second]
            }
            LookupKind::Duplicates { article_id, limit } => {
                info!("Fetching duplicates of {}", article_id);
                let (completion, rx) = delivery::<(Listing, Listing)>();
                let task = self.session.get_duplicated_articles(
                    &paginator,
                    article_id,
                    *limit,
                    completion,
                )?;
                let (first, second) = await_delivery(task, rx).await?;
                vec![first, second]
            }
            LookupKind::ById { fullnames } => {
                info!("Fetching {} things by fullname", fullnames.len());
                let (completion, rx) = delivery::<Listing>();
                let task = self.session.get_things_by_fullname(fullnames, completion)?;
                vec![await_delivery(task, rx).await?]
            }
            LookupKind::Random { subreddit } => {
                warn!("The random endpoint answers with a redirect that may not resolve");
                let (completion, rx) = delivery::<(Listing, Listing)>();
                let task = self.session.get_random(subreddit.as_ref(), completion)?;
                let (first, second) = await_delivery(task, rx).await?;
                vec![first, second]
            }
        };

        let formatted_output = render(&listings);
        Ok(LookupResult {
            listings,
            formatted_output,
        })
    }
}

fn render(listings: &[Listing]) -> String {
    let mut output = String::new();
    for (i, listing) in listings.iter().enumerate() {
        if listings.len() > 1 {
            output.push_str(&format!("== Listing {} ({} items) ==\n", i + 1, listing.len()));
        }
        for thing in &listing.children {
            let row = match thing {
                Thing::Link(link) => format!("{} {}", link.name, link.format_short_summary()),
                Thing::Comment(comment) => format!(
                    "{} u/{}: {}",
                    comment.name,
                    comment.author,
                    comment.body.lines().next().unwrap_or_default()
                ),
                Thing::Subreddit(subreddit) => {
                    format!("{} r/{}", subreddit.name, subreddit.display_name)
                }
                other => format!("{} [{}]", other.name(), other.kind()),
            };
            output.push_str(&row);
            output.push('\n');
        }
    }
    if listings.iter().all(Listing::is_empty) {
        output.push_str("Nothing found.\n");
    }
    output
}

/// CLI handler function for lookup commands
pub async fn handle_lookup_command(
    kind: LookupKind,
    session: Session,
) -> Result<(), RedditClientError> {
    let operation = LookupOperation::new(kind, session);
    match operation.execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error running lookup: {}", err);
            Err(err)
        }
    }
}
