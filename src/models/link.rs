use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

/// Link (submission) data, kind `t3`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Link {
    // Basic post information
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub created_utc: f64,

    // Post type and content
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub thumbnail: String,

    // Post metrics
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub upvote_ratio: f32,
    #[serde(default)]
    pub num_comments: i64,

    // Subreddit information
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub subreddit_name_prefixed: String,

    // Post status
    #[serde(default)]
    pub stickied: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default)]
    pub over_18: bool,
    pub link_flair_text: Option<String>,
}

impl Link {
    /// Format a post for display with important metadata
    pub fn format_summary(&self) -> String {
        let mut content = format!(
            "Title: {}\nAuthor: u/{}\nSubreddit: r/{}\nScore: {} ({}% upvoted) | Comments: {}\n",
            self.title,
            self.author,
            self.subreddit,
            self.score,
            (self.upvote_ratio * 100.0) as i32,
            self.num_comments,
        );

        let mut flags = Vec::new();
        if self.is_self {
            flags.push("Self Post");
        }
        if self.over_18 {
            flags.push("NSFW");
        }
        if self.spoiler {
            flags.push("Spoiler");
        }
        if self.is_video {
            flags.push("Video");
        }
        if self.stickied {
            flags.push("Stickied");
        }
        if self.locked {
            flags.push("Locked");
        }
        if !flags.is_empty() {
            content.push_str(&format!("Flags: [{}]\n", flags.join(", ")));
        }

        if let Some(flair) = self.link_flair_text.as_deref().filter(|f| !f.is_empty()) {
            content.push_str(&format!("Flair: {}\n", flair));
        }

        // Long self text is cut at a char boundary
        if self.is_self && !self.selftext.is_empty() {
            let text = if self.selftext.chars().count() > 500 {
                format!("{}...", self.selftext.chars().take(500).collect::<String>())
            } else {
                self.selftext.clone()
            };
            content.push_str("\nContent:\n---------\n");
            content.push_str(&text);
            content.push_str("\n---------\n");
        }

        content.push_str(&format!(
            "\nPermalink: https://reddit.com{}",
            self.permalink
        ));
        if !self.is_self && self.url != format!("https://reddit.com{}", self.permalink) {
            content.push_str(&format!("\nExternal URL: {}", self.url));
        }

        content
    }

    /// Get a short summary for the post (title, author, score)
    pub fn format_short_summary(&self) -> String {
        format!(
            "[{} | {} pts] {} - by u/{}",
            self.subreddit_name_prefixed, self.score, self.title, self.author
        )
    }

    /// Format the creation time in the given zone
    pub fn format_timestamp(&self, tz: Tz, pattern: &str) -> String {
        let timestamp = Utc
            .timestamp_opt(self.created_utc as i64, 0)
            .single()
            .unwrap_or_else(Utc::now);

        timestamp.with_timezone(&tz).format(pattern).to_string()
    }

    /// Single-letter post type indicator used in brief output
    pub fn type_indicator(&self) -> &'static str {
        if self.is_self {
            "T"
        } else if self.is_video {
            "V"
        } else if self.url.contains("i.redd.it") || self.url.contains("imgur.com") {
            "I"
        } else if self.url.contains("reddit.com/gallery") {
            "G"
        } else {
            "L"
        }
    }
}
