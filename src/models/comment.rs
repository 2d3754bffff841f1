use crate::models::{Listing, Tagged};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Comment data, kind `t1`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub link_id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub depth: u32,
    pub distinguished: Option<String>,
    /// reddit sends `""` when a comment has no replies.
    #[serde(default, deserialize_with = "deserialize_replies")]
    pub replies: Listing,
}

fn deserialize_replies<'de, D>(deserializer: D) -> Result<Listing, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Listing::default()),
        Value::String(s) if s.is_empty() => Ok(Listing::default()),
        other => {
            let tagged = Tagged::from_value(other).map_err(de::Error::custom)?;
            Listing::from_tagged(tagged).map_err(de::Error::custom)
        }
    }
}

impl Comment {
    /// Walk this comment and its replies depth first, yielding (depth, comment).
    pub fn walk(&self) -> Vec<(usize, &Comment)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, level: usize, out: &mut Vec<(usize, &'a Comment)>) {
        out.push((level, self));
        for reply in self.replies.children.iter().filter_map(|t| t.as_comment()) {
            reply.walk_into(level + 1, out);
        }
    }
}
