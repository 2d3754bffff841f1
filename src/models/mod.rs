use crate::client::error::RedditClientError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub mod comment;
pub mod link;
pub mod listing;
pub mod paginator;
pub mod sort;
pub mod subreddit;

pub use comment::Comment;
pub use link::Link;
pub use listing::Listing;
pub use paginator::{PageDirection, Paginator};
pub use sort::{CommentSort, LinkSortType, TimeFilterWithin};
pub use subreddit::{Subreddit, SubredditName};

/// A JSON object carrying a `kind` discriminator alongside its `data` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub kind: String,
    pub data: Value,
}

impl Tagged {
    /// Split a generic JSON value into kind and data, if it has that shape.
    pub fn from_value(value: Value) -> Result<Self, RedditClientError> {
        match value {
            Value::Object(mut object) => {
                let kind = match object.remove("kind") {
                    Some(Value::String(kind)) => kind,
                    _ => {
                        return Err(RedditClientError::ShapeMismatch(
                            "object has no string \"kind\" field".to_string(),
                        ))
                    }
                };
                let data = object.remove("data").ok_or_else(|| {
                    RedditClientError::ShapeMismatch(format!(
                        "object of kind {} has no \"data\" field",
                        kind
                    ))
                })?;
                Ok(Self { kind, data })
            }
            other => Err(RedditClientError::ShapeMismatch(format!(
                "expected a tagged object, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserialize a kind's payload, reporting field problems as a kind mismatch.
pub(crate) fn decode_payload<T: DeserializeOwned>(
    kind: &str,
    data: Value,
) -> Result<T, RedditClientError> {
    serde_json::from_value(data)
        .map_err(|e| RedditClientError::KindMismatch(format!("invalid {} payload: {}", kind, e)))
}

/// Every kind of object the client knows how to decode.
///
/// Unknown kinds are rejected rather than mapped to a fallback object.
#[derive(Debug, Clone, PartialEq)]
pub enum Thing {
    Comment(Comment),
    Account(Account),
    Link(Link),
    Message(Message),
    Subreddit(Subreddit),
    More(More),
}

impl Thing {
    pub fn from_tagged(tagged: Tagged) -> Result<Self, RedditClientError> {
        let Tagged { kind, data } = tagged;
        match kind.as_str() {
            "t1" => decode_payload(&kind, data).map(Thing::Comment),
            "t2" => decode_payload(&kind, data).map(Thing::Account),
            "t3" => decode_payload(&kind, data).map(Thing::Link),
            "t4" => decode_payload(&kind, data).map(Thing::Message),
            "t5" => decode_payload(&kind, data).map(Thing::Subreddit),
            "more" => decode_payload(&kind, data).map(Thing::More),
            other => Err(RedditClientError::KindMismatch(format!(
                "unsupported kind: {}",
                other
            ))),
        }
    }

    /// The kind discriminator this thing was decoded from.
    pub fn kind(&self) -> &'static str {
        match self {
            Thing::Comment(_) => "t1",
            Thing::Account(_) => "t2",
            Thing::Link(_) => "t3",
            Thing::Message(_) => "t4",
            Thing::Subreddit(_) => "t5",
            Thing::More(_) => "more",
        }
    }

    /// The base-36 id, without kind prefix.
    pub fn id(&self) -> &str {
        match self {
            Thing::Comment(c) => &c.id,
            Thing::Account(a) => &a.id,
            Thing::Link(l) => &l.id,
            Thing::Message(m) => &m.id,
            Thing::Subreddit(s) => &s.id,
            Thing::More(m) => &m.id,
        }
    }

    /// The fullname, e.g. `t3_abc123`.
    pub fn name(&self) -> &str {
        match self {
            Thing::Comment(c) => &c.name,
            Thing::Account(a) => &a.name,
            Thing::Link(l) => &l.name,
            Thing::Message(m) => &m.name,
            Thing::Subreddit(s) => &s.name,
            Thing::More(m) => &m.name,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Thing::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Thing::Comment(comment) => Some(comment),
            _ => None,
        }
    }
}

/// User account data (`t2`)
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub link_karma: i64,
    #[serde(default)]
    pub comment_karma: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub is_gold: bool,
}

/// Private message data (`t4`)
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub dest: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub created_utc: f64,
}

/// Placeholder for comments that were not included in a comment tree.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct More {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub children: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_requires_kind_and_data() {
        let ok = Tagged::from_value(json!({"kind": "t3", "data": {}})).expect("tagged");
        assert_eq!(ok.kind, "t3");

        for value in [
            json!({"data": {}}),
            json!({"kind": 3, "data": {}}),
            json!({"kind": "t3"}),
            json!("t3"),
        ] {
            assert!(matches!(
                Tagged::from_value(value),
                Err(RedditClientError::ShapeMismatch(_))
            ));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let tagged = Tagged {
            kind: "t8".to_string(),
            data: json!({"id": "x", "name": "t8_x"}),
        };
        assert!(matches!(
            Thing::from_tagged(tagged),
            Err(RedditClientError::KindMismatch(_))
        ));
    }

    #[test]
    fn missing_required_field_is_a_kind_mismatch() {
        let tagged = Tagged {
            kind: "t2".to_string(),
            data: json!({"name": "spez"}),
        };
        assert!(matches!(
            Thing::from_tagged(tagged),
            Err(RedditClientError::KindMismatch(_))
        ));
    }

    #[test]
    fn more_exposes_id_and_fullname() {
        let tagged = Tagged {
            kind: "more".to_string(),
            data: json!({"id": "c9", "name": "t1_c9", "count": 4, "children": ["c9", "ca"]}),
        };
        let thing = Thing::from_tagged(tagged).expect("more should decode");
        assert_eq!(thing.kind(), "more");
        assert_eq!(thing.id(), "c9");
        assert_eq!(thing.name(), "t1_c9");
        match thing {
            Thing::More(more) => assert_eq!(more.children, vec!["c9", "ca"]),
            other => panic!("expected more, got {other:?}"),
        }
    }
}
