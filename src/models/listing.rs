use crate::client::error::RedditClientError;
use crate::models::{decode_payload, Link, Tagged, Thing};
use serde::Deserialize;
use serde_json::Value;

/// One page of things plus the cursors needed to fetch its neighbours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub children: Vec<Thing>,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Listing payload before its children are decoded
#[derive(Deserialize, Debug)]
struct ListingData {
    #[serde(default)]
    children: Vec<Value>,
    before: Option<String>,
    after: Option<String>,
}

impl Listing {
    pub const KIND: &'static str = "Listing";

    /// Decode a tagged value of kind `Listing`, decoding every child as a [`Thing`].
    ///
    /// Children keep the order they had in the JSON array. A child with an
    /// unsupported kind fails the whole listing.
    pub fn from_tagged(tagged: Tagged) -> Result<Self, RedditClientError> {
        if tagged.kind != Self::KIND {
            return Err(RedditClientError::KindMismatch(format!(
                "expected {}, found {}",
                Self::KIND,
                tagged.kind
            )));
        }

        let data: ListingData = decode_payload(Self::KIND, tagged.data)?;
        let children = data
            .children
            .into_iter()
            .map(|child| {
                let tagged = Tagged::from_value(child).map_err(|e| {
                    RedditClientError::KindMismatch(format!("listing child: {}", e))
                })?;
                Thing::from_tagged(tagged)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            children,
            before: data.before.filter(|c| !c.is_empty()),
            after: data.after.filter(|c| !c.is_empty()),
        })
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Links in this listing, skipping other kinds.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.children.iter().filter_map(Thing::as_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tagged(value: Value) -> Tagged {
        Tagged::from_value(value).expect("value should be tagged")
    }

    #[test]
    fn children_keep_input_order() {
        let listing = Listing::from_tagged(tagged(json!({
            "kind": "Listing",
            "data": {
                "after": "t3_c",
                "before": null,
                "children": [
                    {"kind": "t3", "data": {"id": "a", "name": "t3_a"}},
                    {"kind": "t5", "data": {"id": "b", "name": "t5_b", "display_name": "rust"}},
                    {"kind": "t3", "data": {"id": "c", "name": "t3_c"}}
                ]
            }
        })))
        .expect("listing should decode");

        let names: Vec<&str> = listing.children.iter().map(Thing::name).collect();
        assert_eq!(names, vec!["t3_a", "t5_b", "t3_c"]);
        assert_eq!(listing.after.as_deref(), Some("t3_c"));
        assert_eq!(listing.before, None);
        assert_eq!(listing.links().count(), 2);
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let result = Listing::from_tagged(tagged(json!({"kind": "t3", "data": {"id": "a", "name": "t3_a"}})));
        assert!(matches!(result, Err(RedditClientError::KindMismatch(_))));
    }

    #[test]
    fn unknown_child_kind_fails_the_listing() {
        let result = Listing::from_tagged(tagged(json!({
            "kind": "Listing",
            "data": {"children": [{"kind": "t9", "data": {}}]}
        })));
        assert!(matches!(result, Err(RedditClientError::KindMismatch(_))));
    }

    #[test]
    fn empty_cursors_are_treated_as_absent() {
        let listing = Listing::from_tagged(tagged(json!({
            "kind": "Listing",
            "data": {"children": [], "after": "", "before": ""}
        })))
        .expect("listing should decode");
        assert!(listing.is_empty());
        assert!(listing.after.is_none());
        assert!(listing.before.is_none());
    }
}
