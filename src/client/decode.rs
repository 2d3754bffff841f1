//! The decoder chain: transport outcome to typed value.
//!
//! Each stage is a total function returning `Result`, and [`decode`] chains
//! them with `and_then` so the first failure is passed through unchanged and
//! later stages never run.

use crate::client::error::RedditClientError;
use crate::client::transport::RawResponse;
use crate::models::{json_type_name, Listing, Tagged, Thing};
use serde_json::Value;

/// A JSON value in one of the two shapes reddit responds with.
#[derive(Debug, Clone, PartialEq)]
pub enum RedditValue {
    /// A single `{kind, data}` object.
    Single(Tagged),
    /// A two element array, as returned for comment pages.
    Pair(Tagged, Tagged),
}

/// Mapping from a [`RedditValue`] into an endpoint's result type.
pub trait FromRedditValue: Sized {
    fn from_reddit_value(value: RedditValue) -> Result<Self, RedditClientError>;
}

impl FromRedditValue for Listing {
    fn from_reddit_value(value: RedditValue) -> Result<Self, RedditClientError> {
        match value {
            RedditValue::Single(tagged) => Listing::from_tagged(tagged),
            RedditValue::Pair(..) => Err(RedditClientError::KindMismatch(
                "expected a single listing, found a pair".to_string(),
            )),
        }
    }
}

impl FromRedditValue for (Listing, Listing) {
    fn from_reddit_value(value: RedditValue) -> Result<Self, RedditClientError> {
        match value {
            RedditValue::Pair(first, second) => {
                Ok((Listing::from_tagged(first)?, Listing::from_tagged(second)?))
            }
            RedditValue::Single(tagged) => Err(RedditClientError::KindMismatch(format!(
                "expected a pair of listings, found a single {}",
                tagged.kind
            ))),
        }
    }
}

impl FromRedditValue for Thing {
    fn from_reddit_value(value: RedditValue) -> Result<Self, RedditClientError> {
        match value {
            RedditValue::Single(tagged) => Thing::from_tagged(tagged),
            RedditValue::Pair(..) => Err(RedditClientError::KindMismatch(
                "expected a single thing, found a pair".to_string(),
            )),
        }
    }
}

impl FromRedditValue for RedditValue {
    fn from_reddit_value(value: RedditValue) -> Result<Self, RedditClientError> {
        Ok(value)
    }
}

/// Stage 1: reject transport failures, non-2xx statuses and unreadable bodies.
pub fn validate_response(
    outcome: Result<RawResponse, RedditClientError>,
) -> Result<RawResponse, RedditClientError> {
    let response = outcome?;
    if !(200..300).contains(&response.status) {
        return Err(RedditClientError::Network(format!(
            "server returned status {}",
            response.status
        )));
    }
    if let Some(error) = &response.body_error {
        return Err(RedditClientError::Network(format!(
            "failed to read response body: {}",
            error
        )));
    }
    Ok(response)
}

/// Stage 2: take the body bytes.
pub fn response_to_data(response: RawResponse) -> Result<Vec<u8>, RedditClientError> {
    match response.body {
        Some(body) if !body.is_empty() => Ok(body),
        _ => Err(RedditClientError::EmptyData),
    }
}

/// Stage 3: parse bytes as generic JSON.
pub fn data_to_json(data: Vec<u8>) -> Result<Value, RedditClientError> {
    serde_json::from_slice(&data).map_err(|e| RedditClientError::JsonParse(e.to_string()))
}

/// Stage 4: recognise a tagged object or a pair of tagged objects.
pub fn json_to_reddit_value(json: Value) -> Result<RedditValue, RedditClientError> {
    match json {
        Value::Object(_) => Tagged::from_value(json).map(RedditValue::Single),
        Value::Array(items) => {
            let count = items.len();
            let mut items = items.into_iter();
            match (items.next(), items.next(), items.next()) {
                (Some(first), Some(second), None) => Ok(RedditValue::Pair(
                    Tagged::from_value(first)?,
                    Tagged::from_value(second)?,
                )),
                _ => Err(RedditClientError::ShapeMismatch(format!(
                    "expected an array of two tagged objects, found {} elements",
                    count
                ))),
            }
        }
        other => Err(RedditClientError::ShapeMismatch(format!(
            "expected an object or array, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Stage 5: map into the statically expected result type.
pub fn reddit_value_to_object<T: FromRedditValue>(
    value: RedditValue,
) -> Result<T, RedditClientError> {
    T::from_reddit_value(value)
}

/// Run all stages over a transport outcome.
pub fn decode<T: FromRedditValue>(
    outcome: Result<RawResponse, RedditClientError>,
) -> Result<T, RedditClientError> {
    validate_response(outcome)
        .and_then(response_to_data)
        .and_then(data_to_json)
        .and_then(json_to_reddit_value)
        .and_then(reddit_value_to_object)
}

/// Run the stages up to generic JSON, for responses that are not tagged.
pub fn decode_json(
    outcome: Result<RawResponse, RedditClientError>,
) -> Result<Value, RedditClientError> {
    validate_response(outcome)
        .and_then(response_to_data)
        .and_then(data_to_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use serde_json::json;

    fn ok(body: &[u8]) -> Result<RawResponse, RedditClientError> {
        Ok(RawResponse {
            status: 200,
            headers: HeaderMap::new(),
            body: Some(body.to_vec()),
            body_error: None,
        })
    }

    fn ok_json(value: Value) -> Result<RawResponse, RedditClientError> {
        ok(&serde_json::to_vec(&value).expect("serialize"))
    }

    fn listing_json(names: &[&str]) -> Value {
        let children: Vec<Value> = names
            .iter()
            .map(|name| {
                let id = name.trim_start_matches("t3_");
                json!({"kind": "t3", "data": {"id": id, "name": name, "title": id}})
            })
            .collect();
        json!({"kind": "Listing", "data": {"children": children, "after": null, "before": null}})
    }

    #[test]
    fn transport_failure_is_passed_through() {
        let outcome = Err(RedditClientError::Network("connection refused".to_string()));
        assert_eq!(
            decode::<Listing>(outcome),
            Err(RedditClientError::Network("connection refused".to_string()))
        );
    }

    #[test]
    fn non_success_status_is_a_network_error() {
        let outcome = Ok(RawResponse {
            status: 503,
            headers: HeaderMap::new(),
            body: Some(b"{}".to_vec()),
            body_error: None,
        });
        assert!(matches!(
            decode::<Listing>(outcome),
            Err(RedditClientError::Network(msg)) if msg.contains("503")
        ));
    }

    #[test]
    fn missing_or_empty_body_is_empty_data() {
        let missing = Ok(RawResponse {
            status: 200,
            headers: HeaderMap::new(),
            body: None,
            body_error: None,
        });
        assert_eq!(decode::<Listing>(missing), Err(RedditClientError::EmptyData));
        assert_eq!(decode::<Listing>(ok(b"")), Err(RedditClientError::EmptyData));
    }

    #[test]
    fn unreadable_body_is_a_network_error() {
        let truncated = Ok(RawResponse {
            status: 200,
            headers: HeaderMap::new(),
            body: None,
            body_error: Some("connection reset".to_string()),
        });
        assert!(matches!(
            decode::<Listing>(truncated),
            Err(RedditClientError::Network(msg)) if msg.contains("connection reset")
        ));
    }

    #[test]
    fn malformed_json_stops_at_parse_stage() {
        for body in [&b"{"[..], b"not json", b"{\"kind\": \"t9\",", b"\xff\xfe"] {
            assert!(
                matches!(decode::<Listing>(ok(body)), Err(RedditClientError::JsonParse(_))),
                "body {body:?}"
            );
        }
    }

    #[test]
    fn untagged_shapes_are_rejected() {
        for value in [
            json!([]),
            json!([listing_json(&[])]),
            json!([listing_json(&[]), listing_json(&[]), listing_json(&[])]),
            json!({"data": {}}),
            json!("Listing"),
            json!(42),
        ] {
            assert!(
                matches!(
                    decode::<Listing>(ok_json(value.clone())),
                    Err(RedditClientError::ShapeMismatch(_))
                ),
                "value {value}"
            );
        }
    }

    #[test]
    fn pair_keeps_input_order() {
        let body = json!([listing_json(&["t3_link"]), listing_json(&["t3_a", "t3_b"])]);
        let (first, second) =
            decode::<(Listing, Listing)>(ok_json(body)).expect("pair should decode");
        assert_eq!(first.children.len(), 1);
        assert_eq!(first.children[0].name(), "t3_link");
        let names: Vec<&str> = second.children.iter().map(Thing::name).collect();
        assert_eq!(names, vec!["t3_a", "t3_b"]);
    }

    #[test]
    fn unknown_kind_is_a_kind_mismatch() {
        let single = json!({"kind": "LabeledMultiThing", "data": {}});
        assert!(matches!(
            decode::<Listing>(ok_json(single.clone())),
            Err(RedditClientError::KindMismatch(_))
        ));
        assert!(matches!(
            decode::<Thing>(ok_json(single)),
            Err(RedditClientError::KindMismatch(_))
        ));
    }

    #[test]
    fn arity_mismatch_is_a_kind_mismatch() {
        assert!(matches!(
            decode::<(Listing, Listing)>(ok_json(listing_json(&["t3_a"]))),
            Err(RedditClientError::KindMismatch(_))
        ));
        let pair = json!([listing_json(&[]), listing_json(&[])]);
        assert!(matches!(
            decode::<Listing>(ok_json(pair)),
            Err(RedditClientError::KindMismatch(_))
        ));
    }

    #[test]
    fn decoding_is_idempotent() {
        let bodies: Vec<Vec<u8>> = vec![
            serde_json::to_vec(&listing_json(&["t3_a", "t3_b"])).expect("serialize"),
            b"[1, 2]".to_vec(),
            b"{oops".to_vec(),
            serde_json::to_vec(&json!({"kind": "t7", "data": {}})).expect("serialize"),
        ];
        for body in bodies {
            assert_eq!(decode::<Listing>(ok(&body)), decode::<Listing>(ok(&body)));
        }
    }

    #[test]
    fn json_stages_stop_before_shape_interpretation() {
        let value = decode_json(ok(b"[1, 2, 3]")).expect("generic JSON should decode");
        assert_eq!(value, json!([1, 2, 3]));
    }
}
