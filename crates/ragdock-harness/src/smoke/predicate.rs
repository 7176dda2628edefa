//! Field-presence checks over raw response text.

use serde_json::Value;

/// Decides whether a response body carries a field.
pub trait ResponsePredicate: Send + Sync {
    fn name(&self) -> &'static str;

    fn has_field(&self, body: &str, field: &str) -> bool;
}

/// Case-insensitive substring presence. Shallow on purpose: the body only
/// has to look right, it is not parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringPredicate;

impl ResponsePredicate for SubstringPredicate {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn has_field(&self, body: &str, field: &str) -> bool {
        body.to_lowercase().contains(&field.to_lowercase())
    }
}

/// Body must be a JSON object with the field as a top-level key.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonKeyPredicate;

impl ResponsePredicate for JsonKeyPredicate {
    fn name(&self) -> &'static str {
        "json-key"
    }

    fn has_field(&self, body: &str, field: &str) -> bool {
        serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|obj| obj.contains_key(field))
    }
}

/// First required field the predicate does not find, in declaration order.
pub fn first_missing<'a>(
    predicate: &dyn ResponsePredicate,
    body: &str,
    fields: &'a [String],
) -> Option<&'a str> {
    fields
        .iter()
        .map(String::as_str)
        .find(|field| !predicate.has_field(body, field))
}
