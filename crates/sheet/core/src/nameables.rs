//! Nameable-key substitution.
//!
//! Free text may embed placeholders of the form `@key@`. A collaborator first
//! collects the keys of an entity (or a whole list) into a [`NameableKeys`]
//! map, lets the user edit the values, then applies the map back. Collection
//! records each key with its literal token as the default value, so applying
//! an untouched map is the identity.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

/// Placeholder key → replacement text.
pub type NameableKeys = BTreeMap<String, String>;

static NAMEABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([^@]+)@").expect("nameable pattern is valid"));

/// Records every `@key@` found in `text`. Existing entries are kept.
pub fn extract(text: &str, keys: &mut NameableKeys) {
    for captures in NAMEABLE_PATTERN.captures_iter(text) {
        let key = &captures[1];
        keys.entry(key.to_string())
            .or_insert_with(|| captures[0].to_string());
    }
}

/// Replaces every `@key@` whose key is in `keys`; other tokens are untouched.
pub fn apply(text: &str, keys: &NameableKeys) -> String {
    if !text.contains('@') {
        return text.to_string();
    }
    NAMEABLE_PATTERN
        .replace_all(text, |captures: &Captures<'_>| match keys.get(&captures[1]) {
            Some(value) => value.clone(),
            None => captures[0].to_string(),
        })
        .into_owned()
}

/// Applies [`apply`] in place.
pub fn apply_in_place(text: &mut String, keys: &NameableKeys) {
    if text.contains('@') {
        *text = apply(text, keys);
    }
}

/// Collects keys from every string nested in a JSON value.
pub fn extract_json(value: &Value, keys: &mut NameableKeys) {
    match value {
        Value::String(text) => extract(text, keys),
        Value::Array(items) => items.iter().for_each(|item| extract_json(item, keys)),
        Value::Object(map) => map.values().for_each(|item| extract_json(item, keys)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Substitutes keys in every string nested in a JSON value.
pub fn apply_json(value: &mut Value, keys: &NameableKeys) {
    match value {
        Value::String(text) => apply_in_place(text, keys),
        Value::Array(items) => items.iter_mut().for_each(|item| apply_json(item, keys)),
        Value::Object(map) => map.values_mut().for_each(|item| apply_json(item, keys)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
