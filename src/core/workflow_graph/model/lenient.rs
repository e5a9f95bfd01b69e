//! Deserialization helpers for the loosely typed JSON/YAML the editor and
//! hand-written configs produce (scalar-or-list fields, `[]` standing in for an
//! empty object, explicit `null`s).

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
    Null(()),
}

/// Accept `"draft"`, `["draft", "review"]` or `null`.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
        OneOrMany::Null(()) => Vec::new(),
    })
}

/// Like [`one_or_many`] but keeps "absent" distinct from "empty".
pub fn optional_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => Some(vec![value]),
        OneOrMany::Many(values) => Some(values),
        OneOrMany::Null(()) => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrEmpty<T> {
    Value(T),
    List(Vec<IgnoredAny>),
    Null(()),
}

/// Fall back to `T::default()` for `null` and for list-shaped placeholders such as `[]`.
pub fn default_on_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(match OrEmpty::<T>::deserialize(deserializer)? {
        OrEmpty::Value(value) => value,
        OrEmpty::List(_) | OrEmpty::Null(()) => T::default(),
    })
}

/// Treat `""` like a missing value.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.trim().is_empty()))
}

/// Timestamps may be missing or `null` in drafts written by older tooling.
pub fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(Utc::now))
}
