//! Turns upstream payloads into typed record lists.
//!
//! The evaluation service is inconsistent about how it wraps collections.
//! Each payload is first classified into one of three shapes and only then
//! decoded:
//!
//! - a bare array of records: `[{...}, {...}]`
//! - a wrapped array: `{ "users": [{...}] }`
//! - a wrapped id-keyed map: `{ "users": { "1": "Jane", "2": "John" } }`
//!
//! Anything else, or any record that fails validation, is a
//! [`NormalizeError`]. Callers treat that as "no records" for the resource.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::Validate;

use crate::models::{SocialComment, SocialPost, SocialUser};

pub const MISSING_POST_CONTENT: &str = "No content available";
pub const MISSING_COMMENT_CONTENT: &str = "No comment content available";

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("Unrecognized {kind} payload shape")]
    UnrecognizedShape { kind: &'static str },

    #[error("Invalid {kind} record {position}: {reason}")]
    InvalidRecord {
        kind: &'static str,
        position: String,
        reason: String,
    },
}

/// Which of the accepted layouts a payload uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Bare,
    Wrapped,
    Keyed,
}

enum Shape<'a> {
    Bare(&'a [Value]),
    Wrapped(&'a [Value]),
    Keyed(&'a Map<String, Value>),
}

impl Shape<'_> {
    fn kind(&self) -> ShapeKind {
        match self {
            Shape::Bare(_) => ShapeKind::Bare,
            Shape::Wrapped(_) => ShapeKind::Wrapped,
            Shape::Keyed(_) => ShapeKind::Keyed,
        }
    }
}

fn classify<'a>(payload: &'a Value, kind: &'static str) -> Result<Shape<'a>, NormalizeError> {
    match payload {
        Value::Array(items) => Ok(Shape::Bare(items)),
        Value::Object(fields) => match fields.get(kind) {
            Some(Value::Array(items)) => Ok(Shape::Wrapped(items)),
            Some(Value::Object(entries)) => Ok(Shape::Keyed(entries)),
            _ => Err(NormalizeError::UnrecognizedShape { kind }),
        },
        _ => Err(NormalizeError::UnrecognizedShape { kind }),
    }
}

/// Reports which layout a payload uses without decoding it.
pub fn shape_of(payload: &Value, kind: &'static str) -> Result<ShapeKind, NormalizeError> {
    classify(payload, kind).map(|shape| shape.kind())
}

pub fn normalize_users(payload: &Value) -> Result<Vec<SocialUser>, NormalizeError> {
    const KIND: &str = "users";

    let users: Vec<SocialUser> = match classify(payload, KIND)? {
        Shape::Bare(items) | Shape::Wrapped(items) => decode_records(items, KIND)?,
        Shape::Keyed(entries) => keyed_entries(entries)
            .into_iter()
            .map(|(key, id, value)| user_from_entry(key, id, value))
            .collect::<Result<_, _>>()?,
    };

    for user in &users {
        user.validate().map_err(|e| NormalizeError::InvalidRecord {
            kind: KIND,
            position: format!("id {}", user.id),
            reason: e.to_string(),
        })?;
    }

    Ok(users)
}

/// Normalizes the posts fetched for `user_id`. Map-shaped entries have no
/// author field, so they are attributed to that user.
pub fn normalize_posts(payload: &Value, user_id: u64) -> Result<Vec<SocialPost>, NormalizeError> {
    const KIND: &str = "posts";

    match classify(payload, KIND)? {
        Shape::Bare(items) | Shape::Wrapped(items) => decode_records(items, KIND),
        Shape::Keyed(entries) => coerce_keyed(entries, KIND, MISSING_POST_CONTENT)
            .map(|records| {
                records
                    .into_iter()
                    .map(|(id, content)| SocialPost {
                        id,
                        userid: user_id,
                        content,
                    })
                    .collect()
            }),
    }
}

/// Normalizes the comments fetched for `post_id`.
pub fn normalize_comments(
    payload: &Value,
    post_id: u64,
) -> Result<Vec<SocialComment>, NormalizeError> {
    const KIND: &str = "comments";

    match classify(payload, KIND)? {
        Shape::Bare(items) | Shape::Wrapped(items) => decode_records(items, KIND),
        Shape::Keyed(entries) => coerce_keyed(entries, KIND, MISSING_COMMENT_CONTENT)
            .map(|records| {
                records
                    .into_iter()
                    .map(|(id, content)| SocialComment {
                        id,
                        postid: post_id,
                        content,
                    })
                    .collect()
            }),
    }
}

fn decode_records<T: DeserializeOwned>(
    items: &[Value],
    kind: &'static str,
) -> Result<Vec<T>, NormalizeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| NormalizeError::InvalidRecord {
                kind,
                position: format!("at index {index}"),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Map entries in ascending numeric-key order; keys that aren't ids sort
/// last and keep their relative order.
fn keyed_entries(entries: &Map<String, Value>) -> Vec<(&str, Option<u64>, &Value)> {
    let mut keyed: Vec<_> = entries
        .iter()
        .map(|(key, value)| (key.as_str(), key.trim().parse::<u64>().ok(), value))
        .collect();
    keyed.sort_by_key(|(_, id, _)| (id.is_none(), *id));
    keyed
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserEntry {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roll_no: Option<String>,
    #[serde(default)]
    access_code: Option<String>,
}

fn user_from_entry(key: &str, key_id: Option<u64>, value: &Value) -> Result<SocialUser, NormalizeError> {
    let invalid = |reason: String| NormalizeError::InvalidRecord {
        kind: "users",
        position: format!("under key {key:?}"),
        reason,
    };

    match value {
        Value::String(name) => {
            let id = key_id.ok_or_else(|| invalid("key is not a numeric id".into()))?;
            Ok(SocialUser::from_name(id, name.as_str()))
        }
        Value::Object(_) => {
            let entry = UserEntry::deserialize(value).map_err(|e| invalid(e.to_string()))?;
            let id = entry
                .id
                .or(key_id)
                .ok_or_else(|| invalid("no numeric id".into()))?;
            let mut user = SocialUser::from_name(id, entry.name);
            if let Some(email) = entry.email {
                user.email = email;
            }
            if let Some(roll_no) = entry.roll_no {
                user.roll_no = roll_no;
            }
            user.access_code = entry.access_code;
            Ok(user)
        }
        other => Err(invalid(format!("expected a name or a record, found {other}"))),
    }
}

#[derive(Deserialize)]
struct KeyedEntry {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    content: Option<String>,
}

/// Coerces the object values of an id-keyed map into `(id, content)` pairs.
/// Values that aren't objects are skipped.
fn coerce_keyed(
    entries: &Map<String, Value>,
    kind: &'static str,
    missing_content: &str,
) -> Result<Vec<(u64, String)>, NormalizeError> {
    keyed_entries(entries)
        .into_iter()
        .filter(|(_, _, value)| value.is_object())
        .map(|(key, key_id, value)| -> Result<(u64, String), NormalizeError> {
            let invalid = |reason: String| NormalizeError::InvalidRecord {
                kind,
                position: format!("under key {key:?}"),
                reason,
            };
            let entry = KeyedEntry::deserialize(value).map_err(|e| invalid(e.to_string()))?;
            let id = entry
                .id
                .or(key_id)
                .ok_or_else(|| invalid("no numeric id".into()))?;
            let content = entry.content.unwrap_or_else(|| missing_content.to_string());
            Ok((id, content))
        })
        .collect()
}
