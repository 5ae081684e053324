//! Error path expander.
//!
//! Validation failures come back as a flat map of dotted paths:
//!
//! ```text
//! { "title": ["required"], "tags.0.label": ["too long"] }
//! ```
//!
//! [`expand`] rebuilds the nesting so errors line up with the shape of the
//! submitted data:
//!
//! ```text
//! { "title": ["required"], "tags": [ { "label": ["too long"] } ] }
//! ```
//!
//! A level becomes a list as soon as one of its keys starts with an integer
//! segment; lists may be sparse. Indices above [`MAX_LIST_INDEX`] keep the
//! level a map, so a stray large index never turns into a long run of `null`
//! holes.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{ApiError, ApiResult};
use crate::parser::{parse_index, split_path};

/// Largest item index expanded into a list.
pub const MAX_LIST_INDEX: usize = 1024;

/// Flat validation errors, keyed by dotted path.
pub type FlatErrors = BTreeMap<String, Vec<String>>;

/// Nested validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTree {
    /// Messages for a single field.
    Messages(Vec<String>),
    /// Errors for list items, keyed by item index.
    List(BTreeMap<usize, ErrorTree>),
    /// Errors for named fields.
    Map(BTreeMap<String, ErrorTree>),
}

impl ErrorTree {
    /// Child for one path segment.
    pub fn get(&self, segment: &str) -> Option<&ErrorTree> {
        match self {
            ErrorTree::Messages(_) => None,
            ErrorTree::List(items) => parse_index(segment).and_then(|i| items.get(&i)),
            ErrorTree::Map(fields) => fields.get(segment),
        }
    }

    /// Node at a dotted path, e.g. `tags.0.label`.
    pub fn at(&self, path: &str) -> Option<&ErrorTree> {
        match split_path(path) {
            (head, None) => self.get(head),
            (head, Some(tail)) => self.get(head)?.at(tail),
        }
    }

    pub fn messages(&self) -> Option<&[String]> {
        match self {
            ErrorTree::Messages(messages) => Some(messages),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ErrorTree::Messages(messages) => messages.is_empty(),
            ErrorTree::List(items) => items.is_empty(),
            ErrorTree::Map(fields) => fields.is_empty(),
        }
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorTree::Messages(messages) => messages.serialize(serializer),
            ErrorTree::List(items) => match items.keys().next_back() {
                Some(&last) if last > MAX_LIST_INDEX => {
                    let mut map = serializer.serialize_map(Some(items.len()))?;
                    for (index, tree) in items {
                        map.serialize_entry(&index.to_string(), tree)?;
                    }
                    map.end()
                }
                last => {
                    let len = last.map_or(0, |&last| last + 1);
                    let mut seq = serializer.serialize_seq(Some(len))?;
                    for i in 0..len {
                        seq.serialize_element(&items.get(&i))?;
                    }
                    seq.end()
                }
            },
            ErrorTree::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (field, tree) in fields {
                    map.serialize_entry(field, tree)?;
                }
                map.end()
            }
        }
    }
}

/// Expand dotted paths into a nested structure.
pub fn expand(errors: &FlatErrors) -> ErrorTree {
    let entries: Vec<(&str, &[String])> = errors
        .iter()
        .map(|(path, messages)| (path.as_str(), messages.as_slice()))
        .collect();
    expand_level(&entries)
}

/// Expand a JSON value holding flat errors.
pub fn expand_value(errors: &serde_json::Value) -> ApiResult<serde_json::Value> {
    let flat: FlatErrors = serde_json::from_value(errors.clone())
        .map_err(|e| ApiError::MalformedErrors(e.to_string()))?;
    Ok(serde_json::to_value(expand(&flat))?)
}

/// Replace the `errors` field of a failure payload with its expanded form.
///
/// Returns `Ok(false)` when the payload carries no `errors` field. On error
/// the payload is left untouched.
pub fn rewrite_errors(payload: &mut serde_json::Value) -> ApiResult<bool> {
    let Some(errors) = payload.get_mut("errors") else {
        return Ok(false);
    };
    *errors = expand_value(errors)?;
    Ok(true)
}

fn expand_level(entries: &[(&str, &[String])]) -> ErrorTree {
    let indices: Vec<usize> = entries
        .iter()
        .filter_map(|(path, _)| parse_index(split_path(path).0))
        .collect();
    let out_of_range = indices.iter().any(|&i| i > MAX_LIST_INDEX);
    if out_of_range {
        tracing::warn!(
            "Keeping errors keyed by index as a map: index above {}",
            MAX_LIST_INDEX
        );
    }
    let is_list = !indices.is_empty() && !out_of_range;

    if is_list {
        ErrorTree::List(assemble(entries, |head| {
            let index = parse_index(head);
            if index.is_none() {
                tracing::warn!("Dropping non-index key '{}' in list of errors", head);
            }
            index
        }))
    } else {
        ErrorTree::Map(assemble(entries, |head| Some(head.to_string())))
    }
}

/// Group one level of entries under `slot(head)` and recurse into dotted tails.
fn assemble<'a, K, F>(entries: &[(&'a str, &'a [String])], slot: F) -> BTreeMap<K, ErrorTree>
where
    K: Ord + Debug,
    F: Fn(&str) -> Option<K>,
{
    let mut direct: BTreeMap<K, Vec<String>> = BTreeMap::new();
    let mut nested: BTreeMap<K, Vec<(&'a str, &'a [String])>> = BTreeMap::new();

    for &(path, messages) in entries {
        let (head, tail) = split_path(path);
        let Some(key) = slot(head) else {
            continue;
        };
        match tail {
            None => {
                if let Some(replaced) = direct.insert(key, messages.to_vec()) {
                    tracing::warn!(
                        "Key '{}' overwrites {} message(s) of an equivalent key",
                        path,
                        replaced.len()
                    );
                }
            }
            Some(tail) => nested.entry(key).or_default().push((tail, messages)),
        }
    }

    let mut level: BTreeMap<K, ErrorTree> = BTreeMap::new();
    for (key, children) in nested {
        if direct.contains_key(&key) {
            // Messages for the field itself take precedence over its children.
            tracing::warn!(
                "Dropping {} nested error path(s) under {:?}, which has its own messages",
                children.len(),
                key
            );
            continue;
        }
        level.insert(key, expand_level(&children));
    }
    for (key, messages) in direct {
        level.insert(key, ErrorTree::Messages(messages));
    }
    level
}
