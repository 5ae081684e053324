use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ast::FilterList;

/// A related resource to include in the response.
#[derive(Debug, Clone, PartialEq)]
pub enum Relationship {
    /// Bare relationship name, sent verbatim.
    Name(String),
    /// Compact column scope, sent as `name:c1,c2`.
    Columns { name: String, columns: Vec<String> },
    /// Structured form, needed once filters or nested relationships appear.
    Nested(NestedRelationship),
}

/// Structured relationship entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedRelationship {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
}

impl NestedRelationship {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: None,
            filters: None,
            relationships: None,
        }
    }
}

impl Relationship {
    /// Name of the related resource.
    pub fn name(&self) -> &str {
        match self {
            Relationship::Name(name) => name,
            Relationship::Columns { name, .. } => name,
            Relationship::Nested(nested) => &nested.name,
        }
    }

    /// Wire form for the string variants.
    pub fn compact(&self) -> Option<String> {
        match self {
            Relationship::Name(name) => Some(name.clone()),
            Relationship::Columns { name, columns } => Some(format!("{}:{}", name, columns.join(","))),
            Relationship::Nested(_) => None,
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.compact() {
            Some(compact) => write!(f, "{}", compact),
            None => write!(f, "{} {{..}}", self.name()),
        }
    }
}

impl Serialize for Relationship {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Relationship::Nested(nested) => nested.serialize(serializer),
            _ => serializer.serialize_str(&self.compact().unwrap_or_default()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelationship {
    Compact(String),
    Nested(NestedRelationship),
}

impl<'de> Deserialize<'de> for Relationship {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawRelationship::deserialize(deserializer)? {
            RawRelationship::Compact(raw) => {
                crate::parser::parse_relationship(&raw).map_err(serde::de::Error::custom)
            }
            RawRelationship::Nested(nested) => Ok(Relationship::Nested(nested)),
        }
    }
}
