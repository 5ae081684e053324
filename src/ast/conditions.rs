use serde::{Deserialize, Serialize};

use crate::ast::Arg;

/// Kind of a filter condition, as understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Plain comparison (`column`, `[operator]`, `value`).
    #[serde(rename = "where")]
    Where,
    /// Column is null.
    #[serde(rename = "null")]
    Null,
    /// Column is not null.
    #[serde(rename = "notNull")]
    NotNull,
    /// Comparison on a related resource's column.
    #[serde(rename = "whereRel")]
    WhereRelation,
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Where => write!(f, "where"),
            FilterKind::Null => write!(f, "null"),
            FilterKind::NotNull => write!(f, "notNull"),
            FilterKind::WhereRelation => write!(f, "whereRel"),
        }
    }
}

/// Boolean operator joining two sibling filter nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    #[default]
    And,
    Or,
}

impl std::fmt::Display for Join {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Join::And => write!(f, "and"),
            Join::Or => write!(f, "or"),
        }
    }
}

/// A single filter leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: FilterKind,
    pub args: Vec<Arg>,
}

impl Condition {
    pub fn new(kind: FilterKind, args: Vec<Arg>) -> Self {
        Self { kind, args }
    }
}

/// One element of a filter sequence.
///
/// Serializes without a tag: joins as `"and"`/`"or"`, conditions as
/// `{"type": ..., "args": [...]}` and groups as nested arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Join(Join),
    Condition(Condition),
    /// Parenthesized subgroup.
    Group(FilterList),
}

impl FilterNode {
    pub fn is_join(&self) -> bool {
        matches!(self, FilterNode::Join(_))
    }
}

/// Alternating condition/join sequence, starting and ending with a non-join.
pub type FilterList = Vec<FilterNode>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_condition_wire_shape() {
        let cond = Condition::new(FilterKind::NotNull, vec![Arg::from("column_d")]);
        assert_eq!(
            serde_json::to_value(&cond).unwrap(),
            json!({ "type": "notNull", "args": ["column_d"] })
        );
    }

    #[test]
    fn test_filter_list_reads_back() {
        let raw = json!([
            { "type": "where", "args": ["a", 1] },
            "or",
            [{ "type": "whereRel", "args": ["rel", "col", 2] }]
        ]);
        let list: FilterList = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[1], FilterNode::Join(Join::Or));
        assert!(matches!(&list[2], FilterNode::Group(g) if g.len() == 1));
        assert_eq!(serde_json::to_value(&list).unwrap(), raw);
    }
}
