//! Filter tree builder.
//!
//! Conditions are kept in one flat sequence with a [`Join`] between every
//! pair of siblings. Parenthesized subgroups are nested sequences built by a
//! fresh builder and appended as a single element.
//!
//! ```
//! use apiq::filter::FilterBuilder;
//!
//! let filters = FilterBuilder::new()
//!     .filter(("status", "active"))
//!     .or_group(|g| g.filter(("role", "admin")).filter_not_null(("verified_at",)));
//!
//! assert_eq!(filters.len(), 3);
//! ```

use crate::ast::{Condition, FilterKind, FilterList, FilterNode, IntoArgs, Join};

/// Accumulates filter conditions and joins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBuilder {
    nodes: FilterList,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `and` + plain comparison.
    pub fn filter(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::Where, Join::And, args)
    }

    pub fn filter_null(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::Null, Join::And, args)
    }

    pub fn filter_not_null(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::NotNull, Join::And, args)
    }

    /// `and` + comparison on a related resource (`relation`, `column`, ...).
    pub fn filter_relation(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::WhereRelation, Join::And, args)
    }

    /// `or` + plain comparison.
    pub fn or_filter(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::Where, Join::Or, args)
    }

    pub fn or_filter_null(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::Null, Join::Or, args)
    }

    pub fn or_filter_not_null(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::NotNull, Join::Or, args)
    }

    pub fn or_filter_relation(self, args: impl IntoArgs) -> Self {
        self.push_condition(FilterKind::WhereRelation, Join::Or, args)
    }

    /// `and` + parenthesized subgroup built by `callback`.
    pub fn group<F>(self, callback: F) -> Self
    where
        F: FnOnce(FilterBuilder) -> FilterBuilder,
    {
        self.push_group(Join::And, callback)
    }

    /// `or` + parenthesized subgroup built by `callback`.
    pub fn or_group<F>(self, callback: F) -> Self
    where
        F: FnOnce(FilterBuilder) -> FilterBuilder,
    {
        self.push_group(Join::Or, callback)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &FilterList {
        &self.nodes
    }

    pub fn into_nodes(self) -> FilterList {
        self.nodes
    }

    fn push_condition(self, kind: FilterKind, join: Join, args: impl IntoArgs) -> Self {
        self.push(join, FilterNode::Condition(Condition::new(kind, args.into_args())))
    }

    fn push_group<F>(self, join: Join, callback: F) -> Self
    where
        F: FnOnce(FilterBuilder) -> FilterBuilder,
    {
        let subgroup = callback(FilterBuilder::new());
        self.push(join, FilterNode::Group(subgroup.into_nodes()))
    }

    fn push(mut self, join: Join, node: FilterNode) -> Self {
        if !self.nodes.is_empty() {
            self.nodes.push(FilterNode::Join(join));
        }
        self.nodes.push(node);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Arg;

    fn cond(kind: FilterKind, args: Vec<Arg>) -> FilterNode {
        FilterNode::Condition(Condition::new(kind, args))
    }

    #[test]
    fn test_first_condition_has_no_join() {
        let f = FilterBuilder::new().or_filter(("a", 1));
        assert_eq!(f.nodes(), &vec![cond(FilterKind::Where, vec!["a".into(), 1.into()])]);
    }

    #[test]
    fn test_join_precedes_every_later_node() {
        let f = FilterBuilder::new()
            .filter(("a", 1))
            .filter_null(("b",))
            .or_filter_not_null(("c",))
            .or_group(|g| g.filter(("d", 2)))
            .filter_relation(("rel", "col", 3));

        let nodes = f.nodes();
        assert_eq!(nodes.len(), 9);
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node.is_join(), i % 2 == 1, "node {} out of place", i);
        }
        assert_eq!(nodes[1], FilterNode::Join(Join::And));
        assert_eq!(nodes[3], FilterNode::Join(Join::Or));
        assert_eq!(nodes[5], FilterNode::Join(Join::Or));
        assert_eq!(nodes[7], FilterNode::Join(Join::And));
    }

    #[test]
    fn test_group_is_nested_not_spliced() {
        let f = FilterBuilder::new()
            .filter(("a", 1))
            .group(|g| g.filter(("b", 2)).or_filter(("c", 3)));

        assert_eq!(f.len(), 3);
        match &f.nodes()[2] {
            FilterNode::Group(inner) => {
                assert_eq!(inner.len(), 3);
                assert_eq!(inner[1], FilterNode::Join(Join::Or));
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_args_accepted() {
        let f = FilterBuilder::new().filter(()).or_filter_null(());
        assert_eq!(
            f.into_nodes(),
            vec![
                cond(FilterKind::Where, vec![]),
                FilterNode::Join(Join::Or),
                cond(FilterKind::Null, vec![]),
            ]
        );
    }

    #[test]
    fn test_empty_group_still_appended() {
        let f = FilterBuilder::new().group(|g| g);
        assert_eq!(f.into_nodes(), vec![FilterNode::Group(vec![])]);
    }
}
