//! Query composer.
//!
//! Columns, filters and relationships for one request, composed fluently
//! and rendered with [`QueryBuilder::build`].
//!
//! ```
//! use apiq::prelude::*;
//!
//! let built = QueryBuilder::new()
//!     .select(["id", "title"])
//!     .filter(("published", true))
//!     .with_columns("author", ["id", "name"])
//!     .with_query("comments", |q| q.filter(("approved", true)))
//!     .build();
//!
//! assert_eq!(built.columns, Some(vec!["id".to_string(), "title".to_string()]));
//! assert_eq!(built.relationships.unwrap()[0].to_string(), "author:id,name");
//! ```

use crate::ast::{BuiltQuery, IntoArgs, NestedRelationship, Relationship};
use crate::filter::FilterBuilder;

/// Fluent builder for columns, filters and relationships.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    columns: Vec<String>,
    filters: FilterBuilder,
    relationships: Vec<Relationship>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected columns.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        self
    }

    pub fn filter(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.filter(args);
        self
    }

    pub fn filter_null(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.filter_null(args);
        self
    }

    pub fn filter_not_null(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.filter_not_null(args);
        self
    }

    pub fn filter_relation(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.filter_relation(args);
        self
    }

    pub fn or_filter(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.or_filter(args);
        self
    }

    pub fn or_filter_null(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.or_filter_null(args);
        self
    }

    pub fn or_filter_not_null(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.or_filter_not_null(args);
        self
    }

    pub fn or_filter_relation(mut self, args: impl IntoArgs) -> Self {
        self.filters = self.filters.or_filter_relation(args);
        self
    }

    pub fn group<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(FilterBuilder) -> FilterBuilder,
    {
        self.filters = self.filters.group(callback);
        self
    }

    pub fn or_group<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(FilterBuilder) -> FilterBuilder,
    {
        self.filters = self.filters.or_group(callback);
        self
    }

    /// Include a relationship by name.
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.relationships.push(Relationship::Name(name.into()));
        self
    }

    /// Include a relationship restricted to `columns` (`name:c1,c2`).
    pub fn with_columns<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        warn_if_ambiguous(&name);
        self.relationships.push(Relationship::Columns {
            name,
            columns: columns
                .into_iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
        });
        self
    }

    /// Include a relationship scoped by a subquery.
    ///
    /// A subquery that only selects columns collapses to the compact
    /// `name:c1,c2` form; anything with filters or nested relationships is
    /// sent as a structured entry.
    pub fn with_query<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        let built = callback(QueryBuilder::new()).build();
        self.relationships.push(encode_relationship(name.into(), built));
        self
    }

    /// Apply `callback` only when `condition` holds.
    pub fn when<F>(self, condition: bool, callback: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { callback(self) } else { self }
    }

    /// Like [`when`](Self::when), with the condition evaluated lazily.
    pub fn when_fn<P, F>(self, predicate: P, callback: F) -> Self
    where
        P: FnOnce() -> bool,
        F: FnOnce(Self) -> Self,
    {
        let condition = predicate();
        self.when(condition, callback)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn filters(&self) -> &FilterBuilder {
        &self.filters
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Render the query, leaving out empty parts.
    pub fn build(&self) -> BuiltQuery {
        BuiltQuery {
            columns: non_empty(&self.columns),
            filters: non_empty(self.filters.nodes()),
            relationships: non_empty(&self.relationships),
        }
    }
}

fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items.to_vec())
    }
}

/// A name sent in the compact `name:c1,c2` form must not contain `:` or `,`.
fn warn_if_ambiguous(name: &str) -> bool {
    let ambiguous = name.contains([':', ',']);
    if ambiguous {
        tracing::warn!("Relationship name '{}' is ambiguous in compact form", name);
    }
    ambiguous
}

/// Choose the wire form of a relationship whose scope came from a subquery.
fn encode_relationship(name: String, built: BuiltQuery) -> Relationship {
    match built {
        BuiltQuery {
            columns: Some(columns),
            filters: None,
            relationships: None,
        } => {
            warn_if_ambiguous(&name);
            Relationship::Columns { name, columns }
        }
        BuiltQuery {
            columns,
            filters,
            relationships,
        } => Relationship::Nested(NestedRelationship {
            name,
            columns,
            filters,
            relationships,
        }),
    }
}
