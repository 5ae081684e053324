//! Wire-level data for built queries.
//!
//! Everything here is plain serializable data. The fluent builders live in
//! [`crate::filter`] and [`crate::query`].

pub mod conditions;
pub mod query;
pub mod relationships;
pub mod values;

pub use self::conditions::{Condition, FilterKind, FilterList, FilterNode, Join};
pub use self::query::BuiltQuery;
pub use self::relationships::{NestedRelationship, Relationship};
pub use self::values::{Arg, IntoArgs};
