use serde::{Deserialize, Serialize};

use crate::ast::{FilterList, Relationship};

/// Output of [`QueryBuilder::build`](crate::query::QueryBuilder::build).
///
/// Every part is `None` when its collection is empty. Parameter names are
/// applied later, by [`ToParams`](crate::params::ToParams).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuiltQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
}

impl BuiltQuery {
    pub fn is_empty(&self) -> bool {
        self.columns.is_none() && self.filters.is_none() && self.relationships.is_none()
    }
}
