//! # apiq — query builder for resource APIs
//!
//! Describe the columns, filters and related resources a request needs,
//! then send them as one flat set of parameters. Validation errors that
//! come back keyed by dotted paths are expanded into the same nesting as
//! the submitted data.
//!
//! ## Quick Example
//!
//! ```
//! use apiq::prelude::*;
//! use serde_json::json;
//!
//! let query = QueryBuilder::new()
//!     .select(["id", "title"])
//!     .filter(("votes", ">", 10))
//!     .or_group(|g| g.filter(("pinned", true)).filter_null(("deleted_at",)))
//!     .with_columns("author", ["id", "name"]);
//!
//! let params = query.to_params(&ParamNames::default()).unwrap();
//! assert_eq!(params["relationships"], json!(["author:id,name"]));
//!
//! let errors = apiq::expand_errors(&json!({ "tags.0.label": ["required"] })).unwrap();
//! assert_eq!(errors, json!({ "tags": [{ "label": ["required"] }] }));
//! ```
//!
//! ## Filter wire format
//!
//! | Builder call          | Element                               |
//! |-----------------------|---------------------------------------|
//! | `filter`              | `{"type": "where", "args": [...]}`    |
//! | `filter_null`         | `{"type": "null", "args": [...]}`     |
//! | `filter_not_null`     | `{"type": "notNull", "args": [...]}`  |
//! | `filter_relation`     | `{"type": "whereRel", "args": [...]}` |
//! | `group`               | nested array                          |
//! | any later call        | preceded by `"and"` (`or_*`: `"or"`)  |

pub mod ast;
pub mod config;
pub mod error;
pub mod expander;
pub mod filter;
pub mod params;
pub mod parser;
pub mod query;
pub mod repository;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::{ApiConfig, ParamNames};
    pub use crate::error::*;
    pub use crate::expander::{expand, ErrorTree, FlatErrors};
    pub use crate::filter::FilterBuilder;
    pub use crate::params::{to_query_string, ToParams};
    pub use crate::query::QueryBuilder;
    pub use crate::repository::{
        Action, ApiRepository, ApiRequest, ApiResponse, Method, Transport, TransportError,
    };
}

/// Start a new query.
///
/// # Example
///
/// ```
/// let built = apiq::query().select(["id"]).build();
/// assert_eq!(built.columns, Some(vec!["id".to_string()]));
/// ```
pub fn query() -> query::QueryBuilder {
    query::QueryBuilder::new()
}

/// Expand a JSON map of dotted-path errors into nested JSON.
pub fn expand_errors(errors: &serde_json::Value) -> error::ApiResult<serde_json::Value> {
    expander::expand_value(errors)
}
