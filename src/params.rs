//! Request parameter rendering.
//!
//! A [`BuiltQuery`] only becomes request parameters once it is keyed under
//! the backend's parameter names. [`to_query_string`] then flattens the
//! nested parameters into bracket notation for a GET request.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::ast::BuiltQuery;
use crate::config::ParamNames;
use crate::error::ApiResult;
use crate::query::QueryBuilder;

/// Trait for rendering a query into request parameters.
pub trait ToParams {
    /// Key the query parts under `names`, leaving out empty parts.
    fn to_params(&self, names: &ParamNames) -> ApiResult<Map<String, Value>>;
}

impl ToParams for BuiltQuery {
    fn to_params(&self, names: &ParamNames) -> ApiResult<Map<String, Value>> {
        let mut params = Map::new();

        if let Some(columns) = &self.columns {
            params.insert(names.columns.clone(), Value::from(columns.clone()));
        }
        if let Some(filters) = &self.filters {
            params.insert(names.filters.clone(), serde_json::to_value(filters)?);
        }
        if let Some(relationships) = &self.relationships {
            params.insert(names.relationships.clone(), serde_json::to_value(relationships)?);
        }

        Ok(params)
    }
}

impl ToParams for QueryBuilder {
    fn to_params(&self, names: &ParamNames) -> ApiResult<Map<String, Value>> {
        self.build().to_params(names)
    }
}

impl BuiltQuery {
    /// Read request parameters back into a typed query.
    ///
    /// Keys other than the three configured names are ignored.
    ///
    /// Relationship strings are parsed as the compact `name:c1,c2` form, so a
    /// name that itself contains `:` or `,` does not read back as sent:
    /// `with("a:b")` comes back as relationship `a` restricted to column `b`.
    pub fn from_params(params: &Map<String, Value>, names: &ParamNames) -> ApiResult<Self> {
        Ok(BuiltQuery {
            columns: param(params, &names.columns)?,
            filters: param(params, &names.filters)?,
            relationships: param(params, &names.relationships)?,
        })
    }
}

fn param<T: DeserializeOwned>(params: &Map<String, Value>, name: &str) -> ApiResult<Option<T>> {
    Ok(params
        .get(name)
        .cloned()
        .map(serde_json::from_value)
        .transpose()?)
}

/// Encode parameters as a query string in bracket notation.
///
/// `{"filters": [{"type": "where", "args": ["a", 1]}]}` becomes
/// `filters[0][args][0]=a&filters[0][args][1]=1&filters[0][type]=where`
/// (with the brackets percent-encoded).
pub fn to_query_string(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten(key.clone(), value, &mut pairs);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => pairs.push((prefix, String::new())),
        Value::Bool(b) => pairs.push((prefix, b.to_string())),
        Value::Number(n) => pairs.push((prefix, n.to_string())),
        Value::String(s) => pairs.push((prefix, s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(format!("{}[{}]", prefix, i), item, pairs);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                flatten(format!("{}[{}]", prefix, field), item, pairs);
            }
        }
    }
}
