use apiq::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn params(query: &QueryBuilder) -> Value {
    Value::Object(query.to_params(&ParamNames::default()).unwrap())
}

#[test]
fn test_empty_builder_returns_empty_object() {
    assert_eq!(params(&QueryBuilder::new()), json!({}));
}

#[test]
fn test_selected_columns_are_added() {
    let q = QueryBuilder::new().select(["a", "b", "c"]);
    assert_eq!(params(&q), json!({ "columns": ["a", "b", "c"] }));
}

#[test]
fn test_single_condition() {
    let q = QueryBuilder::new().filter(("column", 1));
    assert_eq!(
        params(&q),
        json!({ "filters": [{ "type": "where", "args": ["column", 1] }] })
    );
}

#[test]
fn test_conditions_joined_with_and_by_default() {
    let q = QueryBuilder::new().filter(("column_a", 1)).filter(("column_b", 2));
    assert_eq!(
        params(&q),
        json!({
            "filters": [
                { "type": "where", "args": ["column_a", 1] },
                "and",
                { "type": "where", "args": ["column_b", 2] },
            ]
        })
    );
}

#[test]
fn test_conditions_joined_with_or() {
    let q = QueryBuilder::new().filter(("column_a", 1)).or_filter(("column_b", 2));
    assert_eq!(
        params(&q),
        json!({
            "filters": [
                { "type": "where", "args": ["column_a", 1] },
                "or",
                { "type": "where", "args": ["column_b", 2] },
            ]
        })
    );
}

#[test]
fn test_conditions_joined_with_and_then_or() {
    let q = QueryBuilder::new()
        .filter(("column_a", 1))
        .filter_null(("column_b",))
        .or_filter(("column_c", 2));
    assert_eq!(
        params(&q),
        json!({
            "filters": [
                { "type": "where", "args": ["column_a", 1] },
                "and",
                { "type": "null", "args": ["column_b"] },
                "or",
                { "type": "where", "args": ["column_c", 2] },
            ]
        })
    );
}

#[test]
fn test_filter_with_subgroup() {
    let q = QueryBuilder::new()
        .filter(("column_a", 1))
        .or_group(|g| g.filter(("column_b", 2)).filter(("column_c", 3)));
    assert_eq!(
        params(&q),
        json!({
            "filters": [
                { "type": "where", "args": ["column_a", 1] },
                "or",
                [
                    { "type": "where", "args": ["column_b", 2] },
                    "and",
                    { "type": "where", "args": ["column_c", 3] },
                ],
            ]
        })
    );
}

#[test]
fn test_complex_filter() {
    let q = QueryBuilder::new()
        .filter(("column_a", ">", 2))
        .or_filter_relation(("relationship_a", "rel_a_col_a", 3))
        .group(|g| {
            g.filter_null(("column_c",))
                .filter_not_null(("column_d",))
                .or_filter_relation(("relationship_b", "rel_b_col_a", "<", 4))
                .or_group(|g| g.filter(("column_e", 5)).or_filter(("column_f", 6)))
        });

    assert_eq!(
        params(&q),
        json!({
            "filters": [
                { "type": "where", "args": ["column_a", ">", 2] },
                "or",
                { "type": "whereRel", "args": ["relationship_a", "rel_a_col_a", 3] },
                "and",
                [
                    { "type": "null", "args": ["column_c"] },
                    "and",
                    { "type": "notNull", "args": ["column_d"] },
                    "or",
                    { "type": "whereRel", "args": ["relationship_b", "rel_b_col_a", "<", 4] },
                    "or",
                    [
                        { "type": "where", "args": ["column_e", 5] },
                        "or",
                        { "type": "where", "args": ["column_f", 6] },
                    ],
                ],
            ]
        })
    );
}

#[test]
fn test_simple_relationship() {
    let q = QueryBuilder::new().with("relationship");
    assert_eq!(params(&q), json!({ "relationships": ["relationship"] }));
}

#[test]
fn test_relationship_name_is_sent_verbatim() {
    let q = QueryBuilder::new().with("relationship:column_a,column_b,column_c");
    assert_eq!(
        params(&q),
        json!({ "relationships": ["relationship:column_a,column_b,column_c"] })
    );
}

#[test]
fn test_relationship_with_columns_in_subquery() {
    let q = QueryBuilder::new()
        .with_query("relationship", |q| q.select(["column_a", "column_b", "column_c"]));
    assert_eq!(
        params(&q),
        json!({ "relationships": ["relationship:column_a,column_b,column_c"] })
    );
}

#[test]
fn test_relationship_with_filters_in_subquery() {
    let q = QueryBuilder::new()
        .with_query("relationship", |q| q.filter(("column_a", 1)).or_filter(("column_b", 2)));
    assert_eq!(
        params(&q),
        json!({
            "relationships": [{
                "name": "relationship",
                "filters": [
                    { "type": "where", "args": ["column_a", 1] },
                    "or",
                    { "type": "where", "args": ["column_b", 2] },
                ],
            }]
        })
    );
}

#[test]
fn test_relationship_with_sub_relationships_in_subquery() {
    let q = QueryBuilder::new().with_query("relationship", |q| q.with("another_rel"));
    assert_eq!(
        params(&q),
        json!({
            "relationships": [{ "name": "relationship", "relationships": ["another_rel"] }]
        })
    );
}

#[test]
fn test_deeply_nested_relationships() {
    let q = QueryBuilder::new()
        .select(["id"])
        .with_query("posts", |q| {
            q.select(["id", "title"])
                .with_query("comments", |q| q.select(["id", "body"]))
                .with_query("tags", |q| q.filter_not_null(("approved_at",)))
        });

    assert_eq!(
        params(&q),
        json!({
            "columns": ["id"],
            "relationships": [{
                "name": "posts",
                "columns": ["id", "title"],
                "relationships": [
                    "comments:id,body",
                    {
                        "name": "tags",
                        "filters": [{ "type": "notNull", "args": ["approved_at"] }],
                    },
                ],
            }]
        })
    );
}

#[test]
fn test_when_composes_conditionally() {
    let search: Option<&str> = Some("rust");
    let only_mine = false;

    let q = QueryBuilder::new()
        .when(search.is_some(), |q| q.filter(("title", "like", search.unwrap_or_default())))
        .when(only_mine, |q| q.filter(("owner_id", 1)))
        .when_fn(|| search.is_some_and(|s| s.len() > 2), |q| q.with("author"));

    assert_eq!(
        params(&q),
        json!({
            "filters": [{ "type": "where", "args": ["title", "like", "rust"] }],
            "relationships": ["author"],
        })
    );
}

#[test]
fn test_configured_param_names() {
    let config = ApiConfig::builder()
        .columns_param("fields")
        .filters_param("where")
        .relationships_param("include")
        .build()
        .unwrap();
    let q = QueryBuilder::new().select(["id"]).filter_null(("deleted_at",)).with("team");

    assert_eq!(
        Value::Object(q.to_params(&config.param_names).unwrap()),
        json!({
            "fields": ["id"],
            "where": [{ "type": "null", "args": ["deleted_at"] }],
            "include": ["team"],
        })
    );
}
