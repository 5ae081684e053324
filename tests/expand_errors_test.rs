use apiq::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_dotted_object_path() {
    let nested = apiq::expand_errors(&json!({ "a.b": ["msg"] })).unwrap();
    assert_eq!(nested, json!({ "a": { "b": ["msg"] } }));
}

#[test]
fn test_indexed_rows() {
    let nested = apiq::expand_errors(&json!({
        "0.name": ["required"],
        "1.name": ["required"],
    }))
    .unwrap();
    assert_eq!(nested, json!([{ "name": ["required"] }, { "name": ["required"] }]));
}

#[test]
fn test_shape_mirrors_nested_relationship_form() {
    let nested = apiq::expand_errors(&json!({
        "order.customer.email": ["invalid"],
        "order.lines.0.qty": ["min:1"],
        "order.lines.0.sku": ["required"],
        "order.lines.3.qty": ["min:1"],
        "note": ["max:255"],
    }))
    .unwrap();

    assert_eq!(
        nested,
        json!({
            "note": ["max:255"],
            "order": {
                "customer": { "email": ["invalid"] },
                "lines": [
                    { "qty": ["min:1"], "sku": ["required"] },
                    null,
                    null,
                    { "qty": ["min:1"] },
                ],
            },
        })
    );
}

#[test]
fn test_tree_lookup_matches_flat_keys() {
    let flat: FlatErrors = serde_json::from_value(json!({
        "lines.2.qty": ["min:1"],
        "customer.email": ["invalid"],
    }))
    .unwrap();
    let tree = expand(&flat);

    for (path, messages) in &flat {
        assert_eq!(
            tree.at(path).and_then(ErrorTree::messages),
            Some(messages.as_slice()),
            "lookup of {}",
            path
        );
    }
}

#[test]
fn test_malformed_input_is_an_error() {
    let err = apiq::expand_errors(&json!(["not", "a", "map"])).unwrap_err();
    assert!(matches!(err, ApiError::MalformedErrors(_)));
}

#[test]
fn test_huge_index_keeps_keys() {
    let nested = apiq::expand_errors(&json!({ "18446744073709551615.name": ["required"] })).unwrap();
    assert_eq!(nested, json!({ "18446744073709551615": { "name": ["required"] } }));

    let nested = apiq::expand_errors(&json!({ "5000000.name": ["required"] })).unwrap();
    assert_eq!(nested, json!({ "5000000": { "name": ["required"] } }));
}
