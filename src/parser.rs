//! Small nom parsers for the string forms that travel on the wire.
//!
//! # Compact relationships
//!
//! ```text
//! author:id,name
//! ──┬─── ───┬───
//!   │       └── Columns (comma separated, optional)
//!   └── Relationship name
//! ```
//!
//! # Dotted paths
//!
//! Validation errors come back keyed by paths such as `items.0.name`.
//! Only the first segment is split off at a time; the expander recurses on
//! the tail.

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, opt, rest},
    multi::separated_list1,
    sequence::{pair, preceded},
    IResult,
};

use crate::ast::Relationship;
use crate::error::{ApiError, ApiResult};

/// Parse a relationship entry in string form (`name` or `name:c1,c2`).
pub fn parse_relationship(input: &str) -> ApiResult<Relationship> {
    match relationship(input) {
        Ok(("", rel)) => Ok(rel),
        Ok((remaining, _)) => Err(ApiError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(e) => Err(ApiError::parse(0, format!("Parse failed: {:?}", e))),
    }
}

fn relationship(input: &str) -> IResult<&str, Relationship> {
    let (input, name) = parse_name(input)?;
    let (input, scope) = opt(preceded(char(':'), opt(parse_columns)))(input)?;

    let rel = match scope {
        None => Relationship::Name(name.to_string()),
        Some(columns) => Relationship::Columns {
            name: name.to_string(),
            columns: columns.unwrap_or_default(),
        },
    };
    Ok((input, rel))
}

fn parse_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ':' && c != ',')(input)
}

fn parse_columns(input: &str) -> IResult<&str, Vec<String>> {
    map(
        separated_list1(char(','), take_while1(|c: char| c != ',')),
        |cols: Vec<&str>| cols.into_iter().map(str::to_string).collect(),
    )(input)
}

/// Split a dotted path on its first separator.
///
/// `"a.b.c"` gives `("a", Some("b.c"))`, `"a"` gives `("a", None)`.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    let parsed: IResult<&str, (&str, Option<&str>)> =
        pair(take_till(|c: char| c == '.'), opt(preceded(char('.'), rest)))(path);

    match parsed {
        Ok((_, split)) => split,
        Err(_) => (path, None),
    }
}

/// Parse a path segment that is entirely a non-negative integer.
pub fn parse_index(segment: &str) -> Option<usize> {
    let parsed: IResult<&str, &str> = all_consuming(digit1)(segment);
    parsed.ok().and_then(|(_, digits)| digits.parse().ok())
}
