//! Document validation
//!
//! Validation and parsing are one pass: a document that passes is returned
//! as a [`Node`] tree, a document that fails yields the first violation found
//! (depth-first, in document order) together with its path.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Reason, ValidationError};
use crate::node::{ENV_PREFIX, FilterNode, FilterSource, Node, ObjectNode, RangeEntry, Selector, ValueNode};
use crate::scalar;

/// Legal `$filter` values.
///
/// `^` binds only to the `$env.` alternative and `$` only to the dotted path
/// alternative, so a value passes when it starts with an environment
/// reference or ends with a dotted path (`user-agent` is legal, `4$` is not).
/// Word characters are ASCII only.
static FILTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\$env\.(?-u:\w)+)|((?-u:\w)+(\.(?-u:\w)+)*)$").unwrap());

type Outcome<T> = std::result::Result<T, ValidationError>;

/// Check a document without keeping the parsed tree.
pub fn validate(document: &Value) -> Outcome<()> {
    parse(document).map(|_| ())
}

/// Validate a document and parse it into a [`Node`] tree.
pub fn parse(document: &Value) -> Outcome<Node> {
    parse_node(document, "")
}

fn parse_node(value: &Value, path: &str) -> Outcome<Node> {
    match value {
        Value::Object(map) => parse_object(map, path),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_node(item, &format!("{path}/{index}")))
            .collect::<Outcome<Vec<_>>>()
            .map(Node::Array),
        Value::String(s) => Ok(match s.strip_prefix(ENV_PREFIX) {
            Some(name) => Node::Env(name.to_string()),
            None => Node::Literal(value.clone()),
        }),
        _ => Ok(Node::Literal(value.clone())),
    }
}

/// Directives and branches collected from one mapping.
#[derive(Default)]
struct Directives {
    filter: Option<(String, FilterSource)>,
    range: Option<Vec<RangeEntry>>,
    default: Option<Node>,
    base: Option<Node>,
    meta: Option<Value>,
    id: Option<String>,
    value: Option<Node>,
    branches: Vec<(String, Node)>,
}

fn parse_object(map: &Map<String, Value>, path: &str) -> Outcome<Node> {
    let error = |reason| ValidationError::new(reason, path);
    let mut found = Directives::default();

    for (key, value) in map {
        match key.as_str() {
            "$filter" => found.filter = Some(parse_filter(value).map_err(error)?),
            "$range" => found.range = Some(parse_range(value, path)?),
            "$default" => found.default = Some(parse_node(value, &format!("{path}/$default"))?),
            "$base" => found.base = Some(parse_node(value, &format!("{path}/$base"))?),
            "$meta" => found.meta = Some(value.clone()),
            "$id" => match value {
                Value::String(id) if !id.is_empty() => found.id = Some(id.clone()),
                _ => return Err(error(Reason::InvalidId)),
            },
            "$value" => found.value = Some(parse_node(value, &format!("{path}/$value"))?),
            directive if directive.starts_with('$') => {
                return Err(error(Reason::UnknownDirective(directive.to_string())));
            }
            branch => {
                let node = parse_node(value, &format!("{path}/{branch}"))?;
                found.branches.push((branch.to_string(), node));
            }
        }
    }

    let has_branches = !found.branches.is_empty();
    let has_filter = found.filter.is_some();
    let has_range = found.range.is_some();
    let has_default = found.default.is_some();

    if found.value.is_some() && (has_branches || has_range || has_default || has_filter) {
        return Err(error(Reason::ValueWithSiblings));
    }
    if has_default && !has_filter {
        return Err(error(Reason::DefaultWithoutFilter));
    }
    if has_filter && !has_default && !has_branches && !has_range {
        return Err(error(Reason::FilterWithoutValues));
    }
    if has_filter && has_default && !has_branches && !has_range {
        return Err(error(Reason::FilterWithOnlyDefault));
    }
    if has_range && !has_filter {
        return Err(error(Reason::RangeWithoutFilter));
    }
    if has_range && has_branches {
        return Err(error(Reason::RangeWithBranches));
    }

    if let Some(value) = found.value {
        return Ok(Node::Value(ValueNode {
            value: Box::new(value),
            base: found.base.map(Box::new),
            meta: found.meta,
        }));
    }

    if let Some((name, source)) = found.filter {
        let selector = match found.range {
            Some(entries) => Selector::Range(entries),
            None => Selector::Branches(found.branches),
        };
        return Ok(Node::Filter(FilterNode {
            name,
            source,
            id: found.id,
            selector,
            default: found.default.map(Box::new),
            base: found.base.map(Box::new),
        }));
    }

    // `$id` and `$base` have no effect on a plain mapping
    Ok(Node::Object(ObjectNode {
        entries: found.branches,
        meta: found.meta,
    }))
}

fn parse_filter(value: &Value) -> std::result::Result<(String, FilterSource), Reason> {
    if !scalar::is_truthy(value) {
        return Err(Reason::EmptyFilter);
    }
    let Value::String(name) = value else {
        return Err(Reason::FilterNotString);
    };
    if !FILTER_PATTERN.is_match(name) {
        return Err(Reason::InvalidFilter(name.clone()));
    }

    let source = match name.strip_prefix(ENV_PREFIX) {
        Some(var) => FilterSource::Env(var.to_string()),
        None => FilterSource::Criteria(name.clone()),
    };
    Ok((name.clone(), source))
}

fn parse_range(value: &Value, path: &str) -> Outcome<Vec<RangeEntry>> {
    let error = |reason| ValidationError::new(reason, path);

    let Value::Array(items) = value else {
        return Err(error(Reason::RangeNotArray));
    };
    if items.is_empty() {
        return Err(error(Reason::EmptyRange));
    }

    let mut entries: Vec<RangeEntry> = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(entry) = item else {
            return Err(error(Reason::InvalidRangeEntry));
        };
        let Some(limit) = entry.get("limit") else {
            return Err(error(Reason::RangeEntryMissingLimit));
        };
        let Some(limit) = limit.as_f64() else {
            return Err(error(Reason::RangeLimitNotNumber));
        };
        if let Some(previous) = entries.last().map(|e| e.limit) {
            if limit <= previous {
                return Err(error(Reason::RangeNotSorted {
                    limit: scalar::number_to_string(limit),
                    previous: scalar::number_to_string(previous),
                }));
            }
        }
        let Some(value) = entry.get("value") else {
            return Err(error(Reason::RangeEntryMissingValue));
        };

        let value = parse_node(
            value,
            &format!("{path}/$range[{}]", scalar::number_to_string(limit)),
        )?;
        let id = entry
            .get("id")
            .filter(|id| scalar::is_truthy(id))
            .map(scalar::to_key);

        entries.push(RangeEntry { limit, value, id });
    }

    Ok(entries)
}
