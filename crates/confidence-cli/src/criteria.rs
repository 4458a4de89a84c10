//! Building criteria from the command line

use std::path::Path;

use confidence_loader::DocumentLoader;
use serde_json::{Map, Value};

use crate::error::{CliError, Result};

/// Split a `path=value` filter argument.
///
/// The value is read as a JSON scalar when it parses as one (`5`, `true`,
/// `null`) and kept as a string otherwise.
pub fn parse_filter(arg: &str) -> Result<(Vec<&str>, Value)> {
    let (path, raw) = arg
        .split_once('=')
        .ok_or_else(|| CliError::user(format!("Invalid filter '{arg}': expected PATH=VALUE")))?;

    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(CliError::user(format!("Invalid filter path '{path}'")));
    }

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) if !value.is_object() && !value.is_array() => value,
        _ => Value::String(raw.to_string()),
    };
    Ok((segments, value))
}

/// Set `value` at `segments` inside `root`, creating objects on the way.
fn insert(root: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(last.to_string(), value);
}

/// Build the criteria for a lookup.
///
/// Starts from the criteria document when one is given and layers every
/// `--filter` entry on top in order.
pub fn build(loader: &DocumentLoader, file: Option<&Path>, filters: &[String]) -> Result<Value> {
    let mut criteria = match file {
        Some(path) => match loader.load(path)? {
            Value::Object(map) => map,
            _ => {
                return Err(CliError::user(format!(
                    "Criteria document {} must be an object",
                    path.display()
                )));
            }
        },
        None => Map::new(),
    };

    for arg in filters {
        let (segments, value) = parse_filter(arg)?;
        tracing::debug!(filter = %arg, "Adding criterion");
        insert(&mut criteria, &segments, value);
    }

    Ok(Value::Object(criteria))
}
