//! Format-aware document loading
//!
//! Every supported format is converted into a `serde_json::Value`. Values a
//! JSON tree cannot hold (TOML datetimes, YAML tags, non-scalar mapping keys,
//! non-finite numbers) are rejected with the path where they occur.

use std::fmt;
use std::path::Path;

use confidence_core::{Reason, ValidationError, scalar};
use serde_json::{Map, Number, Value};

use crate::{Error, Result, io};

/// Documents larger than this are refused unless configured otherwise.
pub const DEFAULT_MAX_SIZE: u64 = 16 * 1024 * 1024;

/// Serialization format of an authored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Detect the format of the file at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&extension).ok_or(Error::UnsupportedFormat { extension })
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

/// Loads documents from files or strings.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    max_size: u64,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    /// Create a loader with the default size limit.
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Create a loader refusing files over `max_size` bytes.
    pub fn with_max_size(max_size: u64) -> Self {
        Self { max_size }
    }

    /// Load a document from a file.
    ///
    /// Format is detected from file extension:
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    pub fn load(&self, path: &Path) -> Result<Value> {
        let format = DocumentFormat::from_path(path)?;
        let content = io::read_text(path, self.max_size)?;
        tracing::debug!(?path, %format, "Loading document");
        self.parse(&content, format).map_err(|e| e.in_file(path))
    }

    /// Parse document text in the given format.
    pub fn parse(&self, content: &str, format: DocumentFormat) -> Result<Value> {
        let parse_error = |message: String| Error::Parse {
            path: None,
            format,
            message,
        };

        match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            DocumentFormat::Yaml => {
                let value: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                Ok(from_yaml(&value, "")?)
            }
            DocumentFormat::Toml => {
                let table: toml::Table = toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                Ok(from_toml_table(&table, "")?)
            }
        }
    }
}

fn invalid(path: &str) -> ValidationError {
    ValidationError::new(Reason::InvalidNodeType, path)
}

fn float(f: f64, path: &str) -> std::result::Result<Value, ValidationError> {
    Number::from_f64(f).map(Value::Number).ok_or_else(|| invalid(path))
}

fn from_yaml(value: &serde_yaml::Value, path: &str) -> std::result::Result<Value, ValidationError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                float(n.as_f64().unwrap_or(f64::NAN), path)?
            }
        }
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| from_yaml(item, &format!("{path}/{index}")))
                .collect::<std::result::Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = yaml_key(key).ok_or_else(|| invalid(path))?;
                let item = from_yaml(item, &format!("{path}/{key}"))?;
                map.insert(key, item);
            }
            Value::Object(map)
        }
        Yaml::Tagged(_) => return Err(invalid(path)),
    })
}

/// Scalar mapping keys become strings; anything else is not a valid key.
fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Null | Yaml::Bool(_) | Yaml::Number(_) => from_yaml(key, "").ok().map(|v| scalar::to_key(&v)),
        Yaml::Sequence(_) | Yaml::Mapping(_) | Yaml::Tagged(_) => None,
    }
}

fn from_toml(value: &toml::Value, path: &str) -> std::result::Result<Value, ValidationError> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::from(*i),
        toml::Value::Float(f) => float(*f, path)?,
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(_) => return Err(invalid(path)),
        toml::Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| from_toml(item, &format!("{path}/{index}")))
                .collect::<std::result::Result<_, _>>()?,
        ),
        toml::Value::Table(table) => from_toml_table(table, path)?,
    })
}

fn from_toml_table(table: &toml::Table, path: &str) -> std::result::Result<Value, ValidationError> {
    let mut map = Map::with_capacity(table.len());
    for (key, item) in table {
        map.insert(key.clone(), from_toml(item, &format!("{path}/{key}"))?);
    }
    Ok(Value::Object(map))
}
