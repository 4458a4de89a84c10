//! Resolution context
//!
//! Everything a lookup reads besides the document: the criteria mapping, the
//! environment used by `$env.` references, and an optional sink recording
//! which filters were applied.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::FilterSource;

/// Read-only source of environment variables.
pub trait Environment {
    /// Value of the variable `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// One entry of the applied-filter log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilter {
    /// Filter name as written in the document
    pub filter: String,

    /// What satisfied the filter: the criterion, the range entry, or `$default`.
    /// Absent when nothing matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_id: Option<String>,

    /// `$id` of the filter node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<String>,
}

impl AppliedFilter {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            value_id: None,
            filter_id: None,
        }
    }

    pub fn with_value_id(mut self, value_id: impl Into<String>) -> Self {
        self.value_id = Some(value_id.into());
        self
    }

    pub fn with_filter_id(mut self, filter_id: impl Into<String>) -> Self {
        self.filter_id = Some(filter_id.into());
        self
    }
}

/// Context threaded through one `get` or `meta` call.
///
/// # Example
///
/// ```
/// use confidence_core::{Resolver, Store};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let store = Store::from_document(&json!({
///     "db": { "$filter": "env", "production": "db.internal", "$default": "localhost", "test": "mem" }
/// }))
/// .unwrap();
///
/// let criteria = json!({ "env": "production" });
/// let env: HashMap<String, String> = HashMap::new();
/// let mut applied = Vec::new();
/// let mut resolver = Resolver::new(&criteria).with_env(&env).with_applied(&mut applied);
///
/// assert_eq!(store.resolve("/db", &mut resolver), Some(json!("db.internal")));
/// assert_eq!(applied[0].value_id.as_deref(), Some("production"));
/// ```
pub struct Resolver<'a> {
    criteria: &'a Value,
    env: &'a dyn Environment,
    applied: Option<&'a mut Vec<AppliedFilter>>,
}

impl<'a> Resolver<'a> {
    /// Resolve against `criteria` and the process environment, without a log.
    pub fn new(criteria: &'a Value) -> Self {
        Self {
            criteria,
            env: &ProcessEnv,
            applied: None,
        }
    }

    /// Read `$env.` references from `env` instead of the process environment.
    pub fn with_env(mut self, env: &'a dyn Environment) -> Self {
        self.env = env;
        self
    }

    /// Append a record for every filter evaluated to `applied`.
    pub fn with_applied(mut self, applied: &'a mut Vec<AppliedFilter>) -> Self {
        self.applied = Some(applied);
        self
    }

    /// Evaluate a filter's criterion. `None` means the criterion is undefined.
    pub(crate) fn criterion(&self, source: &FilterSource) -> Option<Cow<'a, Value>> {
        match source {
            FilterSource::Env(name) => self.env_var(name).map(|v| Cow::Owned(Value::String(v))),
            FilterSource::Criteria(path) => reach(self.criteria, path).map(Cow::Borrowed),
        }
    }

    /// Read an environment reference.
    ///
    /// A dotted name reaches into a variable's string value, which has no
    /// members, so it is always undefined.
    pub(crate) fn env_var(&self, name: &str) -> Option<String> {
        if name.is_empty() || name.contains('.') {
            return None;
        }
        self.env.var(name)
    }

    pub(crate) fn record(&mut self, record: AppliedFilter) {
        tracing::trace!(
            filter = %record.filter,
            value_id = ?record.value_id,
            filter_id = ?record.filter_id,
            "Applied filter"
        );
        if let Some(applied) = self.applied.as_mut() {
            applied.push(record);
        }
    }
}

/// Follow a dotted path (`a.b.0`) into a JSON value.
///
/// Mappings are indexed by key and sequences by decimal index.
pub fn reach<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
