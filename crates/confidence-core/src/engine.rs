//! Filter evaluation and tree expansion
//!
//! `filter` resolves a single node: it follows `$value` and `$filter`
//! directives until it reaches a plain node. `walk` expands a plain node into
//! a JSON value, filtering each child before descending into it.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::context::{AppliedFilter, Resolver};
use crate::merge::apply_base;
use crate::node::{ENV_PREFIX, FilterNode, Node, RangeEntry, Selector};
use crate::scalar;

/// Value id logged when a filter falls back to `$default`.
pub const DEFAULT_VALUE_ID: &str = "$default";

/// Value id logged for a matched container that carries no id of its own.
pub const OBJECT_VALUE_ID: &str = "[object]";

/// The entry a filter picked, with the `$base` that applies to it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Choice<'n> {
    pub node: &'n Node,
    pub base: Option<&'n Node>,
}

impl Resolver<'_> {
    /// Apply filters to `node` until a plain node (or nothing) remains.
    pub(crate) fn filter<'n>(&mut self, node: &'n Node) -> Option<Cow<'n, Node>> {
        match node {
            Node::Value(value) => {
                let resolved = self.filter(&value.value);
                apply_base(resolved, value.base.as_deref())
            }
            Node::Filter(filter) => self.select(filter),
            plain => Some(Cow::Borrowed(plain)),
        }
    }

    fn select<'n>(&mut self, node: &'n FilterNode) -> Option<Cow<'n, Node>> {
        let choice = self.choose(node)?;
        self.settle(choice)
    }

    /// Evaluate a filter's criterion and log which entry it picked.
    ///
    /// The picked node is returned as authored, before any filtering.
    pub(crate) fn choose<'n>(&mut self, node: &'n FilterNode) -> Option<Choice<'n>> {
        if let Some(criterion) = self.criterion(&node.source) {
            match &node.selector {
                Selector::Range(entries) => {
                    let matched = scalar::to_number(&criterion)
                        .and_then(|n| entries.iter().find(|entry| n <= entry.limit));
                    if let Some(entry) = matched {
                        self.log(node, Some(range_value_id(entry)));
                        // Range matches do not take `$base`
                        return Some(Choice {
                            node: &entry.value,
                            base: None,
                        });
                    }
                }
                Selector::Branches(branches) => {
                    let key = scalar::to_key(&criterion);
                    if let Some((_, branch)) = branches.iter().find(|(name, _)| *name == key) {
                        self.log(node, Some(criterion_value_id(&criterion)));
                        return Some(Choice {
                            node: branch,
                            base: node.base.as_deref(),
                        });
                    }
                }
            }
        }

        if let Some(default) = node.default.as_deref() {
            self.log(node, Some(DEFAULT_VALUE_ID.to_string()));
            return Some(Choice {
                node: default,
                base: node.base.as_deref(),
            });
        }

        self.log(node, None);
        None
    }

    /// Filter a picked node and merge its base underneath.
    pub(crate) fn settle<'n>(&mut self, choice: Choice<'n>) -> Option<Cow<'n, Node>> {
        let resolved = self.filter(choice.node);
        apply_base(resolved, choice.base)
    }

    fn log(&mut self, node: &FilterNode, value_id: Option<String>) {
        let mut record = AppliedFilter::new(&node.name);
        record.value_id = value_id;
        record.filter_id = node.id.clone();
        self.record(record);
    }

    /// Expand a node into a criteria-free JSON value.
    ///
    /// Children that resolve to nothing are left out of the output.
    pub(crate) fn walk(&mut self, node: &Node) -> Option<Value> {
        match node {
            Node::Literal(value) => Some(value.clone()),
            Node::Env(name) => self.env_var(name).map(Value::String),
            Node::Object(object) => {
                let mut map = Map::with_capacity(object.entries.len());
                for (key, child) in &object.entries {
                    if let Some(value) = self.expand(child) {
                        map.insert(key.clone(), value);
                    }
                }
                Some(Value::Object(map))
            }
            Node::Array(items) => {
                let values = items.iter().filter_map(|item| self.expand(item)).collect();
                Some(Value::Array(values))
            }
            Node::Value(_) | Node::Filter(_) => self.expand(node),
        }
    }

    fn expand(&mut self, node: &Node) -> Option<Value> {
        let resolved = self.filter(node)?;
        self.walk(&resolved)
    }
}

/// Value id for a branch match: the criterion itself, or for a mapping
/// criterion its `id` field.
fn criterion_value_id(criterion: &Value) -> String {
    match criterion {
        Value::Object(map) => map
            .get("id")
            .filter(|id| scalar::is_truthy(id))
            .map(scalar::to_key)
            .unwrap_or_else(|| OBJECT_VALUE_ID.to_string()),
        other => scalar::to_key(other),
    }
}

/// Value id for a range match: the entry's `id`, else the entry's value when
/// it is a scalar.
fn range_value_id(entry: &RangeEntry) -> String {
    if let Some(id) = &entry.id {
        return id.clone();
    }
    match &entry.value {
        Node::Literal(Value::Null) => OBJECT_VALUE_ID.to_string(),
        Node::Literal(value) => scalar::to_key(value),
        Node::Env(name) => format!("{ENV_PREFIX}{name}"),
        _ => OBJECT_VALUE_ID.to_string(),
    }
}
