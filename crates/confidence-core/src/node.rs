//! Parsed document tree
//!
//! A validated document is held as a [`Node`] tree. Directive keys (`$filter`,
//! `$range`, `$value`, ...) are interpreted once during validation, so
//! resolution matches on the node kind instead of inspecting keys.

use serde_json::Value;

/// Prefix marking a string (or a filter name) as an environment lookup.
pub const ENV_PREFIX: &str = "$env.";

/// A node of a validated document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Scalar (string, number, boolean or null) that resolves to itself
    Literal(Value),

    /// `$env.NAME` string, replaced by the variable's value on expansion
    Env(String),

    /// Mapping without `$filter` or `$value`
    Object(ObjectNode),

    /// Ordered sequence
    Array(Vec<Node>),

    /// `$value` node
    Value(ValueNode),

    /// `$filter` node
    Filter(FilterNode),
}

/// Plain mapping. Entries keep document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    pub entries: Vec<(String, Node)>,

    /// Caller annotation from `$meta`
    pub meta: Option<Value>,
}

/// Node whose effective value is the evaluated `$value`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub value: Box<Node>,
    pub base: Option<Box<Node>>,
    pub meta: Option<Value>,
}

/// Node that selects a value by evaluating a criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    /// Filter name as written in the document, used in the applied-filter log
    pub name: String,
    pub source: FilterSource,

    /// Identifier from `$id`
    pub id: Option<String>,
    pub selector: Selector,
    pub default: Option<Box<Node>>,
    pub base: Option<Box<Node>>,
}

/// Where a filter reads its criterion from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSource {
    /// Dotted path into the criteria mapping
    Criteria(String),

    /// Environment variable name
    Env(String),
}

/// How a filter node picks a value for a defined criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Branch keyed by the stringified criterion
    Branches(Vec<(String, Node)>),

    /// First entry whose limit is at least the criterion
    Range(Vec<RangeEntry>),
}

/// One `{limit, value}` entry of a `$range`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeEntry {
    pub limit: f64,
    pub value: Node,

    /// Optional `id` of the entry, reported in the applied-filter log
    pub id: Option<String>,
}

impl Node {
    /// Empty mapping, the document of a freshly created store.
    pub fn empty() -> Self {
        Node::Object(ObjectNode::default())
    }

    /// Child addressed by one key path segment.
    ///
    /// Mappings are indexed by key, sequences by decimal index. Every other
    /// node kind has no children.
    pub fn child(&self, segment: &str) -> Option<&Node> {
        match self {
            Node::Object(object) => object.get(segment),
            Node::Array(items) => segment
                .parse::<usize>()
                .ok()
                .filter(|index| index.to_string() == segment)
                .and_then(|index| items.get(index)),
            _ => None,
        }
    }

    /// The `$meta` annotation carried by this node, if any.
    pub fn meta(&self) -> Option<&Value> {
        match self {
            Node::Object(object) => object.meta.as_ref(),
            Node::Value(value) => value.meta.as_ref(),
            _ => None,
        }
    }
}

impl ObjectNode {
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}
