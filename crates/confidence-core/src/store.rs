//! The document store
//!
//! A `Store` holds one validated document and answers lookups against it.
//! Loading replaces the document wholesale; lookups never modify it.

use std::borrow::Cow;

use serde_json::Value;

use crate::context::Resolver;
use crate::error::{Result, ValidationError};
use crate::key;
use crate::node::Node;
use crate::validate;

/// A validated configuration document, resolvable against criteria.
///
/// # Example
///
/// ```
/// use confidence_core::Store;
/// use serde_json::json;
///
/// let store = Store::from_document(&json!({
///     "key": { "$filter": "env", "production": { "$value": "P" }, "$default": "D" }
/// }))
/// .unwrap();
///
/// assert_eq!(store.get("/key", &json!({ "env": "production" })), Some(json!("P")));
/// assert_eq!(store.get("/key", &json!({})), Some(json!("D")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    tree: Node,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create a store holding an empty document.
    pub fn new() -> Self {
        Self { tree: Node::empty() }
    }

    /// Create a store from `document`, failing if it does not validate.
    pub fn from_document(document: &Value) -> Result<Self> {
        let mut store = Self::new();
        store.load(document)?;
        Ok(store)
    }

    /// Validate `document` and make it the current document.
    ///
    /// On failure the previously loaded document stays in place.
    pub fn load(&mut self, document: &Value) -> Result<()> {
        match validate::parse(document) {
            Ok(tree) => {
                tracing::debug!("Document loaded");
                self.tree = tree;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(path = %err.path, reason = %err.reason, "Document rejected");
                Err(err.into())
            }
        }
    }

    /// Check `document` without loading it.
    pub fn validate(document: &Value) -> std::result::Result<(), ValidationError> {
        validate::validate(document)
    }

    /// The parsed document.
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// Resolve `key` against `criteria` and the process environment.
    ///
    /// Returns `None` when the key is malformed or resolves to nothing.
    pub fn get(&self, key: &str, criteria: &Value) -> Option<Value> {
        self.resolve(key, &mut Resolver::new(criteria))
    }

    /// Resolve `key` with an explicit resolution context.
    pub fn resolve(&self, key: &str, resolver: &mut Resolver<'_>) -> Option<Value> {
        tracing::trace!(key, "Resolving key");
        let node = self.locate(key, resolver)?;
        resolver.walk(&node)
    }

    /// The `$meta` annotation of the node `key` resolves to.
    pub fn meta(&self, key: &str, criteria: &Value) -> Option<Value> {
        self.resolve_meta(key, &mut Resolver::new(criteria))
    }

    /// [`Store::meta`] with an explicit resolution context.
    ///
    /// The addressed node is filtered like in [`Store::resolve`] but not
    /// expanded. A `$value` node reports its own `$meta`, including one
    /// picked as a filter branch, range entry or `$default`.
    pub fn resolve_meta(&self, key: &str, resolver: &mut Resolver<'_>) -> Option<Value> {
        let Some(segments) = key::segments(key) else {
            tracing::debug!(key, "Malformed key");
            return None;
        };

        let Some((last, parents)) = segments.split_last() else {
            return meta_of(&self.tree, resolver);
        };

        let mut node = resolver.filter(&self.tree)?;
        for segment in parents {
            node = descend(node, segment, resolver)?;
        }
        meta_of(node.child(last)?, resolver)
    }

    /// Walk the key path, filtering the root and every node along the way.
    fn locate<'n>(&'n self, key: &str, resolver: &mut Resolver<'_>) -> Option<Cow<'n, Node>> {
        let Some(segments) = key::segments(key) else {
            tracing::debug!(key, "Malformed key");
            return None;
        };

        let mut node = resolver.filter(&self.tree)?;
        for segment in segments {
            node = descend(node, segment, resolver)?;
        }
        Some(node)
    }
}

fn descend<'n>(node: Cow<'n, Node>, segment: &str, resolver: &mut Resolver<'_>) -> Option<Cow<'n, Node>> {
    match node {
        Cow::Borrowed(node) => resolver.filter(node.child(segment)?),
        Cow::Owned(node) => {
            let child = resolver.filter(node.child(segment)?)?;
            Some(Cow::Owned(child.into_owned()))
        }
    }
}

/// A `$value` node reports its own `$meta`, whether the key names it or a
/// filter picked it.
fn meta_of(node: &Node, resolver: &mut Resolver<'_>) -> Option<Value> {
    match node {
        Node::Value(value) => value.meta.clone(),
        Node::Filter(filter) => {
            let choice = resolver.choose(filter)?;
            match choice.node {
                Node::Value(_) => meta_of(choice.node, resolver),
                Node::Filter(_) if choice.base.is_none() => meta_of(choice.node, resolver),
                _ => resolver.settle(choice)?.meta().cloned(),
            }
        }
        other => other.meta().cloned(),
    }
}
