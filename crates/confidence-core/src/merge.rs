//! `$base` defaulting
//!
//! A base is merged underneath the value a filter resolved to. Values set by
//! the resolved node always win; the base only contributes what is missing.

use std::borrow::Cow;

use crate::node::Node;

/// Merge `base` under `resolved` when both are mappings or both sequences.
///
/// Any other combination leaves `resolved` untouched.
pub(crate) fn apply_base<'n>(resolved: Option<Cow<'n, Node>>, base: Option<&Node>) -> Option<Cow<'n, Node>> {
    match (resolved, base) {
        (Some(node), Some(base)) if same_shape(base, &node) => Some(Cow::Owned(merge(base, &node))),
        (resolved, _) => resolved,
    }
}

fn same_shape(a: &Node, b: &Node) -> bool {
    matches!(
        (a, b),
        (Node::Object(_), Node::Object(_)) | (Node::Array(_), Node::Array(_))
    )
}

/// Deep merge two nodes with `over` taking precedence.
///
/// Mappings merge key by key (base keys first, then keys only `over` has),
/// sequences concatenate base elements before `over` elements. Anything else,
/// including directive nodes, is replaced by `over` as a whole.
pub(crate) fn merge(base: &Node, over: &Node) -> Node {
    match (base, over) {
        (Node::Object(base), Node::Object(over)) => {
            let mut merged = base.clone();
            for (key, value) in &over.entries {
                match merged.get_mut(key) {
                    Some(existing) if same_shape(existing, value) => *existing = merge(existing, value),
                    Some(existing) => *existing = value.clone(),
                    None => merged.entries.push((key.clone(), value.clone())),
                }
            }
            if over.meta.is_some() {
                merged.meta = over.meta.clone();
            }
            Node::Object(merged)
        }
        (Node::Array(base), Node::Array(over)) => Node::Array(base.iter().chain(over).cloned().collect()),
        (_, over) => over.clone(),
    }
}
