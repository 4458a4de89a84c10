//! Criteria-driven resolution of hierarchical configuration documents
//!
//! A document is authored once with conditional parts, and resolved at read
//! time against runtime criteria (environment, platform, A/B bucket, ...)
//! into a plain JSON value.
//!
//! - **Validation**: documents are checked against the directive rules and
//!   parsed into a [`Node`] tree before they are accepted
//! - **Filtering**: `$filter` nodes pick a branch, a `$range` entry or their
//!   `$default` based on a criterion; `$base` fills gaps in the pick
//! - **Expansion**: the picked tree is expanded into a criteria-free value,
//!   with `$env.NAME` strings read from the environment
//!
//! # Directives
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `$filter` | Criterion name: dotted criteria path or `$env.NAME` |
//! | `$range` | Ascending `{limit, value}` entries; first `limit >= criterion` wins |
//! | `$default` | Value when the criterion is undefined or nothing matched |
//! | `$base` | Merged under the picked branch or default |
//! | `$value` | Terminal value of the node |
//! | `$meta` | Caller annotation, read with [`Store::meta`] |
//! | `$id` | Filter identifier, reported in the applied-filter log |
//!
//! # Example
//!
//! ```
//! use confidence_core::Store;
//! use serde_json::json;
//!
//! let store = Store::from_document(&json!({
//!     "k": {
//!         "$filter": "n",
//!         "$range": [{ "limit": 1, "value": "a" }, { "limit": 10, "value": "b" }],
//!         "$default": "c"
//!     }
//! }))
//! .unwrap();
//!
//! assert_eq!(store.get("/k", &json!({ "n": 5 })), Some(json!("b")));
//! assert_eq!(store.get("/k", &json!({ "n": 100 })), Some(json!("c")));
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod key;
mod merge;
pub mod node;
pub mod scalar;
pub mod store;
pub mod validate;

pub use context::{AppliedFilter, Environment, ProcessEnv, Resolver};
pub use error::{Error, Reason, Result, ValidationError};
pub use node::Node;
pub use store::Store;
