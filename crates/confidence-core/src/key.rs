//! Lookup key parsing
//!
//! Keys are `/` for the root or a sequence of `/segment` parts, each segment
//! made of ASCII letters, digits and underscores.

/// Split a key into its path segments.
///
/// Returns `None` for a malformed key. The root (`/` or an empty key) has no
/// segments.
pub fn segments(key: &str) -> Option<Vec<&str>> {
    if key == "/" {
        return Some(Vec::new());
    }

    let mut segments = Vec::new();
    let mut rest = key;
    while !rest.is_empty() {
        let tail = rest.strip_prefix('/')?;
        let end = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        if end == 0 {
            return None;
        }
        segments.push(&tail[..end]);
        rest = &tail[end..];
    }
    Some(segments)
}
