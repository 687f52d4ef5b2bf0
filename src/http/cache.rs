//! Conditional request support for static assets
//!
//! Weak `ETag`s derived from the asset bytes, and `If-None-Match` checks.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Weak `ETag` of the form `W/"<len>-<hash>"`
pub fn weak_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("W/\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Whether an `If-None-Match` header value matches the asset `ETag`
///
/// Comparison is weak: a `W/` prefix on either side is ignored. Lists and the
/// `*` wildcard are accepted.
pub fn is_not_modified(if_none_match: Option<&str>, etag: &str) -> bool {
    let opaque = |tag: &str| tag.trim().trim_start_matches("W/").to_string();
    let ours = opaque(etag);

    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .any(|candidate| candidate.trim() == "*" || opaque(candidate) == ours)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_etag_shape() {
        let etag = weak_etag(b"body { color: red }");
        assert!(etag.starts_with("W/\"13-"));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, weak_etag(b"body { color: red }"));
        assert_ne!(etag, weak_etag(b"body { color: blue }"));
    }

    #[test]
    fn test_is_not_modified() {
        let etag = weak_etag(b"asset");
        let strong = etag.trim_start_matches("W/").to_string();

        assert!(is_not_modified(Some(&etag), &etag));
        assert!(is_not_modified(Some(&strong), &etag));
        assert!(is_not_modified(Some(&format!("\"other\", {etag}")), &etag));
        assert!(is_not_modified(Some("*"), &etag));
        assert!(!is_not_modified(Some("\"other\""), &etag));
        assert!(!is_not_modified(None, &etag));
    }
}
