//! Path matching for gate scoping and route exclusions.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No regex: prefix checks and set lookups only
//! - Query strings never take part in matching

use axum::body::Body;
use axum::http::Request;
use std::collections::HashSet;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches a path prefix on segment boundaries.
///
/// `/api` matches `/api` and `/api/anything`, but not `/apis`.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing `/` is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }

    pub fn matches_path(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matches_path(req.uri().path())
    }
}

/// Matches any of a fixed set of paths exactly.
#[derive(Debug, Clone, Default)]
pub struct ExactPathMatcher {
    paths: HashSet<String>,
}

impl ExactPathMatcher {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.paths.contains(req.uri().path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::default()).unwrap()
    }

    #[test]
    fn test_path_prefix_matcher() {
        let matcher = PathPrefixMatcher::new("/api");

        assert!(matcher.matches(&req("http://example.com/api/v1")));
        assert!(matcher.matches(&req("/api")));
        assert!(matcher.matches(&req("/api/")));
        assert!(!matcher.matches(&req("/apis")));
        assert!(!matcher.matches(&req("/images")));
        assert!(!matcher.matches(&req("/")));
    }

    #[test]
    fn test_trailing_slash_prefix_normalized() {
        let matcher = PathPrefixMatcher::new("/api/");
        assert!(matcher.matches(&req("/api")));
        assert!(matcher.matches(&req("/api/foo")));

        let root = PathPrefixMatcher::new("/");
        assert!(root.matches(&req("/anything")));
    }

    #[test]
    fn test_exact_path_matcher() {
        let matcher = ExactPathMatcher::new(["/api/get-nonce", "/api/tasks/list"]);

        assert!(matcher.matches(&req("/api/get-nonce")));
        assert!(matcher.matches(&req("/api/get-nonce?wallet=0xabc")));
        assert!(matcher.matches(&req("/api/tasks/list")));
        assert!(!matcher.matches(&req("/api/tasks")));
        assert!(!matcher.matches(&req("/api/get-nonce/")));
        assert!(!matcher.matches(&req("/API/get-nonce")));
    }
}
