//! Locations within the app.
//!
//! A [`Location`] is the part of a url the router cares about: the path, the decoded query pairs,
//! and the fragment. Locations are parsed from whatever the browser hands us, either a full url
//! like `http://localhost:8080/app/users?page=2` or a path relative to the app like `/users`.
//!
//! [`Location`]: struct.Location.html

use std::fmt;
use url::{Url, form_urlencoded};
use crate::error::Result;

// Relative hrefs are resolved against this. Only the path, query, and fragment are kept.
const ORIGIN: &str = "http://localhost/";

/// A path, query, and fragment.
///
/// The path and query are kept exactly as requested for [`full_path`], alongside a normalized
/// path for matching and the decoded query pairs for lookups.
///
/// [`full_path`]: struct.Location.html#method.full_path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    raw_path: String,
    raw_query: Option<String>,
    query: Vec<(String, String)>,
    hash: Option<String>,
}

impl Location {
    /// A location with the given path and no query or fragment.
    pub fn new(path: &str) -> Self {
        let path = normalize(path);
        Location {
            raw_path: path.clone(),
            path: path,
            raw_query: None,
            query: vec![],
            hash: None,
        }
    }

    /// Parse a full url or an app relative href.
    ///
    /// Dot segments are resolved and the query is decoded. The origin of a full url is dropped.
    pub fn parse(href: &str) -> Result<Self> {
        let url = Url::parse(ORIGIN)?.join(href)?;

        Ok(Location {
            path: normalize(url.path()),
            raw_path: url.path().to_owned(),
            raw_query: url.query()
                .filter(|q| !q.is_empty())
                .map(str::to_owned),
            query: url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            hash: url.fragment()
                .filter(|f| !f.is_empty())
                .map(str::to_owned),
        })
    }

    /// The same query and fragment on a different path.
    pub fn with_path(&self, path: &str) -> Self {
        let path = normalize(path);
        Location {
            raw_path: path.clone(),
            path: path,
            ..self.clone()
        }
    }

    /// Append a query pair.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        let pair = form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();

        self.raw_query = Some(match self.raw_query.take() {
            Some(query) => query + "&" + &pair,
            None => pair,
        });
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Set the fragment.
    pub fn with_hash(mut self, hash: &str) -> Self {
        self.hash = Some(hash.to_owned());
        self
    }

    /// The path, always starting with `/` and never ending with one (except for `/` itself).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The first value for the given query key.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All decoded query pairs in order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// The fragment, without the `#`.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_ref().map(String::as_str)
    }

    /// The path, query, and fragment as they were requested.
    pub fn full_path(&self) -> String {
        let mut full = self.raw_path.clone();

        if let Some(ref query) = self.raw_query {
            full.push('?');
            full.push_str(query);
        }

        if let Some(ref hash) = self.hash {
            full.push('#');
            full.push_str(hash);
        }

        full
    }

    /// Remove the app's base path from this location.
    ///
    /// Returns `None` if this location is outside of the base.
    pub fn strip_base(&self, base: &str) -> Option<Self> {
        let base = normalize_base(base);
        if base.is_empty() {
            return Some(self.clone());
        }

        let rest = self.raw_path.strip_prefix(base.as_str())?;
        if !rest.is_empty() && !rest.starts_with('/') {
            // "/app" is not a base of "/apple"
            return None;
        }

        let raw_path = if rest.is_empty() { "/" } else { rest };
        Some(Location {
            path: normalize(raw_path),
            raw_path: raw_path.to_owned(),
            ..self.clone()
        })
    }

    /// Prefix this location with the app's base path.
    pub fn with_base(&self, base: &str) -> Self {
        let base = normalize_base(base);
        let prefix = |path: &str| {
            if path == "/" && !base.is_empty() {
                base.clone()
            }
            else {
                base.clone() + path
            }
        };

        Location {
            path: prefix(&self.path),
            raw_path: prefix(&self.raw_path),
            ..self.clone()
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.full_path())
    }
}

/// Split a path into its non-empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Ensure a leading `/`, drop empty segments and any trailing `/`.
pub fn normalize(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in segments(path) {
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }

    normalized
}

// "/" and "" become "", "app/" becomes "/app".
fn normalize_base(base: &str) -> String {
    match normalize(base).as_str() {
        "/" => String::new(),
        b => b.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_relative() {
        let loc = Location::parse("/users/1/subscriptions?page=2#top").unwrap();
        assert_eq!(loc.path(), "/users/1/subscriptions");
        assert_eq!(loc.query("page"), Some("2"));
        assert_eq!(loc.hash(), Some("top"));
    }

    #[test]
    fn parse_full_url() {
        let loc = Location::parse("http://localhost:8080/users/?x=a+b").unwrap();
        assert_eq!(loc.path(), "/users");
        assert_eq!(loc.query("x"), Some("a b"));
        assert_eq!(loc.hash(), None);
    }

    #[test]
    fn parse_resolves_dot_segments() {
        let loc = Location::parse("/users/1/../2").unwrap();
        assert_eq!(loc.path(), "/users/2");
    }

    #[test]
    fn full_path_encodes_query() {
        let loc = Location::new("/login").with_query("redirect", "/users/1?tab=a&b");
        assert_eq!(loc.full_path(), "/login?redirect=%2Fusers%2F1%3Ftab%3Da%26b");

        let parsed = Location::parse(&loc.full_path()).unwrap();
        assert_eq!(parsed.query("redirect"), Some("/users/1?tab=a&b"));
    }

    #[test]
    fn full_path_without_query() {
        assert_eq!(Location::new("users//1/").full_path(), "/users/1");
        assert_eq!(Location::new("").full_path(), "/");
        assert_eq!(Location::new("/a").with_hash("h").to_string(), "/a#h");
    }

    #[test]
    fn full_path_is_kept_as_requested() {
        for href in &["/users?flag", "/users?q=a%20b", "/users/", "/users/1/?page=2&page=3#top"] {
            assert_eq!(Location::parse(href).unwrap().full_path(), *href);
        }

        let loc = Location::parse("/users/?q=a%20b").unwrap();
        assert_eq!(loc.path(), "/users");
        assert_eq!(loc.query("q"), Some("a b"));
        assert_eq!(Location::parse("/users?").unwrap().full_path(), "/users");
    }

    #[test]
    fn with_query_appends_to_raw_query() {
        let loc = Location::parse("/login?flag").unwrap().with_query("redirect", "/a b");
        assert_eq!(loc.full_path(), "/login?flag&redirect=%2Fa+b");
        assert_eq!(loc.query("redirect"), Some("/a b"));
    }

    #[test]
    fn strip_base() {
        let loc = Location::parse("/app/users?x=1").unwrap();
        assert_eq!(loc.strip_base("/app/").unwrap().full_path(), "/users?x=1");
        assert_eq!(loc.strip_base("/").unwrap(), loc);
        assert_eq!(Location::new("/app").strip_base("/app").unwrap().path(), "/");
        assert!(Location::new("/apple").strip_base("/app").is_none());

        let loc = Location::parse("/app/users/?q=a%20b").unwrap().strip_base("/app").unwrap();
        assert_eq!(loc.full_path(), "/users/?q=a%20b");
        assert_eq!(loc.with_base("/app").full_path(), "/app/users/?q=a%20b");
    }

    #[test]
    fn with_base() {
        assert_eq!(Location::new("/users").with_base("/app/").path(), "/app/users");
        assert_eq!(Location::new("/").with_base("/app").path(), "/app");
        assert_eq!(Location::new("/users").with_base("/").path(), "/users");
    }
}
