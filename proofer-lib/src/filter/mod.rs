//! URL filters applied before any checking.
//!
//! [`IgnoreUrls`] skips URLs the user does not want checked at all,
//! [`LocalHosts`] recognizes links to development servers, which are
//! never reachable during a build.

use glob::Pattern;

use crate::Result;

/// URLs matching any of these glob patterns are skipped
#[derive(Clone, Debug, Default)]
pub struct IgnoreUrls {
    patterns: Vec<Pattern>,
}

impl IgnoreUrls {
    /// Compile the given glob patterns
    ///
    /// # Errors
    ///
    /// Returns an error if one of the patterns is not a valid glob
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    #[inline]
    #[must_use]
    /// Whether `url` is ignored
    pub fn is_match(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(url))
    }

    #[inline]
    #[must_use]
    /// Whether there are no patterns at all
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Hosts of local development servers
#[derive(Clone, Debug, Default)]
pub struct LocalHosts {
    prefixes: Vec<String>,
}

impl LocalHosts {
    /// Create a filter for `http://` and `https://` URLs on the given hosts
    #[must_use]
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = hosts
            .into_iter()
            .flat_map(|host| {
                let host = host.as_ref();
                [format!("http://{host}"), format!("https://{host}")]
            })
            .collect();
        Self { prefixes }
    }

    /// Whether `url` points to one of the local hosts.
    ///
    /// The host must be followed by a port, a path, a query, a fragment or
    /// nothing at all, so `http://localhost.example.com` is not local.
    #[must_use]
    pub fn is_match(&self, url: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            url.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with([':', '/', '?', '#']))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::{DEFAULT_LOCAL_HOSTS, ErrorKind};

    #[rstest]
    #[case("https://example.com/private/page", true)]
    #[case("https://example.com/public/page", false)]
    #[case("https://api.internal/v1", true)]
    #[case("mailto:someone@example.com", true)]
    #[case("#anchor", false)]
    fn test_ignore_urls(#[case] url: &str, #[case] expected: bool) {
        let ignore = IgnoreUrls::new([
            "https://example.com/private/*",
            "https://*.internal/*",
            "mailto:*",
        ])
        .unwrap();
        assert_eq!(ignore.is_match(url), expected);
    }

    #[test]
    fn test_ignore_urls_invalid_pattern() {
        let result = IgnoreUrls::new(["https://[example.com"]);
        assert!(matches!(result, Err(ErrorKind::InvalidGlobPattern(_))));
    }

    #[test]
    fn test_ignore_urls_empty() {
        let ignore = IgnoreUrls::default();
        assert!(ignore.is_empty());
        assert!(!ignore.is_match("https://example.com"));
    }

    #[rstest]
    #[case("http://localhost", true)]
    #[case("http://localhost:8000/docs/", true)]
    #[case("https://127.0.0.1/", true)]
    #[case("http://app_server/health", true)]
    #[case("http://app_server?x=1", true)]
    #[case("http://localhost.example.com/", false)]
    #[case("ftp://localhost/", false)]
    #[case("https://example.com/?next=http://localhost", false)]
    fn test_local_hosts(#[case] url: &str, #[case] expected: bool) {
        let local = LocalHosts::new(DEFAULT_LOCAL_HOSTS);
        assert_eq!(local.is_match(url), expected);
    }
}
