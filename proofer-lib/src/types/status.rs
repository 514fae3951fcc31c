use std::{collections::HashSet, fmt::Display};

use serde::Serialize;

/// Status codes which are inconclusive rather than broken by default.
///
/// `401`/`403` are returned by sites that block automated clients, `503`
/// and `504` are usually transient and `999` is what some sites (e.g.
/// LinkedIn) answer when they think you're crawling them.
pub const DEFAULT_TRANSIENT_STATUS_CODES: [i32; 5] = [401, 403, 503, 504, 999];

/// Outcome of checking a single URL.
///
/// `0` means the link resolved, `-1` a network failure (timeout after
/// redirects, redirect loop, refused connection). Everything else is the
/// HTTP status code received, or a synthetic `404` for local references that
/// point nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UrlStatus(i32);

impl UrlStatus {
    /// The link resolved
    pub const HEALTHY: Self = Self(0);
    /// The remote end could not be reached at all
    pub const NETWORK_FAILURE: Self = Self(-1);
    /// A local file, a same-page anchor or a cross-file anchor is missing
    pub const NOT_FOUND: Self = Self(404);
    /// The request did not finish within the configured timeout
    pub const TIMEOUT: Self = Self(504);

    /// Create a status from a raw code
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// Return the raw status code
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    /// Returns `true` if the link resolved without consulting any policy
    pub const fn is_healthy(self) -> bool {
        self.0 == 0
    }
}

impl Display for UrlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for UrlStatus {
    fn from(code: u16) -> Self {
        Self(i32::from(code))
    }
}

impl From<i32> for UrlStatus {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl From<bool> for UrlStatus {
    /// Local lookups only know whether they resolved.
    fn from(resolved: bool) -> Self {
        if resolved {
            Self::HEALTHY
        } else {
            Self::NOT_FOUND
        }
    }
}

impl From<reqwest::StatusCode> for UrlStatus {
    fn from(code: reqwest::StatusCode) -> Self {
        Self::from(code.as_u16())
    }
}

impl From<&reqwest::Error> for UrlStatus {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::TIMEOUT
        } else {
            // Redirect loops, refused connections, DNS and TLS failures
            Self::NETWORK_FAILURE
        }
    }
}

impl PartialEq<i32> for UrlStatus {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

/// Decides which statuses are broken links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPolicy {
    transient: HashSet<i32>,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSIENT_STATUS_CODES)
    }
}

impl StatusPolicy {
    /// Create a policy which tolerates the given status codes
    #[must_use]
    pub fn new<I: IntoIterator<Item = i32>>(transient: I) -> Self {
        Self {
            transient: transient.into_iter().collect(),
        }
    }

    /// Returns `true` if `status` is a broken link.
    ///
    /// Network failures are always bad. Transient codes are tolerated since
    /// they cannot be verified reliably. Any other code `>= 400` is bad.
    #[must_use]
    pub fn is_bad(&self, status: UrlStatus) -> bool {
        match status.code() {
            -1 => true,
            code if self.transient.contains(&code) => false,
            code => code >= 400,
        }
    }
}

/// What became of a URL once the status policy and the exclusions were applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The link resolved or its status is tolerated
    Healthy,
    /// The link is broken but excluded via `raise_error_excludes`
    Excluded,
    /// The link is broken and gets reported
    Invalid,
}
