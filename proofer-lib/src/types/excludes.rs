use std::collections::HashMap;

use glob::Pattern;
use serde::{Deserialize, Deserializer};

use crate::{ErrorKind, Result, UrlStatus};

/// Matches every URL at a given status.
const WILDCARD: &str = "*";

/// Broken links which must never fail the build, keyed by status code.
///
/// Each status maps to a list of URLs or glob patterns. The pattern `*`
/// excludes every URL at that status.
#[derive(Clone, Debug, Default)]
pub struct RaiseErrorExcludes {
    patterns: HashMap<i32, Vec<ExcludePattern>>,
}

#[derive(Clone, Debug)]
struct ExcludePattern {
    raw: String,
    glob: Option<Pattern>,
}

impl ExcludePattern {
    /// URLs which are not valid globs, like `?ids[]=1`, still match
    /// themselves literally
    fn new(raw: String) -> Self {
        let glob = if raw == WILDCARD {
            None
        } else {
            Pattern::new(&raw).ok()
        };
        Self { raw, glob }
    }

    fn matches(&self, url: &str) -> bool {
        self.raw == WILDCARD
            || self.raw == url
            || self.glob.as_ref().is_some_and(|glob| glob.matches(url))
    }
}

impl RaiseErrorExcludes {
    /// Creates an empty set of exclusions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude the given URLs or glob patterns at `status`.
    pub fn add<I, S>(&mut self, status: i32, patterns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns
            .entry(status)
            .or_default()
            .extend(patterns.into_iter().map(|raw| ExcludePattern::new(raw.into())));
        self
    }

    /// Returns `true` if a broken `url` at `status` must not be reported
    #[must_use]
    pub fn is_excluded(&self, url: &str, status: UrlStatus) -> bool {
        self.patterns
            .get(&status.code())
            .is_some_and(|patterns| patterns.iter().any(|p| p.matches(url)))
    }

    /// Whether no exclusions were configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.values().all(Vec::is_empty)
    }
}

impl TryFrom<HashMap<String, Vec<String>>> for RaiseErrorExcludes {
    type Error = ErrorKind;

    fn try_from(raw: HashMap<String, Vec<String>>) -> Result<Self> {
        let mut excludes = Self::new();
        for (status, patterns) in raw {
            let code = status
                .trim()
                .parse::<i32>()
                .map_err(|_| ErrorKind::InvalidStatusCode(status.clone()))?;
            excludes.add(code, patterns);
        }
        Ok(excludes)
    }
}

impl<'de> Deserialize<'de> for RaiseErrorExcludes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // TOML table keys are always strings, so `404 = [...]` arrives as "404"
        let raw = HashMap::<String, Vec<String>>::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}
