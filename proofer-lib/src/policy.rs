//! Decides what happens to a checked URL: whether its status is a broken
//! link, whether that link is excluded, and whether the build fails now,
//! later or not at all.

use std::{
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use log::{error, warn};

use crate::{Config, ErrorKind, RaiseErrorExcludes, Result, StatusPolicy, UrlStatus, Verdict};

/// When a reported broken link fails the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaiseMode {
    /// Abort on the first broken link
    Immediately,
    /// Report all broken links and fail once the build is finished
    AfterFinish,
    /// Report broken links but never fail
    #[default]
    Warn,
}

impl From<&Config> for RaiseMode {
    fn from(config: &Config) -> Self {
        if config.raise_error {
            Self::Immediately
        } else if config.raise_error_after_finish {
            Self::AfterFinish
        } else {
            Self::Warn
        }
    }
}

#[derive(Debug)]
pub(crate) struct Policy {
    status_policy: StatusPolicy,
    excludes: RaiseErrorExcludes,
    mode: RaiseMode,
    /// Set once a broken link was reported in [`RaiseMode::AfterFinish`]
    invalid_links: AtomicBool,
}

impl Policy {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            status_policy: StatusPolicy::new(config.transient_status_codes.iter().copied()),
            excludes: config.raise_error_excludes.clone(),
            mode: RaiseMode::from(config),
            invalid_links: AtomicBool::new(false),
        }
    }

    pub(crate) fn judge(&self, url: &str, status: UrlStatus) -> Verdict {
        if !self.status_policy.is_bad(status) {
            Verdict::Healthy
        } else if self.excludes.is_excluded(url, status) {
            Verdict::Excluded
        } else {
            Verdict::Invalid
        }
    }

    /// Judge `url` and report it if it is a broken link.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidLink`] for a reported broken link in
    /// [`RaiseMode::Immediately`].
    pub(crate) fn report(&self, url: &str, status: UrlStatus, source_path: &Path) -> Result<Verdict> {
        let verdict = self.judge(url, status);
        if verdict != Verdict::Invalid {
            return Ok(verdict);
        }

        let invalid = ErrorKind::InvalidLink {
            url: url.to_string(),
            status,
            source_path: source_path.to_path_buf(),
        };
        match self.mode {
            RaiseMode::Immediately => return Err(invalid),
            RaiseMode::AfterFinish => {
                error!("{invalid}");
                self.invalid_links.store(true, Ordering::Relaxed);
            }
            RaiseMode::Warn => warn!("{invalid}"),
        }
        Ok(verdict)
    }

    /// Whether the build has to fail now that all pages were scanned.
    pub(crate) fn has_deferred_failure(&self) -> bool {
        self.mode == RaiseMode::AfterFinish && self.invalid_links.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use rstest::rstest;

    fn policy(config: &Config) -> Policy {
        Policy::new(config)
    }

    #[rstest]
    #[case(-1, Verdict::Invalid)]
    #[case(0, Verdict::Healthy)]
    #[case(200, Verdict::Healthy)]
    #[case(301, Verdict::Healthy)]
    #[case(401, Verdict::Healthy)]
    #[case(403, Verdict::Healthy)]
    #[case(404, Verdict::Invalid)]
    #[case(500, Verdict::Invalid)]
    #[case(503, Verdict::Healthy)]
    #[case(504, Verdict::Healthy)]
    #[case(999, Verdict::Healthy)]
    fn test_judge(#[case] code: i32, #[case] expected: Verdict) {
        let policy = policy(&Config::default());
        assert_eq!(policy.judge("https://example.com", UrlStatus::new(code)), expected);
    }

    #[test]
    fn test_judge_with_custom_transient_codes() {
        let config = Config::builder().transient_status_codes(vec![503]).build();
        let policy = policy(&config);
        assert_eq!(policy.judge("https://example.com", UrlStatus::new(503)), Verdict::Healthy);
        assert_eq!(policy.judge("https://example.com", UrlStatus::new(504)), Verdict::Invalid);
        assert_eq!(policy.judge("https://example.com", UrlStatus::new(403)), Verdict::Invalid);
    }

    #[test]
    fn test_judge_with_excludes() {
        let mut excludes = RaiseErrorExcludes::new();
        excludes.add(404, ["*"]);
        excludes.add(500, ["https://flaky.example.com/*"]);
        let config = Config::builder().raise_error_excludes(excludes).build();
        let policy = policy(&config);

        assert_eq!(policy.judge("missing.html", UrlStatus::NOT_FOUND), Verdict::Excluded);
        assert_eq!(
            policy.judge("https://flaky.example.com/api", UrlStatus::new(500)),
            Verdict::Excluded
        );
        assert_eq!(
            policy.judge("https://example.com/api", UrlStatus::new(500)),
            Verdict::Invalid
        );
        // Network failures are never covered by other status codes
        assert_eq!(
            policy.judge("https://flaky.example.com/api", UrlStatus::NETWORK_FAILURE),
            Verdict::Invalid
        );
    }

    #[test]
    fn test_raise_immediately() {
        let config = Config::builder().raise_error(true).build();
        let policy = policy(&config);
        let err = policy
            .report("missing.html", UrlStatus::NOT_FOUND, Path::new("index.md"))
            .unwrap_err();
        assert_eq!(
            err,
            ErrorKind::InvalidLink {
                url: "missing.html".to_string(),
                status: UrlStatus::NOT_FOUND,
                source_path: PathBuf::from("index.md"),
            }
        );
        assert_eq!(err.to_string(), "invalid url - missing.html [404] [index.md]");
        assert!(!policy.has_deferred_failure());
    }

    #[test]
    fn test_raise_after_finish() {
        let config = Config::builder().raise_error_after_finish(true).build();
        let policy = policy(&config);
        let source = Path::new("index.md");

        assert_eq!(
            policy.report("#ok", UrlStatus::HEALTHY, source),
            Ok(Verdict::Healthy)
        );
        assert!(!policy.has_deferred_failure());

        assert_eq!(
            policy.report("missing.html", UrlStatus::NOT_FOUND, source),
            Ok(Verdict::Invalid)
        );
        assert_eq!(
            policy.report("other.html", UrlStatus::NOT_FOUND, source),
            Ok(Verdict::Invalid)
        );
        assert!(policy.has_deferred_failure());
    }

    #[test]
    fn test_excluded_links_never_raise() {
        let mut excludes = RaiseErrorExcludes::new();
        excludes.add(404, ["missing.html"]);
        let config = Config::builder()
            .raise_error(true)
            .raise_error_excludes(excludes)
            .build();
        let policy = policy(&config);
        assert_eq!(
            policy.report("missing.html", UrlStatus::NOT_FOUND, Path::new("index.md")),
            Ok(Verdict::Excluded)
        );
    }

    #[test]
    fn test_warn_only() {
        let policy = policy(&Config::default());
        assert_eq!(
            policy.report("missing.html", UrlStatus::NOT_FOUND, Path::new("index.md")),
            Ok(Verdict::Invalid)
        );
        assert!(!policy.has_deferred_failure());
    }

    #[rstest]
    #[case(false, false, RaiseMode::Warn)]
    #[case(true, false, RaiseMode::Immediately)]
    #[case(false, true, RaiseMode::AfterFinish)]
    #[case(true, true, RaiseMode::Immediately)]
    fn test_raise_mode(#[case] raise_error: bool, #[case] after_finish: bool, #[case] expected: RaiseMode) {
        let config = Config::builder()
            .raise_error(raise_error)
            .raise_error_after_finish(after_finish)
            .build();
        assert_eq!(RaiseMode::from(&config), expected);
    }
}
