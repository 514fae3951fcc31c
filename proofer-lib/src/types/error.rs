use std::path::PathBuf;
use thiserror::Error;

use crate::UrlStatus;

/// Possible errors when verifying the links of a build with `proofer_lib`
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A link was found broken and the build is configured to stop on the
    /// first one (`raise_error`).
    #[error("invalid url - {url} [{status}] [{}]", source_path.display())]
    InvalidLink {
        /// The URL as it appeared in the rendered page
        url: String,
        /// The status the URL resolved to
        status: UrlStatus,
        /// Source path of the page which contains the link
        source_path: PathBuf,
    },
    /// At least one broken link was reported during the build and the build
    /// is configured to fail once all pages were scanned
    /// (`raise_error_after_finish`).
    #[error("Invalid links present.")]
    InvalidLinksPresent,
    /// The HTTP client for external URLs could not be created
    #[error("Failed to build the HTTP client: {0}")]
    BuildClient(#[source] reqwest::Error),
    /// The given header could not be parsed.
    #[error("Header could not be parsed.")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
    /// The given glob pattern is not valid
    #[error("UNIX glob pattern is invalid")]
    InvalidGlobPattern(#[from] glob::PatternError),
    /// An exclusion key is not an HTTP status code
    #[error("`{0}` is not a valid status code")]
    InvalidStatusCode(String),
    /// The configuration file could not be read
    #[error("Failed to read configuration file `{}`: {}", .0.display(), .1)]
    ReadConfig(PathBuf, #[source] std::io::Error),
    /// The configuration file is not valid TOML or contains unknown keys
    #[error("Failed to parse configuration file: {0}")]
    ParseConfig(#[from] toml::de::Error),
}

impl ErrorKind {
    /// Returns `true` if this error stops the build because of broken links,
    /// as opposed to a setup problem such as an invalid configuration.
    #[must_use]
    pub const fn is_invalid_link(&self) -> bool {
        matches!(self, Self::InvalidLink { .. } | Self::InvalidLinksPresent)
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvalidLink {
                    url: u1,
                    status: s1,
                    source_path: p1,
                },
                Self::InvalidLink {
                    url: u2,
                    status: s2,
                    source_path: p2,
                },
            ) => u1 == u2 && s1 == s2 && p1 == p2,
            (Self::BuildClient(e1), Self::BuildClient(e2)) => e1.to_string() == e2.to_string(),
            (Self::InvalidGlobPattern(e1), Self::InvalidGlobPattern(e2)) => {
                e1.msg == e2.msg && e1.pos == e2.pos
            }
            (Self::InvalidStatusCode(c1), Self::InvalidStatusCode(c2)) => c1 == c2,
            (Self::ReadConfig(p1, e1), Self::ReadConfig(p2, e2)) => {
                p1 == p2 && e1.kind() == e2.kind()
            }
            (Self::ParseConfig(e1), Self::ParseConfig(e2)) => e1.to_string() == e2.to_string(),
            (Self::InvalidLinksPresent, Self::InvalidLinksPresent)
            | (Self::InvalidHeader(_), Self::InvalidHeader(_)) => true,
            _ => false,
        }
    }
}

impl Eq for ErrorKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_link_message() {
        let error = ErrorKind::InvalidLink {
            url: "https://example.com".to_string(),
            status: UrlStatus::new(500),
            source_path: PathBuf::from("docs/index.md"),
        };
        assert_eq!(
            error.to_string(),
            "invalid url - https://example.com [500] [docs/index.md]"
        );
        assert!(error.is_invalid_link());
        assert!(ErrorKind::InvalidLinksPresent.is_invalid_link());
        assert!(!ErrorKind::InvalidStatusCode("abc".into()).is_invalid_link());
    }

    #[test]
    fn test_read_config_message() {
        let error = ErrorKind::ReadConfig(
            PathBuf::from("proofer.toml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(
            error.to_string(),
            "Failed to read configuration file `proofer.toml`: not found"
        );
        assert!(!error.is_invalid_link());
    }
}
