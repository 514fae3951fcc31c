use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{UrlStatus, Verdict};

/// The result of checking one URL found on a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LinkReport {
    /// The URL as it appeared in the rendered page
    pub url: String,
    /// The status it resolved to
    pub status: UrlStatus,
    /// Whether the status is reported
    pub verdict: Verdict,
}

impl Display for LinkReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.url, self.status)
    }
}

/// Everything checked on a single page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageReport {
    /// Source path of the page
    pub source_path: PathBuf,
    /// One entry per distinct URL which was checked
    pub links: Vec<LinkReport>,
    /// URLs skipped through `ignore_urls`
    pub ignored: Vec<String>,
}

impl PageReport {
    pub(crate) fn new(source_path: &Path) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            ..Self::default()
        }
    }

    /// Links which were reported as broken
    pub fn invalid(&self) -> impl Iterator<Item = &LinkReport> {
        self.links
            .iter()
            .filter(|link| link.verdict == Verdict::Invalid)
    }

    /// Returns `true` if no link on the page was reported
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.invalid().next().is_none()
    }
}

/// Totals over all pages of a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Pages scanned
    pub pages: usize,
    /// Distinct URLs checked, summed over all pages
    pub checked: usize,
    /// Broken links which were reported
    pub invalid: usize,
    /// Broken links excluded via `raise_error_excludes`
    pub excluded: usize,
    /// URLs skipped through `ignore_urls`
    pub ignored: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pages, {} links checked, {} invalid, {} excluded, {} ignored",
            self.pages, self.checked, self.invalid, self.excluded, self.ignored
        )
    }
}
