use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use log::{debug, info, warn};

use crate::{
    Config, ErrorKind, Inventory, LinkReport, Page, PageReport, Result, Summary, Verdict,
    checker::LinkChecker, extract::extract_page_links, filter::IgnoreUrls, policy::Policy,
};

/// Running totals of a [`Session`]
#[derive(Debug, Default)]
struct Counters {
    pages: AtomicUsize,
    checked: AtomicUsize,
    invalid: AtomicUsize,
    excluded: AtomicUsize,
    ignored: AtomicUsize,
}

impl Counters {
    fn record(&self, report: &PageReport) {
        self.pages.fetch_add(1, Ordering::Relaxed);
        self.checked.fetch_add(report.links.len(), Ordering::Relaxed);
        self.ignored.fetch_add(report.ignored.len(), Ordering::Relaxed);
        for link in &report.links {
            match link.verdict {
                Verdict::Invalid => self.invalid.fetch_add(1, Ordering::Relaxed),
                Verdict::Excluded => self.excluded.fetch_add(1, Ordering::Relaxed),
                Verdict::Healthy => 0,
            };
        }
    }

    fn summary(&self) -> Summary {
        Summary {
            pages: self.pages.load(Ordering::Relaxed),
            checked: self.checked.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            excluded: self.excluded.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
        }
    }
}

/// Verifies the links of one build.
///
/// A session is created from the frozen [`Inventory`] once all files of the
/// build are known. Pages are then handed in one by one, possibly from
/// concurrent tasks, and [`Session::finish`] is called after the last one.
///
/// ```no_run
/// # use proofer_lib::{Artifact, Config, InventoryBuilder, Page, Result, Session};
/// # async fn run() -> Result<()> {
/// let mut builder = InventoryBuilder::default();
/// builder.insert(Artifact::new("index.md", "index.html").with_source_text("# Home"));
///
/// let session = Session::new(Config::default(), builder.build())?;
/// let page = Page::new("index.md", r##"<h1 id="home">Home</h1><a href="#home">top</a>"##);
/// let report = session.check_page(&page).await?;
/// assert!(report.is_success());
///
/// println!("{}", session.finish()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    config: Config,
    ignore_urls: IgnoreUrls,
    checker: LinkChecker,
    policy: Policy,
    counters: Counters,
}

impl Session {
    /// Start verifying a build.
    ///
    /// # Errors
    ///
    /// Returns an error if an `ignore_urls` pattern is not a valid glob or
    /// the HTTP client cannot be created.
    pub fn new(config: Config, inventory: Inventory) -> Result<Self> {
        let ignore_urls = IgnoreUrls::new(&config.ignore_urls)?;
        let checker = LinkChecker::new(&config, Arc::new(inventory))?;
        let policy = Policy::new(&config);
        Ok(Self {
            config,
            ignore_urls,
            checker,
            policy,
            counters: Counters::default(),
        })
    }

    /// Check every distinct link on a rendered page.
    ///
    /// Broken links are logged as they are found. Depending on the
    /// configuration they also fail the build right away or once
    /// [`Session::finish`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidLink`] for the first reported broken link
    /// if `raise_error` is set.
    pub async fn check_page(&self, page: &Page) -> Result<PageReport> {
        let mut report = PageReport::new(page.source_path());
        if !self.config.enabled {
            return Ok(report);
        }

        let links = extract_page_links(page.html(self.config.validate_rendered_template));
        let mut urls: Vec<_> = links.urls.into_iter().collect();
        urls.sort_unstable();
        debug!(
            "Checking {} links on {}",
            urls.len(),
            page.source_path().display()
        );

        for url in urls {
            if self.ignore_urls.is_match(&url) {
                self.log_ignored(&url, page.source_path());
                report.ignored.push(url);
                continue;
            }

            let status = self.checker.status(&url, page, &links.ids).await;
            let verdict = self.policy.report(&url, status, page.source_path())?;
            report.links.push(LinkReport {
                url,
                status,
                verdict,
            });
        }

        self.counters.record(&report);
        Ok(report)
    }

    fn log_ignored(&self, url: &str, source_path: &Path) {
        if self.config.warn_on_ignored_urls {
            warn!("ignoring URL {url} from {}", source_path.display());
        }
    }

    /// Totals over all pages checked so far
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.counters.summary()
    }

    /// End the build.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidLinksPresent`] if broken links were
    /// reported and `raise_error_after_finish` is set.
    pub fn finish(&self) -> Result<Summary> {
        let summary = self.summary();
        debug!("{} external URLs cached", self.checker.cached_urls());
        if self.policy.has_deferred_failure() {
            return Err(ErrorKind::InvalidLinksPresent);
        }
        info!("{summary}");
        Ok(summary)
    }
}
