//! Checker Module
//!
//! This module contains all checkers, which are responsible for finding the
//! status of a URL, and the [`LinkChecker`] which picks the right one.

pub(crate) mod file;
pub(crate) mod website;

use std::{collections::HashSet, sync::Arc};

use log::info;
use url::Url;

use crate::{Config, Inventory, Page, Result, UrlStatus, filter::LocalHosts};
use file::FileChecker;
use website::WebsiteChecker;

/// Scheme of an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scheme {
    Http,
    Https,
    /// Any scheme we cannot check, like `mailto:` or `ftp:`
    Unsupported(String),
}

impl From<&Url> for Scheme {
    fn from(url: &Url) -> Self {
        match url.scheme() {
            "http" => Self::Http,
            "https" => Self::Https,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

/// Classifies URLs found on a page and returns their status.
#[derive(Debug)]
pub(crate) struct LinkChecker {
    local_hosts: LocalHosts,
    validate_external_urls: bool,
    website: WebsiteChecker,
    file: FileChecker,
}

impl LinkChecker {
    pub(crate) fn new(config: &Config, inventory: Arc<Inventory>) -> Result<Self> {
        Ok(Self {
            local_hosts: LocalHosts::new(&config.local_hosts),
            validate_external_urls: config.validate_external_urls,
            website: WebsiteChecker::new(
                config.timeout,
                config.max_redirects,
                config.max_cache_size,
                config.drain_response_body,
            )?,
            file: FileChecker::new(inventory),
        })
    }

    /// Status of `url` found on `page`, whose element ids are `ids`.
    ///
    /// Checked in this order:
    /// 1. links to local development servers are always healthy
    /// 2. absolute URLs are requested if they are `http(s)` and external
    ///    validation is enabled, any other scheme is healthy
    /// 3. same-page anchors must be one of `ids`
    /// 4. everything else must resolve to an artifact of the build, unless
    ///    the page uses directory URLs
    pub(crate) async fn status(&self, url: &str, page: &Page, ids: &HashSet<String>) -> UrlStatus {
        if self.local_hosts.is_match(url) {
            return UrlStatus::HEALTHY;
        }

        if let Ok(parsed) = Url::parse(url) {
            if !self.validate_external_urls {
                return UrlStatus::HEALTHY;
            }
            return match Scheme::from(&parsed) {
                Scheme::Http | Scheme::Https => self.website.check(url).await,
                Scheme::Unsupported(scheme) => {
                    info!("Unknown url-scheme for {url} ({scheme}:)");
                    UrlStatus::HEALTHY
                }
            };
        }

        if let Some(anchor) = url.strip_prefix('#') {
            return ids.contains(anchor).into();
        }

        // Directory URLs add enough `../` indirection that the target can't
        // be located reliably
        if page.use_directory_urls() {
            return UrlStatus::HEALTHY;
        }

        self.file.check(url, page.source_path()).into()
    }

    /// Number of external URLs with a remembered status
    pub(crate) fn cached_urls(&self) -> usize {
        self.website.cache_len()
    }
}
