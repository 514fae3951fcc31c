use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::{ErrorKind, RaiseErrorExcludes, Result, types::status::DEFAULT_TRANSIENT_STATUS_CODES};

/// Default timeout in seconds before a request is deemed as failed, 10.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default number of redirects before a request is deemed as failed, 5.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
/// Default number of distinct external URLs remembered per build, 1000.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;
/// Hosts of local development servers, which are never checked.
pub const DEFAULT_LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "app_server"];

/// Options recognized by the link verifier.
///
/// This can be deserialized from a TOML table (see [`Config::from_toml`]) or
/// built in code:
///
/// ```
/// use proofer_lib::Config;
///
/// let config = Config::builder()
///     .raise_error_after_finish(true)
///     .ignore_urls(vec!["https://github.com/*".to_string()])
///     .build();
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, Deserialize, TypedBuilder)]
#[serde(default, deny_unknown_fields)]
#[builder(field_defaults(default, setter(into)))]
pub struct Config {
    /// Verify links at all
    #[builder(default = true)]
    pub enabled: bool,

    /// Abort the build on the first reportable broken link
    pub raise_error: bool,

    /// Report every broken link and abort once the build is finished
    pub raise_error_after_finish: bool,

    /// Broken links which never fail the build, keyed by status code
    pub raise_error_excludes: RaiseErrorExcludes,

    /// Check `http(s)://` links against the network
    #[builder(default = true)]
    pub validate_external_urls: bool,

    /// Scan the complete rendered page including the theme's template,
    /// instead of only the page's own content
    pub validate_rendered_template: bool,

    /// Glob patterns of URLs which are skipped entirely
    pub ignore_urls: Vec<String>,

    /// Log a warning for every URL skipped through `ignore_urls`
    pub warn_on_ignored_urls: bool,

    /// Read the full response body of external URLs before releasing the
    /// connection
    #[builder(default = true)]
    pub drain_response_body: bool,

    /// Status codes which are inconclusive rather than broken
    #[builder(default = DEFAULT_TRANSIENT_STATUS_CODES.to_vec())]
    pub transient_status_codes: Vec<i32>,

    /// Hosts of local development servers which are never checked
    #[builder(default = DEFAULT_LOCAL_HOSTS.iter().map(ToString::to_string).collect())]
    pub local_hosts: Vec<String>,

    /// Response timeout per external request
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Maximum number of redirects per external request
    #[builder(default = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Maximum number of external URLs whose status is remembered
    #[builder(default = DEFAULT_MAX_CACHE_SIZE)]
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Parse a configuration from a TOML string.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid TOML, contains unknown keys
    /// or invalid glob patterns.
    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|e| ErrorKind::ReadConfig(path.to_path_buf(), e))?;
        Self::from_toml(&contents)
    }
}
