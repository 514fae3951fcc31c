#![allow(unreachable_pub)]

mod artifact;
mod config;
mod error;
mod excludes;
mod page;
mod report;
pub(crate) mod status;

pub use artifact::{Artifact, Inventory, InventoryBuilder};
pub use config::{
    Config, DEFAULT_LOCAL_HOSTS, DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_REDIRECTS,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::ErrorKind;
pub use excludes::RaiseErrorExcludes;
pub use page::Page;
pub use report::{LinkReport, PageReport, Summary};
pub use status::{DEFAULT_TRANSIENT_STATUS_CODES, StatusPolicy, UrlStatus, Verdict};

/// The proofer `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
