//! `proofer_lib` verifies the links and anchors of a generated documentation
//! site.
//!
//! The rendering pipeline first registers every file of the build in an
//! [`InventoryBuilder`]. Once discovery is complete the frozen [`Inventory`]
//! starts a [`Session`], which checks each rendered [`Page`]:
//!
//! ```no_run
//! use proofer_lib::{Artifact, Config, InventoryBuilder, Page, Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut builder = InventoryBuilder::default();
//!     builder.insert(Artifact::new("index.md", "index.html").with_source_text("# Welcome"));
//!     builder.insert(Artifact::new("guide.md", "guide.html").with_source_text("## Install"));
//!
//!     let config = Config::builder().raise_error_after_finish(true).build();
//!     let session = Session::new(config, builder.build())?;
//!
//!     let page = Page::new("index.md", r#"<a href="guide.html#install">Install</a>"#);
//!     session.check_page(&page).await?;
//!
//!     let summary = session.finish()?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! Links are classified as links to local development servers, absolute
//! URLs, same-page anchors or references to other files of the build.
//! Anchors in other files are looked up in the Markdown those files were
//! rendered from, see [`contains_anchor`].

mod checker;
mod filter;
mod policy;
mod session;
mod types;
mod utils;

pub mod extract;

pub use checker::website::DEFAULT_USER_AGENT;
pub use extract::{PageLinks, contains_anchor, extract_markdown_anchors, slugify};
pub use filter::{IgnoreUrls, LocalHosts};
pub use policy::RaiseMode;
pub use session::Session;
pub use types::*;
