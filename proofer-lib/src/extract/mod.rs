//! Everything that reads documents: rendered HTML pages on one side, the
//! Markdown sources of the build artifacts on the other.

pub(crate) mod html;
pub(crate) mod markdown;

pub use html::{PageLinks, extract_page_links};
pub use markdown::{contains_anchor, extract_markdown_anchors, slugify};
