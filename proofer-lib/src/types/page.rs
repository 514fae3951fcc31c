use std::path::{Path, PathBuf};

/// A rendered page handed over by the rendering pipeline.
///
/// `output` is the final HTML including the theme's template, `content` only
/// the HTML rendered from the page's own source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    source_path: PathBuf,
    output: String,
    content: Option<String>,
    use_directory_urls: bool,
}

impl Page {
    /// Create a page from its source path and its final HTML
    #[must_use]
    pub fn new(source_path: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            output: output.into(),
            content: None,
            use_directory_urls: false,
        }
    }

    /// Attach the HTML of the page body, without the template
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Whether the site is built with directory-style URLs
    /// (`foo/` instead of `foo.html`)
    #[must_use]
    pub const fn with_directory_urls(mut self, use_directory_urls: bool) -> Self {
        self.use_directory_urls = use_directory_urls;
        self
    }

    /// Path of the page in the input tree
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The HTML to scan.
    ///
    /// Pages without separate body content are always scanned in full.
    #[must_use]
    pub fn html(&self, include_template: bool) -> &str {
        match &self.content {
            Some(content) if !include_template => content,
            _ => &self.output,
        }
    }

    /// Whether the site is built with directory-style URLs
    #[must_use]
    pub const fn use_directory_urls(&self) -> bool {
        self.use_directory_urls
    }
}
