use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::utils::path::normalize;

/// One file produced by the build.
///
/// Artifacts are handed over by the rendering pipeline. Only pages rendered
/// from markdown carry their `source_text`, which is what cross-page anchors
/// are checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    source_path: PathBuf,
    dest_path: PathBuf,
    url: Option<String>,
    source_text: Option<String>,
}

impl Artifact {
    /// Create an artifact for a file copied or rendered from `source_path`
    /// to `dest_path`
    #[must_use]
    pub fn new(source_path: impl Into<PathBuf>, dest_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            dest_path: dest_path.into(),
            url: None,
            source_text: None,
        }
    }

    /// Set the URL the artifact is served under, if it differs from its
    /// destination path
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attach the markdown the artifact was rendered from
    #[must_use]
    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = Some(source_text.into());
        self
    }

    /// Path of the artifact in the input tree
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Path of the artifact in the output tree
    #[must_use]
    pub fn dest_path(&self) -> &Path {
        &self.dest_path
    }

    /// URL of the artifact relative to the site root, if known
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Markdown source of the artifact, if it was rendered from one
    #[must_use]
    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }
}

/// Collects artifacts while the rendering pipeline discovers files.
///
/// Verification cannot start before [`InventoryBuilder::build`] froze the
/// collection: a page can link to any file of the build, including files
/// discovered after it.
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    by_destination: HashMap<PathBuf, Arc<Artifact>>,
    by_source: HashMap<PathBuf, Arc<Artifact>>,
}

impl InventoryBuilder {
    /// Add an artifact.
    ///
    /// An artifact re-emitted for the same destination or URL replaces the
    /// earlier one entirely, including the other keys it was registered
    /// under.
    pub fn insert(&mut self, artifact: Artifact) -> &mut Self {
        let artifact = Arc::new(artifact);
        let mut keys = vec![normalize(&artifact.dest_path)];
        if let Some(url) = &artifact.url {
            keys.push(normalize(Path::new(url.trim_start_matches('/'))));
        }

        let mut replaced = Vec::new();
        for key in keys {
            if let Some(previous) = self.by_destination.insert(key, Arc::clone(&artifact)) {
                replaced.push(previous);
            }
        }
        for previous in replaced {
            self.by_destination
                .retain(|_, current| !Arc::ptr_eq(current, &previous));
            if previous.source_path != artifact.source_path {
                self.by_source.remove(&normalize(&previous.source_path));
            }
        }

        self.by_source
            .insert(normalize(&artifact.source_path), artifact);
        self
    }

    /// Number of distinct lookup keys collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_destination.len()
    }

    /// Whether no artifact was added yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_destination.is_empty()
    }

    /// Freeze the collected artifacts
    #[must_use]
    pub fn build(self) -> Inventory {
        Inventory {
            by_destination: self.by_destination,
            by_source: self.by_source,
        }
    }
}

impl Extend<Artifact> for InventoryBuilder {
    fn extend<T: IntoIterator<Item = Artifact>>(&mut self, iter: T) {
        for artifact in iter {
            self.insert(artifact);
        }
    }
}

impl FromIterator<Artifact> for InventoryBuilder {
    fn from_iter<T: IntoIterator<Item = Artifact>>(iter: T) -> Self {
        let mut builder = Self::default();
        builder.extend(iter);
        builder
    }
}

/// All files of a build, keyed by their normalized destination path (and
/// URL, if different). Read-only once built.
#[derive(Debug, Default)]
pub struct Inventory {
    by_destination: HashMap<PathBuf, Arc<Artifact>>,
    by_source: HashMap<PathBuf, Arc<Artifact>>,
}

impl Inventory {
    /// Look up an artifact by its normalized destination path or URL
    #[must_use]
    pub fn get(&self, destination: &Path) -> Option<&Artifact> {
        self.by_destination.get(destination).map(AsRef::as_ref)
    }

    /// Look up an artifact by its source path
    #[must_use]
    pub fn get_by_source(&self, source_path: &Path) -> Option<&Artifact> {
        self.by_source
            .get(&normalize(source_path))
            .map(AsRef::as_ref)
    }

    /// The directory relative links of the page rendered from `source_path`
    /// are resolved against.
    ///
    /// This is the directory of the page's destination. Pages unknown to the
    /// inventory fall back to the directory of their source.
    #[must_use]
    pub fn base_dir(&self, source_path: &Path) -> PathBuf {
        let location = self
            .get_by_source(source_path)
            .map_or(source_path, Artifact::dest_path);
        location
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf)
    }

    /// Number of distinct lookup keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_destination.len()
    }

    /// Whether the build produced no files at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_destination.is_empty()
    }
}
