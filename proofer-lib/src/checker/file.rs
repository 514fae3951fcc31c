use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use dashmap::DashMap;
use log::warn;

use crate::{
    Artifact, Inventory,
    extract::extract_markdown_anchors,
    utils::path::{resolve, split_fragment},
};

/// Resolves local references against the artifacts of the build.
///
/// Anchors of a target page are derived from its Markdown source once and
/// then kept for the rest of the build.
#[derive(Debug)]
pub(crate) struct FileChecker {
    inventory: Arc<Inventory>,
    /// Anchors per source path of the target artifact
    anchors: DashMap<PathBuf, HashSet<String>>,
}

impl FileChecker {
    pub(crate) fn new(inventory: Arc<Inventory>) -> Self {
        Self {
            inventory,
            anchors: DashMap::new(),
        }
    }

    /// Whether `url`, found on the page rendered from `source_path`, points
    /// to an artifact of the build and, if it has an anchor, to an anchor
    /// defined in that artifact.
    pub(crate) fn check(&self, url: &str, source_path: &Path) -> bool {
        let (path, anchor) = split_fragment(url);
        if path.is_empty() {
            // Nothing to resolve, same-page anchors are handled by the caller
            return true;
        }

        let Some(artifact) = self.find_artifact(path, source_path) else {
            warn!("Unable to locate source file for: {url}");
            return false;
        };

        match anchor {
            None => true,
            Some(anchor) => self.contains_anchor(artifact, anchor),
        }
    }

    fn find_artifact(&self, path: &str, source_path: &Path) -> Option<&Artifact> {
        let resolved = resolve(&self.inventory.base_dir(source_path), path);
        self.inventory
            .get(&resolved)
            .or_else(|| self.inventory.get(&resolved.join("index.html")))
    }

    /// Artifacts without Markdown source, like images, have no anchors.
    fn contains_anchor(&self, artifact: &Artifact, anchor: &str) -> bool {
        let Some(markdown) = artifact.source_text() else {
            return false;
        };
        self.anchors
            .entry(artifact.source_path().to_path_buf())
            .or_insert_with(|| extract_markdown_anchors(markdown))
            .contains(anchor)
    }
}
