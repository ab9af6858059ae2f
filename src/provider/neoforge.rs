use std::path::PathBuf;

use anyhow::Result;

use crate::document::{PreviewExtractor, StructureRenderer};
use crate::provider::DocProvider;
use crate::repo::RepoMirror;
use crate::store::{ContentStore, EntryKind};

/// Root directory of versioned documentation inside the checkout.
const VERSIONED_DOCS: &str = "versioned_docs";

/// Version directories are named like `version-1.20`.
const VERSION_PREFIX: &str = "version-";

const SYNC_FAILED: &str = "Error: failed to bring the documentation repository up to date";

/// Provider for the Neoforge documentation repository.
///
/// Composes the git mirror with a content store rooted at its checkout.
/// Each operation refreshes the mirror first (a no-op inside the staleness
/// window), then reads straight from the filesystem; nothing is cached.
pub struct NeoforgeProvider {
    mirror: RepoMirror,
    store: ContentStore,
    extractor: PreviewExtractor,
}

impl NeoforgeProvider {
    /// Create the provider and attempt an initial sync.
    ///
    /// A failed initial sync is logged but not fatal: the next operation
    /// retries, and callers get a textual error until one succeeds.
    pub fn new(repo_url: &str, branch: &str, repo_dir: impl Into<PathBuf>) -> Result<Self> {
        let mirror = RepoMirror::new(repo_url, branch, repo_dir)?;
        let store = ContentStore::new(mirror.checkout_path());

        if !mirror.ensure_fresh() {
            tracing::warn!("initial repository sync failed, operations will retry");
        }

        Ok(Self {
            mirror,
            store,
            extractor: PreviewExtractor::new(),
        })
    }

    fn version_root(version: &str) -> String {
        format!("{VERSIONED_DOCS}/{version}")
    }

    /// Append the markdown extension when the caller left it off.
    fn normalize(file_path: &str) -> String {
        if file_path.ends_with(".md") {
            file_path.to_string()
        } else {
            format!("{file_path}.md")
        }
    }
}

impl DocProvider for NeoforgeProvider {
    fn get_versions(&self) -> String {
        if !self.mirror.ensure_fresh() {
            return SYNC_FAILED.to_string();
        }

        let mut versions: Vec<String> = self
            .store
            .list(VERSIONED_DOCS)
            .into_iter()
            .filter(|e| e.kind == EntryKind::Dir && e.name.starts_with(VERSION_PREFIX))
            .map(|e| e.name)
            .collect();

        if versions.is_empty() {
            return "No versions found in the Neoforge documentation repository.".to_string();
        }

        versions.sort();
        versions.join("\n")
    }

    fn get_structure(&self, version: &str) -> String {
        if !self.mirror.ensure_fresh() {
            return SYNC_FAILED.to_string();
        }

        let structure = StructureRenderer::new(&self.store).render(&Self::version_root(version));
        if structure.is_empty() {
            return format!("No structure found for version: {version}");
        }

        structure
    }

    fn get_preview(&self, version: &str, file_path: &str) -> String {
        if !self.mirror.ensure_fresh() {
            return SYNC_FAILED.to_string();
        }

        let rel = format!("{}/{}", Self::version_root(version), Self::normalize(file_path));
        let content = self.store.read(&rel);
        // Read sentinels have no blank lines, so they pass through intact.
        self.extractor.preview(&content)
    }

    fn get_full_content(&self, version: &str, file_path: &str) -> String {
        if !self.mirror.ensure_fresh() {
            return SYNC_FAILED.to_string();
        }

        let rel = format!("{}/{}", Self::version_root(version), Self::normalize(file_path));
        self.store.read(&rel)
    }
}
