use std::fs;
use std::path::PathBuf;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A single entry produced by a directory listing.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Path relative to the store root, `/`-separated.
    pub path: String,
}

/// Filesystem accessor rooted at the documentation checkout.
///
/// All paths handed to [`list`](ContentStore::list) and
/// [`read`](ContentStore::read) are relative to that root. Failures never
/// escape as errors: listings degrade to empty and reads to a sentinel
/// string, since the callers speak a text-only protocol.
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List the entries of a directory.
    ///
    /// Returns an empty vec if the directory is missing or unreadable.
    pub fn list(&self, rel: &str) -> Vec<DirEntry> {
        let full = self.root.join(rel);
        tracing::debug!("listing directory {:?}", full);

        let read_dir = match fs::read_dir(&full) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::error!("failed to list directory {:?}: {}", full, e);
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for item in read_dir.filter_map(|e| e.ok()) {
            let name = item.file_name().to_string_lossy().into_owned();
            let kind = match item.file_type() {
                Ok(t) if t.is_dir() => EntryKind::Dir,
                Ok(_) => EntryKind::File,
                Err(e) => {
                    tracing::warn!("skipping entry {:?}: {}", item.path(), e);
                    continue;
                }
            };
            let path = if rel.is_empty() {
                name.clone()
            } else {
                format!("{rel}/{name}")
            };
            entries.push(DirEntry { name, kind, path });
        }

        entries
    }

    /// Read a file as text.
    ///
    /// A missing or unreadable file yields an `"Error:"` sentinel string
    /// instead of an error.
    pub fn read(&self, rel: &str) -> String {
        let full = self.root.join(rel);
        tracing::debug!("reading file {:?}", full);

        if !full.exists() {
            tracing::error!("file does not exist: {:?}", full);
            return format!("Error: File does not exist: {rel}");
        }

        match fs::read_to_string(&full) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("failed to read {:?}: {}", full, e);
                format!("Error: Failed to read file content ({e})")
            }
        }
    }
}
