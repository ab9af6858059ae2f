use regex::Regex;

use crate::store::{ContentStore, DirEntry, EntryKind};

/// Number of paragraphs included in a file preview.
const PREVIEW_PARAGRAPHS: usize = 3;

/// Extracts titles and short paragraph previews from documentation files.
pub struct PreviewExtractor {
    paragraph_break: Regex,
}

impl PreviewExtractor {
    pub fn new() -> Self {
        Self {
            // One or more blank lines, possibly containing whitespace.
            paragraph_break: Regex::new(r"\n\s*\n").expect("valid paragraph regex"),
        }
    }

    /// Extract the title from the first line of a document.
    ///
    /// Leading `#` and space characters are stripped; an empty document
    /// falls back to the file name.
    pub fn title(&self, content: &str, fallback: &str) -> String {
        if content.is_empty() {
            return fallback.to_string();
        }
        let first_line = content.lines().next().unwrap_or(fallback);
        first_line
            .trim_start_matches(['#', ' '])
            .trim_end()
            .to_string()
    }

    /// Extract a preview: the first few paragraphs, rejoined with one blank
    /// line between them. Content without any blank-line boundary is a
    /// single paragraph, so the preview is the whole content.
    pub fn preview(&self, content: &str) -> String {
        let paragraphs: Vec<&str> = self
            .paragraph_break
            .split(content)
            .take(PREVIEW_PARAGRAPHS)
            .collect();
        paragraphs.join("\n\n")
    }
}

impl Default for PreviewExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a documentation subtree as an indented outline.
///
/// Directories come first at every level, both partitions sorted by name,
/// and every markdown file is expanded into a title line plus an indented
/// preview. Non-markdown files are dropped.
pub struct StructureRenderer<'a> {
    store: &'a ContentStore,
    extractor: PreviewExtractor,
}

impl<'a> StructureRenderer<'a> {
    pub fn new(store: &'a ContentStore) -> Self {
        Self {
            store,
            extractor: PreviewExtractor::new(),
        }
    }

    /// Render the subtree rooted at `rel`. An empty or missing directory
    /// renders as an empty string.
    pub fn render(&self, rel: &str) -> String {
        self.render_level(rel, 0)
    }

    fn render_level(&self, rel: &str, indent: usize) -> String {
        let entries = self.store.list(rel);
        if entries.is_empty() {
            return String::new();
        }

        let mut dirs: Vec<&DirEntry> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Dir)
            .collect();
        let mut files: Vec<&DirEntry> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::File && e.name.ends_with(".md"))
            .collect();
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let pad = "  ".repeat(indent);
        let deeper_pad = "  ".repeat(indent + 1);
        let mut lines = Vec::new();

        for dir in dirs {
            lines.push(format!("{pad}📁 {}", dir.name));
            let sub = self.render_level(&dir.path, indent + 1);
            if !sub.is_empty() {
                lines.push(sub);
            }
        }

        for file in files {
            let content = self.store.read(&file.path);
            let title = self.extractor.title(&content, &file.name);
            let preview = self.extractor.preview(&content);

            lines.push(format!("{pad}📄 {} - {title}", file.name));
            for line in preview.split('\n') {
                lines.push(format!("{deeper_pad}{line}"));
            }
            // Blank separator between file entries.
            lines.push(String::new());
        }

        lines.join("\n")
    }
}
