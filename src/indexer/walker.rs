use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::IndexerConfig;

/// Walks the filesystem respecting .gitignore and skipping build/dependency trees
pub struct Walker {
    root: PathBuf,
    ignore_patterns: HashSet<String>,
    follow_links: bool,
}

impl Walker {
    /// Create a new Walker with the given root directory and configuration
    pub fn new(root: PathBuf, config: &IndexerConfig) -> Self {
        Self {
            root,
            ignore_patterns: config.ignore_patterns.iter().cloned().collect(),
            follow_links: config.follow_links,
        }
    }

    /// Walk the directory tree and return an iterator of file paths
    ///
    /// This respects:
    /// - .gitignore files
    /// - Directory names listed in `ignore_patterns` (pruned, never descended)
    pub fn walk(&self) -> impl Iterator<Item = PathBuf> {
        let mut builder = WalkBuilder::new(&self.root);

        builder.git_ignore(true);
        builder.git_global(true);
        builder.git_exclude(true);
        builder.hidden(true);
        builder.follow_links(self.follow_links);

        let ignore_patterns = self.ignore_patterns.clone();
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            !(is_dir && entry.depth() > 0 && is_ignored(entry.path(), &ignore_patterns))
        });

        builder
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|entry| entry.into_path())
    }

    /// Collect all walkable files into a Vec
    pub fn collect_files(&self) -> Vec<PathBuf> {
        self.walk().collect()
    }
}

fn is_ignored(path: &Path, patterns: &HashSet<String>) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| patterns.contains(name))
        .unwrap_or(false)
}
