use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::languages::LanguageRegistry;

pub struct FileWalker {
    registry: LanguageRegistry,
    respect_ignore: bool,
}

impl FileWalker {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self {
            registry,
            respect_ignore: true,
        }
    }

    /// Whether hidden and ignored files are skipped inside directories.
    pub fn respect_ignore(mut self, yes: bool) -> Self {
        self.respect_ignore = yes;
        self
    }

    /// Expands directories into the supported files beneath them. Any other
    /// path, including one that does not exist, is passed through unchanged.
    pub fn expand<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                files.extend(self.walk(path));
            } else {
                files.push(path.to_path_buf());
            }
        }
        files
    }

    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .hidden(self.respect_ignore)
            .git_ignore(self.respect_ignore)
            .git_global(self.respect_ignore)
            .git_exclude(self.respect_ignore)
            .ignore(self.respect_ignore)
            .parents(self.respect_ignore)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && self.is_supported(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e)
                }
            }
        }

        tracing::debug!("Found {} source files under {}", files.len(), root.display());
        files
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.registry.get_for_file(path).is_some()
    }
}
