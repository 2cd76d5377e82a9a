//! Input file discovery
//!
//! Walks the data directory recursively and yields the files to import in a
//! stable order: entries are visited sorted by file name at every level.

use crate::domain::{CosmosCsvError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds input files under a root directory
#[derive(Debug, Clone)]
pub struct CsvLocator {
    root: PathBuf,
    extensions: Vec<String>,
}

impl CsvLocator {
    /// Locator for `.csv` files under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["csv".to_string()],
        }
    }

    /// Replace the extension filter
    ///
    /// Extensions match case-insensitively, with or without a leading dot.
    /// An empty list accepts every regular file.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Root directory being scanned
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily enumerate matching files
    ///
    /// # Errors
    ///
    /// Fails up front when the root is missing or not a directory. Entries
    /// that cannot be read while walking are yielded as errors.
    pub fn locate(&self) -> Result<impl Iterator<Item = Result<PathBuf>> + '_> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            CosmosCsvError::Io(format!(
                "data directory {} is not accessible: {e}",
                self.root.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(CosmosCsvError::Io(format!(
                "data directory {} is not a directory",
                self.root.display()
            )));
        }

        tracing::debug!(
            root = %self.root.display(),
            extensions = ?self.extensions,
            "Scanning for input files"
        );

        Ok(WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() && self.matches(entry.path()) => {
                    Some(Ok(entry.into_path()))
                }
                Ok(_) => None,
                Err(e) => Some(Err(e.into())),
            }))
    }

    fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}
