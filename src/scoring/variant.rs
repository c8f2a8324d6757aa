//! Variant filename derivation

use crate::io::configuration::{RANDOM_VARIANT_SUFFIX, SOURCE_SUFFIX};
use crate::io::error::{Result, file_system};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Literal substitution mapping an original file name to its variant's name
///
/// Every occurrence of `find` is replaced by `replace`; no other character
/// changes. `find` doubles as the suffix that selects source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameTransform {
    /// Text to look for, usually the source extension
    pub find: String,
    /// Replacement text, usually a suffix plus the variant extension
    pub replace: String,
}

impl Default for FilenameTransform {
    fn default() -> Self {
        Self::new(SOURCE_SUFFIX, RANDOM_VARIANT_SUFFIX)
    }
}

impl FilenameTransform {
    /// Create a transform replacing `find` with `replace`
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Derive the variant file name
    pub fn apply(&self, file_name: &str) -> String {
        file_name.replace(&self.find, &self.replace)
    }

    /// Whether `file_name` is an original source this rule applies to
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.find)
    }

    /// Source files of `dir` this rule applies to, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its entries cannot be read
    pub fn source_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(file_system(dir, "list images"))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(file_system(dir, "list images"))?.path();
            let is_source = path
                .file_name()
                .is_some_and(|name| self.matches(&name.to_string_lossy()));
            if is_source && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
