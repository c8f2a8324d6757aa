//! Category discovery from a directory of class folders

use crate::io::error::{Result, ScoreError};
use std::collections::HashMap;
use std::path::Path;

/// Category names with their integer labels
///
/// A label is the position of the name in discovery order (0-based). The
/// index is built once per dataset and persisted alongside the labels so
/// preparation, fitting and reporting agree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryIndex {
    names: Vec<String>,
    labels: HashMap<String, usize>,
}

impl CategoryIndex {
    /// Build an index from names in label order
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCategory` if a name appears more than once
    pub fn from_names(names: Vec<String>) -> Result<Self> {
        let mut labels = HashMap::with_capacity(names.len());
        for (label, name) in names.iter().enumerate() {
            if labels.insert(name.clone(), label).is_some() {
                return Err(ScoreError::DuplicateCategory { name: name.clone() });
            }
        }
        Ok(Self { names, labels })
    }

    /// Use the immediate subdirectories of `root` as categories, in listing order
    ///
    /// Plain files directly under `root` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be listed
    pub fn discover(root: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(root).map_err(|e| ScoreError::FileSystem {
            path: root.to_path_buf(),
            operation: "list categories",
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScoreError::FileSystem {
                path: root.to_path_buf(),
                operation: "list categories",
                source: e,
            })?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Self::from_names(names)
    }

    /// Label of a category name
    pub fn label_of(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Category name of a label
    pub fn name_of(&self, label: usize) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    /// Names in label order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of categories
    pub const fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no categories
    pub const fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(label, name)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}
