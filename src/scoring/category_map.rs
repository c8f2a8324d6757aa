//! Category map translating opaque class identifiers to descriptions
//!
//! The file holds whitespace-delimited `id index description` records, for
//! example `n02226429 631 grasshopper`. Lines with any other token count are
//! ignored.

use crate::io::error::{Result, ScoreError};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Index and description of one class identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    /// Numeric index column
    pub index: String,
    /// Human-readable description
    pub description: String,
}

/// Lookup table from class identifier to [`CategoryEntry`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    entries: HashMap<String, CategoryEntry>,
}

impl CategoryMap {
    /// Parse map text; later duplicates of an identifier replace earlier ones
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if let &[id, index, description] = tokens.as_slice() {
                entries.insert(
                    id.to_string(),
                    CategoryEntry {
                        index: index.to_string(),
                        description: description.to_string(),
                    },
                );
            } else if !tokens.is_empty() {
                debug!("ignoring category map line {}: {line}", number + 1);
            }
        }
        Self { entries }
    }

    /// Read and parse a map file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoreError::FileSystem {
            path: path.to_path_buf(),
            operation: "read category map",
            source: e,
        })?;
        Ok(Self::parse(&content))
    }

    /// Description of a class identifier
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound` if the identifier is not mapped
    pub fn describe(&self, id: &str) -> Result<&str> {
        self.entry(id).map(|entry| entry.description.as_str())
    }

    /// Full entry of a class identifier
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound` if the identifier is not mapped
    pub fn entry(&self, id: &str) -> Result<&CategoryEntry> {
        self.entries
            .get(id)
            .ok_or_else(|| ScoreError::CategoryNotFound { key: id.to_string() })
    }

    /// Number of mapped identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
