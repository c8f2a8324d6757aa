//! Persisted feature and label artifacts shared between preparation and fitting

use crate::dataset::category::CategoryIndex;
use crate::io::configuration::{FEATURES_FILE, LABELS_FILE};
use crate::io::error::{Result, ScoreError, invalid_parameter};
use crate::io::image::ColorMode;
use ndarray::{Array1, Array4};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Feature tensor artifact, `N x H x W x C`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureArtifact {
    /// Channel layout of the samples
    pub mode: ColorMode,
    /// Stacked sample pixels
    pub features: Array4<u8>,
}

/// Label vector artifact, parallel to the feature tensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelArtifact {
    /// Category names in label order
    pub categories: Vec<String>,
    /// One label per sample
    pub labels: Array1<u32>,
}

/// Both artifacts, checked for consistency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Feature tensor
    pub features: FeatureArtifact,
    /// Labels and category names
    pub labels: LabelArtifact,
}

impl Dataset {
    /// Pair artifacts after checking they describe the same samples
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Sample counts differ
    /// - A label has no category
    /// - Category names are not unique
    pub fn new(features: FeatureArtifact, labels: LabelArtifact) -> Result<Self> {
        let samples = features.features.len_of(ndarray::Axis(0));
        if samples != labels.labels.len() {
            return Err(invalid_parameter(
                "labels",
                &labels.labels.len(),
                &format!("expected {samples} labels to match the feature tensor"),
            ));
        }
        if let Some(bad) = labels
            .labels
            .iter()
            .find(|&&label| label as usize >= labels.categories.len())
        {
            return Err(invalid_parameter(
                "labels",
                bad,
                &format!("only {} categories are known", labels.categories.len()),
            ));
        }
        CategoryIndex::from_names(labels.categories.clone())?;

        Ok(Self { features, labels })
    }

    /// Category index recorded at preparation time
    ///
    /// # Errors
    ///
    /// Returns an error if category names are not unique
    pub fn category_index(&self) -> Result<CategoryIndex> {
        CategoryIndex::from_names(self.labels.categories.clone())
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.labels.len()
    }

    /// Whether the dataset holds no samples
    pub fn is_empty(&self) -> bool {
        self.labels.labels.is_empty()
    }

    /// Distinct labels that actually occur
    pub fn class_count(&self) -> usize {
        let mut seen: Vec<u32> = self.labels.labels.to_vec();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Write both artifacts into `dir`
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be created or serialized
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|e| ScoreError::FileSystem {
            path: dir.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
        save_bincode(&self.features, &dir.join(FEATURES_FILE))?;
        save_bincode(&self.labels, &dir.join(LABELS_FILE))
    }

    /// Read both artifacts from `dir`
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or corrupt, or if they disagree
    pub fn load(dir: &Path) -> Result<Self> {
        let features = load_bincode(&dir.join(FEATURES_FILE))?;
        let labels = load_bincode(&dir.join(LABELS_FILE))?;
        Self::new(features, labels)
    }
}

/// Serialize `value` to `path` with bincode
///
/// # Errors
///
/// Returns an error if the file cannot be created or the value cannot be encoded
pub fn save_bincode<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ScoreError::FileSystem {
        path: path.to_path_buf(),
        operation: "create artifact",
        source: e,
    })?;
    bincode::serialize_into(BufWriter::new(file), value).map_err(|e| ScoreError::Artifact {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Deserialize a bincode value from `path`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or does not decode
pub fn load_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| ScoreError::FileSystem {
        path: path.to_path_buf(),
        operation: "open artifact",
        source: e,
    })?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|e| ScoreError::Artifact {
        path: path.to_path_buf(),
        source: e,
    })
}
