//! Configuration constants and the scoring scenario file

use crate::io::error::{Result, ScoreError};
use crate::scoring::variant::FilenameTransform;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// Default values for configurable parameters
/// Fixed seed for reproducible shuffling and perturbation
pub const DEFAULT_SEED: u64 = 42;

/// Default square edge length images are resized to during preparation
pub const DEFAULT_IMAGE_SIZE: u32 = 100;

/// Scenario tag of the unperturbed pass
pub const BASELINE_SCENARIO: &str = "resnet";

/// Suffix of original source images
pub const SOURCE_SUFFIX: &str = ".jpg";
/// Replacement suffix of the random-pixel variant
pub const RANDOM_VARIANT_SUFFIX: &str = "_rand.png";
/// Replacement suffix of the seam variant
pub const SEAM_VARIANT_SUFFIX: &str = "_seam.png";

/// Severity levels, in percent, of the default scenario set
pub const DEFAULT_SEVERITIES: [u32; 5] = [5, 10, 15, 20, 25];
/// Prefix of default scenario names (`seam05`, `seam10`, ...)
pub const SCENARIO_PREFIX: &str = "seam";

// Output settings
/// Report file written by a scoring run
pub const DEFAULT_REPORT_FILE: &str = "myOutFile.txt";
/// Category map consulted for class descriptions
pub const DEFAULT_CATEGORY_MAP: &str = "map_clsloc.txt";
/// Feature tensor artifact written by preparation
pub const FEATURES_FILE: &str = "features.bin";
/// Label vector artifact written by preparation
pub const LABELS_FILE: &str = "labels.bin";
/// Model written by fitting
pub const DEFAULT_MODEL_FILE: &str = "centroids.bin";

/// Number of shuffled labels echoed after preparation
pub const SHUFFLE_PREVIEW: usize = 10;
/// Number of ranked entries shown by single-image prediction
pub const PREDICT_TOP_K: usize = 3;

// Energy of border pixels, 3 * 255^2
/// Energy assigned to pixels on the image border
pub const EDGE_ENERGY: u32 = 195_075;
/// Mask applied to neighbour-derived seam replacement channels
pub const SEAM_MASK: u32 = 0xC5;

/// Softmax temperature applied to centroid distances
pub const CENTROID_TEMPERATURE: f32 = 0.01;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Named perturbation level and the directory holding its variant images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Tag written in the report
    pub name: String,
    /// Directory containing the variant images
    pub directory: PathBuf,
}

/// Ordered scenario set and variant naming rule for a scoring run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Tag of the unperturbed pass
    #[serde(default = "default_baseline")]
    pub baseline: String,
    /// Rule mapping an original file name to its variant file name
    #[serde(default)]
    pub variant: FilenameTransform,
    /// Scenarios in report order
    pub scenarios: Vec<Scenario>,
}

fn default_baseline() -> String {
    BASELINE_SCENARIO.to_string()
}

impl ScoringConfig {
    /// Default scenario set: `seam05`..`seam25` at sibling directories `<images>_05`..`<images>_25`
    pub fn default_for(images_dir: &Path) -> Self {
        let base = images_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let parent = images_dir.parent().unwrap_or_else(|| Path::new(""));

        let scenarios = DEFAULT_SEVERITIES
            .iter()
            .map(|severity| Scenario {
                name: format!("{SCENARIO_PREFIX}{severity:02}"),
                directory: parent.join(format!("{base}_{severity:02}")),
            })
            .collect();

        Self {
            baseline: default_baseline(),
            variant: FilenameTransform::default(),
            scenarios,
        }
    }

    /// Load a configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for this
    /// structure, or fails validation
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoreError::FileSystem {
            path: path.to_path_buf(),
            operation: "read configuration",
            source: e,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Parse a configuration from TOML text; `origin` is used in error messages
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure or
    /// fails validation
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ScoreError::Configuration {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Check scenario names are non-empty, unique and distinct from the baseline
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first violation found
    pub fn validate(&self, origin: &Path) -> Result<()> {
        let invalid = |reason: String| ScoreError::Configuration {
            path: origin.to_path_buf(),
            reason,
        };

        if self.baseline.is_empty() || self.baseline.contains(',') {
            return Err(invalid(format!("invalid baseline tag '{}'", self.baseline)));
        }
        if self.variant.find.is_empty() {
            return Err(invalid("variant rule must have a non-empty 'find'".to_string()));
        }

        let mut seen = HashSet::new();
        seen.insert(self.baseline.as_str());
        for scenario in &self.scenarios {
            if scenario.name.is_empty() || scenario.name.contains(',') {
                return Err(invalid(format!("invalid scenario name '{}'", scenario.name)));
            }
            if !seen.insert(scenario.name.as_str()) {
                return Err(invalid(format!("duplicate scenario '{}'", scenario.name)));
            }
        }
        Ok(())
    }

    /// All report tags in emission order, baseline first
    pub fn scenario_names(&self) -> Vec<String> {
        std::iter::once(self.baseline.clone())
            .chain(self.scenarios.iter().map(|s| s.name.clone()))
            .collect()
    }
}
