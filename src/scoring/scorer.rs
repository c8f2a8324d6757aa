//! Batch scoring of original images and their perturbed variants

use crate::dataset::preparation::SkipSummary;
use crate::io::configuration::ScoringConfig;
use crate::io::error::{Result, ScoreError};
use crate::io::progress::ProgressManager;
use crate::scoring::classifier::Classifier;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One scored line of a report
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    /// Scenario tag
    pub scenario: String,
    /// Class identifier of the original top-1 prediction
    pub class_id: String,
    /// Probability of that class under this scenario
    pub probability: f32,
}

/// Report lines for one source image: baseline first, then scenarios in order
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGroup {
    /// Source file name
    pub file_name: String,
    /// Baseline record followed by one record per scenario
    pub records: Vec<PredictionRecord>,
}

/// Outcome of scoring a directory
#[derive(Debug, Clone, Default)]
pub struct ScoreRun {
    /// Complete groups ordered by file name
    pub groups: Vec<ImageGroup>,
    /// Images skipped because any of their passes failed
    pub skipped: SkipSummary,
}

/// Scores every source image of a directory under the configured scenarios
///
/// Variant images are looked up in each scenario directory by the configured
/// file name rule and scored for the class the original image ranked first,
/// not for their own top class. A failure on any pass drops the whole image
/// so every emitted group is complete.
pub struct BatchScorer<'a, C: Classifier> {
    classifier: C,
    config: &'a ScoringConfig,
}

impl<'a, C: Classifier> BatchScorer<'a, C> {
    /// Create a scorer around a classifier capability
    pub const fn new(classifier: C, config: &'a ScoringConfig) -> Self {
        Self { classifier, config }
    }

    /// Source images of `images_dir` matched by the variant rule, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed
    pub fn source_files(&self, images_dir: &Path) -> Result<Vec<PathBuf>> {
        self.config.variant.source_files(images_dir)
    }

    /// Score one source image and all its variants
    ///
    /// # Errors
    ///
    /// Returns the first failure among the baseline and scenario passes
    pub fn score_image(&self, path: &Path) -> Result<ImageGroup> {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let ranking = self.classifier.predict(path)?;
        let top = ranking.top().ok_or_else(|| ScoreError::Classifier {
            reason: format!("empty ranking for '{}'", path.display()),
        })?;

        let mut records = Vec::with_capacity(self.config.scenarios.len() + 1);
        records.push(PredictionRecord {
            scenario: self.config.baseline.clone(),
            class_id: top.class_id.clone(),
            probability: top.probability,
        });

        let variant_name = self.config.variant.apply(&file_name);
        for scenario in &self.config.scenarios {
            let variant_path = scenario.directory.join(&variant_name);
            let variant_ranking = self.classifier.predict(&variant_path)?;
            let probability = variant_ranking
                .probability_of(&top.class_id)
                .ok_or_else(|| ScoreError::ClassNotRanked {
                    class_id: top.class_id.clone(),
                    path: variant_path.clone(),
                })?;
            records.push(PredictionRecord {
                scenario: scenario.name.clone(),
                class_id: top.class_id.clone(),
                probability,
            });
        }

        Ok(ImageGroup { file_name, records })
    }

    /// Score every source image of `images_dir`
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory cannot be listed; per-image
    /// failures are logged and counted
    pub fn score_directory(
        &self,
        images_dir: &Path,
        progress: &mut ProgressManager,
    ) -> Result<ScoreRun> {
        let files = self.source_files(images_dir)?;
        info!(
            "scoring {} images under {} scenario(s)",
            files.len(),
            self.config.scenarios.len()
        );
        progress.initialize("score", files.len());

        let mut run = ScoreRun::default();
        for path in &files {
            progress.start_file(path);
            match self.score_image(path) {
                Ok(group) => {
                    debug!("scored {}", group.file_name);
                    run.groups.push(group);
                }
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    run.skipped.record(e.skip_kind());
                }
            }
            progress.complete_file();
        }
        progress.finish();

        Ok(run)
    }
}
