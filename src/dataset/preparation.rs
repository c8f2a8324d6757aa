//! Sample preparation: decode, resize and label every file of every category

use crate::dataset::category::CategoryIndex;
use crate::io::error::{Result, SkipKind, file_system, invalid_parameter};
use crate::io::image::{ColorMode, load_resized};
use crate::io::progress::ProgressManager;
use ndarray::{Array1, Array3, Array4, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One resized image with its category label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Pixels as height x width x channel
    pub pixels: Array3<u8>,
    /// Category label
    pub label: usize,
}

/// Per-kind counts of files that could not be used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipSummary {
    /// Files that could not be opened or read
    pub io: usize,
    /// Files that were read but did not decode
    pub decode: usize,
    /// Any other failure
    pub other: usize,
}

impl SkipSummary {
    /// Count one failure
    pub const fn record(&mut self, kind: SkipKind) {
        match kind {
            SkipKind::Io => self.io += 1,
            SkipKind::Decode => self.decode += 1,
            SkipKind::Other => self.other += 1,
        }
    }

    /// Total skipped files
    pub const fn total(&self) -> usize {
        self.io + self.decode + self.other
    }
}

/// Samples gathered from a category tree
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    /// Category index the labels refer to
    pub categories: CategoryIndex,
    /// Samples, in discovery order until shuffled
    pub samples: Vec<Sample>,
    /// Files that were skipped
    pub skipped: SkipSummary,
    /// Edge length of every sample
    pub image_size: u32,
    /// Channel layout of every sample
    pub mode: ColorMode,
}

impl PreparedBatch {
    /// Shuffle samples reproducibly
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.samples.shuffle(&mut rng);
    }

    /// Stack samples into a `N x H x W x C` feature tensor and a parallel label vector
    ///
    /// # Errors
    ///
    /// Returns an error if samples disagree in shape
    pub fn to_arrays(&self) -> Result<(Array4<u8>, Array1<u32>)> {
        let side = self.image_size as usize;
        let channels = self.mode.channels();
        let mut features = Array4::zeros((self.samples.len(), side, side, channels));

        for (mut slot, sample) in features.axis_iter_mut(Axis(0)).zip(&self.samples) {
            if sample.pixels.dim() != (side, side, channels) {
                return Err(invalid_parameter(
                    "sample",
                    &format!("{:?}", sample.pixels.dim()),
                    &format!("expected shape {side}x{side}x{channels}"),
                ));
            }
            slot.assign(&sample.pixels);
        }

        let labels = self.samples.iter().map(|s| s.label as u32).collect();
        Ok((features, labels))
    }
}

/// Walks a category tree and turns every readable image into a [`Sample`]
pub struct DatasetBuilder {
    image_size: u32,
    mode: ColorMode,
}

impl DatasetBuilder {
    /// Create a builder resizing to `image_size x image_size`
    ///
    /// # Errors
    ///
    /// Returns an error if `image_size` is zero
    pub fn new(image_size: u32, mode: ColorMode) -> Result<Self> {
        if image_size == 0 {
            return Err(invalid_parameter(
                "image_size",
                &image_size,
                &"must be positive",
            ));
        }
        Ok(Self { image_size, mode })
    }

    /// Files of one category folder, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be listed
    pub fn category_files(root: &Path, category: &str) -> Result<Vec<PathBuf>> {
        let dir = root.join(category);
        let entries = std::fs::read_dir(&dir).map_err(file_system(&dir, "list images"))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(file_system(&dir, "list images"))?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Prepare every file under every category of `root`
    ///
    /// Files that fail to read or decode are counted in the skip summary and
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a category folder cannot be listed
    pub fn build(
        &self,
        root: &Path,
        categories: CategoryIndex,
        progress: &mut ProgressManager,
    ) -> Result<PreparedBatch> {
        let mut per_category = Vec::with_capacity(categories.len());
        for (label, name) in categories.iter() {
            per_category.push((label, Self::category_files(root, name)?));
        }

        let total: usize = per_category.iter().map(|(_, files)| files.len()).sum();
        progress.initialize("prepare", total);

        let mut samples = Vec::with_capacity(total);
        let mut skipped = SkipSummary::default();

        for (label, files) in per_category {
            for path in files {
                progress.start_file(&path);
                match load_resized(&path, self.image_size, self.mode) {
                    Ok(pixels) => samples.push(Sample { pixels, label }),
                    Err(e) => {
                        debug!("skipping {}: {e}", path.display());
                        skipped.record(e.skip_kind());
                    }
                }
                progress.complete_file();
            }
        }
        progress.finish();

        Ok(PreparedBatch {
            categories,
            samples,
            skipped,
            image_size: self.image_size,
            mode: self.mode,
        })
    }
}
