//! Nearest-centroid classifier fitted from prepared artifacts
//!
//! Each category is summarised by the mean of its normalised samples. An image
//! is scored by the softmax of its negative mean squared distance to every
//! centroid, so the ranking always covers every category.

use crate::dataset::artifact::{Dataset, load_bincode, save_bincode};
use crate::io::configuration::CENTROID_TEMPERATURE;
use crate::io::error::{Result, ScoreError};
use crate::io::image::{ColorMode, load_image, to_array};
use crate::math::probability::softmax;
use crate::scoring::classifier::{Classifier, Prediction, Ranking};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-category mean feature vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidClassifier {
    categories: Vec<String>,
    image_size: u32,
    mode: ColorMode,
    /// One row per category, features scaled to `[0, 1]`
    centroids: Array2<f32>,
    temperature: f32,
}

impl CentroidClassifier {
    /// Average the samples of each category
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty, its images are not square, or
    /// a category has no samples
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        let features = &dataset.features.features;
        let (count, height, width, channels) = features.dim();
        if count == 0 {
            return Err(ScoreError::Classifier {
                reason: "cannot fit on an empty dataset".to_string(),
            });
        }
        if height != width {
            return Err(ScoreError::Classifier {
                reason: format!("samples must be square, got {height}x{width}"),
            });
        }

        let categories = dataset.labels.categories.clone();
        let dims = height * width * channels;
        let mut sums = Array2::<f32>::zeros((categories.len(), dims));
        let mut counts = vec![0_usize; categories.len()];

        for (sample, &label) in features.outer_iter().zip(dataset.labels.labels.iter()) {
            let label = label as usize;
            let mut row = sums.row_mut(label);
            for (acc, &pixel) in row.iter_mut().zip(sample.iter()) {
                *acc += f32::from(pixel) / 255.0;
            }
            if let Some(slot) = counts.get_mut(label) {
                *slot += 1;
            }
        }

        for ((label, mut row), &n) in sums.outer_iter_mut().enumerate().zip(&counts) {
            if n == 0 {
                return Err(ScoreError::Classifier {
                    reason: format!(
                        "category '{}' has no samples",
                        categories.get(label).map_or("?", String::as_str)
                    ),
                });
            }
            row /= n as f32;
        }

        Ok(Self {
            categories,
            image_size: height as u32,
            mode: dataset.features.mode,
            centroids: sums,
            temperature: CENTROID_TEMPERATURE,
        })
    }

    /// Category names in label order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Edge length images are resized to before scoring
    pub const fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Rank categories for an already flattened, normalised feature vector
    ///
    /// # Errors
    ///
    /// Returns an error if the vector length does not match the centroids
    pub fn rank_features(&self, features: ArrayView1<'_, f32>) -> Result<Ranking> {
        if features.len() != self.centroids.len_of(Axis(1)) {
            return Err(ScoreError::Classifier {
                reason: format!(
                    "expected {} features, got {}",
                    self.centroids.len_of(Axis(1)),
                    features.len()
                ),
            });
        }

        let logits: Vec<f32> = self
            .centroids
            .outer_iter()
            .map(|centroid| {
                let diff = &centroid - &features;
                -diff.mapv(|d| d * d).mean().unwrap_or(0.0) / self.temperature
            })
            .collect();

        let predictions = self
            .categories
            .iter()
            .zip(softmax(&logits))
            .map(|(name, p)| Prediction::new(name.clone(), p))
            .collect();
        Ok(Ranking::new(predictions))
    }

    /// Write the model with bincode
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        save_bincode(self, path)
    }

    /// Read a model written by [`CentroidClassifier::save`]
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or corrupt
    pub fn load(path: &Path) -> Result<Self> {
        load_bincode(path)
    }
}

impl Classifier for CentroidClassifier {
    fn predict(&self, path: &Path) -> Result<Ranking> {
        let img = load_image(path)?;
        let pixels = to_array(&img, self.image_size, self.mode);
        let features: Array1<f32> = pixels.iter().map(|&p| f32::from(p) / 255.0).collect();
        self.rank_features(features.view())
    }
}
