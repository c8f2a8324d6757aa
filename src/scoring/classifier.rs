//! Classifier capability and ranked prediction lists

use crate::io::error::Result;
use std::path::Path;

/// One ranked class with its score
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Opaque class identifier
    pub class_id: String,
    /// Probability assigned to the class
    pub probability: f32,
}

impl Prediction {
    /// Create a prediction
    pub fn new(class_id: impl Into<String>, probability: f32) -> Self {
        Self {
            class_id: class_id.into(),
            probability,
        }
    }
}

/// Predictions for one image, highest probability first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ranking {
    predictions: Vec<Prediction>,
}

impl Ranking {
    /// Sort `predictions` by descending probability; ties keep their input order
    pub fn new(mut predictions: Vec<Prediction>) -> Self {
        predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Self { predictions }
    }

    /// Top-1 prediction, `None` for an empty ranking
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    /// Score of a specific class, whatever its rank
    pub fn probability_of(&self, class_id: &str) -> Option<f32> {
        self.predictions
            .iter()
            .find(|p| p.class_id == class_id)
            .map(|p| p.probability)
    }

    /// The `k` highest ranked predictions
    pub fn top_k(&self, k: usize) -> &[Prediction] {
        self.predictions
            .get(..k.min(self.predictions.len()))
            .unwrap_or(&[])
    }

    /// Number of ranked classes
    pub const fn len(&self) -> usize {
        self.predictions.len()
    }

    /// Whether no class was ranked
    pub const fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Iterate in rank order
    pub fn iter(&self) -> impl Iterator<Item = &Prediction> {
        self.predictions.iter()
    }
}

/// Something that can rank classes for an image file
///
/// Implementations perform blocking work and are never retried by callers.
pub trait Classifier {
    /// Rank every known class for the image at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if the model
    /// cannot score it
    fn predict(&self, path: &Path) -> Result<Ranking>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict(&self, path: &Path) -> Result<Ranking> {
        (**self).predict(path)
    }
}
