//! Converts a severity fraction into seam counts and a matching pixel budget

use crate::io::error::{Result, invalid_parameter};
use crate::perturb::random::replace_random;
use crate::perturb::seam::SeamDoppelganger;
use image::RgbImage;
use rand::Rng;

/// Seam and pixel counts for one image at one severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerturbationPlan {
    /// Horizontal seams to replace, `round(p * height)`
    pub rows: u32,
    /// Vertical seams to replace, `round(p * width)`
    pub cols: u32,
    /// Pixels the random pass changes, `cols * width + rows * height - (cols + rows)`
    pub random_pixels: usize,
}

/// Seam-replaced and randomly replaced versions of one image
#[derive(Debug, Clone)]
pub struct PerturbedPair {
    /// Output of the seam pass
    pub seam: RgbImage,
    /// Output of the random pass
    pub random: RgbImage,
}

/// Check a severity fraction lies in `[0, 1]`
///
/// # Errors
///
/// Returns an error for values outside the range or NaN
pub fn validate_fraction(fraction: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(invalid_parameter(
            "percentage",
            &fraction,
            &"must be between 0.0 and 1.0",
        ))
    }
}

impl PerturbationPlan {
    /// Plan for an image of `width x height` at severity `fraction`
    ///
    /// # Errors
    ///
    /// Returns an error if `fraction` is outside `[0, 1]`
    pub fn new(fraction: f32, width: u32, height: u32) -> Result<Self> {
        let fraction = validate_fraction(fraction)?;
        let cols = (fraction * width as f32).round() as u32;
        let rows = (fraction * height as f32).round() as u32;

        let touched = u64::from(cols) * u64::from(width) + u64::from(rows) * u64::from(height);
        let random_pixels = touched.saturating_sub(u64::from(cols) + u64::from(rows)) as usize;

        Ok(Self {
            rows,
            cols,
            random_pixels,
        })
    }

    /// Run both passes on `img`
    ///
    /// # Errors
    ///
    /// Returns an error if the image is too small for the planned seams
    pub fn apply<R: Rng>(&self, img: &RgbImage, rng: &mut R) -> Result<PerturbedPair> {
        let mut doppelganger = SeamDoppelganger::new(img);
        doppelganger.process(self.rows, self.cols)?;

        Ok(PerturbedPair {
            seam: doppelganger.into_image(),
            random: replace_random(img, self.random_pixels, rng),
        })
    }
}
