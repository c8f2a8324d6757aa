//! Batch image scoring against perturbed variants with aggregate statistics
//!
//! The crate prepares labelled image datasets from category folders, scores every
//! image of a directory with a pluggable classifier, re-scores seam-perturbed
//! variants of the same images for the original top class, and averages the
//! resulting reports per scenario.

#![forbid(unsafe_code)]

/// Category discovery, sample preparation and persisted dataset artifacts
pub mod dataset;
/// Input/output operations, configuration and error handling
pub mod io;
/// Probability helpers shared by classifiers and summaries
pub mod math;
/// Seam-based and random pixel perturbations of source images
pub mod perturb;
/// Classifier capability, batch scoring and report aggregation
pub mod scoring;

pub use io::error::{Result, ScoreError};
