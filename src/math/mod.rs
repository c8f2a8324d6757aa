//! Mathematical utilities shared by classifiers and summaries

/// Probability distributions and averaging helpers
pub mod probability;
