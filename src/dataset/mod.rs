/// Persisted feature and label artifacts
pub mod artifact;
/// Category discovery and label bookkeeping
pub mod category;
/// Decoding, resizing and labelling of category folders
pub mod preparation;
