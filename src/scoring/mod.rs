/// Category map file lookups
pub mod category_map;
/// Nearest-centroid classifier
pub mod centroid;
/// Classifier trait and ranked predictions
pub mod classifier;
/// Batch scoring of images and their variants
pub mod scorer;
/// Report aggregation into per-scenario means
pub mod summary;
/// Variant filename derivation
pub mod variant;
