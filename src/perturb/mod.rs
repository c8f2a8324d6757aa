//! Image perturbations used to build scenario variants
//!
//! The seam pass repeatedly finds the lowest-energy seam and overwrites it with
//! noise derived from its neighbours; the random pass changes the same number
//! of uniformly chosen pixels.

/// Dual-gradient pixel energy
pub mod energy;
/// Severity planning and paired variant generation
pub mod plan;
/// Random pixel replacement
pub mod random;
/// Seam search and replacement
pub mod seam;
