/// Command-line surface and command dispatch
pub mod cli;
/// Default constants and the scoring configuration file
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Image decoding, resizing and PNG export
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Progress bars for batch passes
pub mod progress;
/// Scoring report writer
pub mod report;
