//! Error types for dataset preparation, scoring and perturbation

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for all scoring operations
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Image file could not be opened or read
    #[error("Failed to read image '{}': {source}", path.display())]
    ImageRead {
        /// Path to the image file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Image bytes were read but could not be decoded
    #[error("Failed to decode image '{}': {source}", path.display())]
    ImageDecode {
        /// Path to the image file
        path: PathBuf,
        /// Underlying decoding error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    #[error("Failed to export image to '{}': {source}", path.display())]
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// General file system operation failure
    #[error("File system error during {operation} on '{}': {source}", path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Scoring configuration could not be parsed or is inconsistent
    #[error("Invalid configuration '{}': {reason}", path.display())]
    Configuration {
        /// Configuration file path
        path: PathBuf,
        /// Description of the problem
        reason: String,
    },

    /// Persisted artifact could not be written or read back
    #[error("Artifact error on '{}': {source}", path.display())]
    Artifact {
        /// Artifact file path
        path: PathBuf,
        /// Underlying serialization error
        source: bincode::Error,
    },

    /// Class identifier missing from a category map
    #[error("Category '{key}' not found")]
    CategoryNotFound {
        /// The identifier that was looked up
        key: String,
    },

    /// The same category name appeared twice
    #[error("Duplicate category name '{name}'")]
    DuplicateCategory {
        /// Offending category name
        name: String,
    },

    /// A variant ranking did not contain the class of the original prediction
    #[error("Class '{class_id}' not ranked for '{}'", path.display())]
    ClassNotRanked {
        /// Class identifier that was looked up
        class_id: String,
        /// Image whose ranking was inspected
        path: PathBuf,
    },

    /// Classifier could not produce a prediction
    #[error("Classifier error: {reason}")]
    Classifier {
        /// Description of the failure
        reason: String,
    },
}

/// Coarse classification of a per-file failure, used for skip summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipKind {
    /// File could not be opened or read
    Io,
    /// File was read but is not a decodable image
    Decode,
    /// Any other per-file failure
    Other,
}

impl ScoreError {
    /// Classify this error for skip accounting
    pub const fn skip_kind(&self) -> SkipKind {
        match self {
            Self::ImageRead { .. } | Self::FileSystem { .. } => SkipKind::Io,
            Self::ImageDecode { .. } => SkipKind::Decode,
            _ => SkipKind::Other,
        }
    }
}

/// Convenience type alias for scoring results
pub type Result<T> = std::result::Result<T, ScoreError>;

impl From<std::io::Error> for ScoreError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ScoreError {
    ScoreError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a path validation error
pub fn io_error(msg: &str) -> ScoreError {
    ScoreError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}

/// Attach a path and operation to an I/O error
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> ScoreError {
    let path = path.into();
    move |source| ScoreError::FileSystem {
        path,
        operation,
        source,
    }
}
