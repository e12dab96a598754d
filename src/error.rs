//! Error types for labeling session operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the labeling session and its components.
///
/// None of these are fatal: every variant leaves the session in a
/// well-defined, unchanged-or-rolled-back state and the operation may be
/// retried after the caller fixes the input.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Commit preconditions unmet (missing image or empty label).
    #[error("missing required input: {}", missing.join(", "))]
    Validation {
        /// Names of the missing inputs.
        missing: Vec<String>,
    },

    /// Storage collaborator failed while persisting or copying artifacts.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    /// Compositing collaborator failed while stitching the current pair.
    #[error("compositing failure: {0}")]
    Composite(#[from] CompositeError),

    /// Undo requested with an empty commit history.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Index outside the valid cursor range.
    #[error("index {index} out of range (bound {bound})")]
    OutOfRange {
        /// The requested index
        index: usize,
        /// The exclusive upper bound at the time of the request
        bound: usize,
    },

    /// Caller supplied an invalid value (e.g. counter reset below 1).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Every pair has been committed; nothing left to commit.
    #[error("sequence complete, no further pairs to commit")]
    SequenceComplete,
}

impl SessionError {
    /// Create a validation error from a list of missing input names.
    pub fn validation(missing: &[&str]) -> Self {
        Self::Validation {
            missing: missing.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Create an invalid argument error with a message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether this error came from a persistence collaborator.
    /// Persistence failures consume no output id and may be retried as-is.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Composite(_))
    }
}

/// Errors from the artifact storage collaborator.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source file does not exist
    #[error("source file not found: {path:?}")]
    NotFound {
        /// Path that was expected to exist
        path: PathBuf,
    },
}

/// Errors from the image compositing collaborator.
#[derive(Error, Debug)]
pub enum CompositeError {
    /// Image decoding or encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error while preparing the output location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source images have different heights and cannot be stitched
    #[error("image heights differ: left is {left}px, right is {right}px")]
    DimensionMismatch {
        /// Height of the left image in pixels
        left: u32,
        /// Height of the right image in pixels
        right: u32,
    },

    /// Source image does not exist
    #[error("image not found: {path:?}")]
    NotFound {
        /// Path that was expected to exist
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_missing_fields() {
        let err = SessionError::validation(&["left image", "label"]);
        assert_eq!(err.to_string(), "missing required input: left image, label");
    }

    #[test]
    fn test_persistence_classification() {
        let io = std::io::Error::other("disk full");
        assert!(SessionError::Storage(StorageError::Io(io)).is_persistence());
        assert!(
            SessionError::Composite(CompositeError::DimensionMismatch { left: 10, right: 20 })
                .is_persistence()
        );
        assert!(!SessionError::NothingToUndo.is_persistence());
        assert!(!SessionError::validation(&["label"]).is_persistence());
    }
}
