//! Result and error types for linecov.

use thiserror::Error;

/// Result type for linecov operations
pub type LinecovResult<T> = Result<T, LinecovError>;

/// Errors that can occur while loading coverage data or writing reports
#[derive(Debug, Error)]
pub enum LinecovError {
    /// The coverage export could not be interpreted
    #[error("Invalid coverage export: {message}")]
    InvalidExport {
        /// Error message
        message: String,
    },

    /// A segment record had the wrong shape
    #[error("Invalid segment #{index} in {file}: {message}")]
    InvalidSegment {
        /// Source file the segment belongs to
        file: String,
        /// Position of the segment in the file's segment list
        index: usize,
        /// Error message
        message: String,
    },

    /// The external `llvm-cov` tool failed
    #[error("{tool} failed: {message}")]
    ToolFailed {
        /// Tool that was invoked
        tool: String,
        /// Error message (usually its stderr)
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LinecovError {
    /// Create an invalid export error
    #[must_use]
    pub fn invalid_export(message: impl Into<String>) -> Self {
        Self::InvalidExport {
            message: message.into(),
        }
    }

    /// Create a tool failure error
    #[must_use]
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
