//! Error types for the walkpool framework.
//!
//! Errors fall into two groups. Run-level errors (configuration, resolution,
//! timeout) are returned to the caller of a walk. Per-file errors (read,
//! write, processor failures, panics) are caught at the task boundary and
//! only ever show up in progress counts and walk reports.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for walkpool.
#[derive(Error, Debug)]
pub enum WalkError {
    /// I/O errors that are not tied to a single walked file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid or missing configuration; raised before any file is touched.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// The file set could not be resolved; no task runs.
    #[error("Failed to resolve files under '{root}': {message}")]
    Resolution {
        /// Root directory of the failed resolution
        root: PathBuf,
        /// Detailed error message
        message: String,
    },

    /// Reading a walked file failed.
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        /// File that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing a walked file failed.
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        /// File that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The user processor returned an error for one file.
    #[error("Processor failed for '{path}': {message}")]
    Processor {
        /// File being processed
        path: PathBuf,
        /// Error reported by the processor
        message: String,
    },

    /// A task panicked while running.
    #[error("Task panicked: {message}")]
    TaskPanicked {
        /// Panic payload rendered as text
        message: String,
    },

    /// Operation timeout errors.
    #[error("Timeout: {operation}")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
    },
}

impl WalkError {
    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new resolution error for a root directory.
    pub fn resolution<P: Into<PathBuf>, S: Into<String>>(root: P, message: S) -> Self {
        Self::Resolution {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a new read error for a file.
    pub fn file_read<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a new write error for a file.
    pub fn file_write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a new processor error for a file.
    pub fn processor<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Processor {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new task panic error.
    pub fn task_panicked<S: Into<String>>(message: S) -> Self {
        Self::TaskPanicked {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Whether this error is confined to a single file.
    ///
    /// Per-file errors are absorbed by the walk engine and never abort a run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. }
                | Self::FileWrite { .. }
                | Self::Processor { .. }
                | Self::TaskPanicked { .. }
        )
    }

    /// The file this error belongs to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileRead { path, .. }
            | Self::FileWrite { path, .. }
            | Self::Processor { path, .. } => Some(path),
            Self::Resolution { root, .. } => Some(root),
            _ => None,
        }
    }
}

/// Result type alias for walkpool operations.
pub type Result<T> = std::result::Result<T, WalkError>;
