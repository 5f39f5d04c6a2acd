//! Errors in the library.
use std::path::PathBuf;
use thiserror::Error;

/// Errors in the library.
///
/// Every error raised while constructing a [`RunContext`](crate::RunContext) is fatal:
/// there is no partially usable run.
#[derive(Error, Debug)]
pub enum MlgError {
    /// A dotted parameter path does not resolve against the configuration.
    #[error("Parameter path '{path}' does not resolve: {reason}")]
    ConfigPathError {
        /// The dotted path as given.
        path: String,
        /// What was wrong at the failing segment.
        reason: String,
    },

    /// The run directory already exists.
    #[error("Run directory already exists: {0:?}")]
    DirectoryCollision(PathBuf),

    /// A directory of the run layout could not be created.
    #[error("Failed to create directory {path:?}: {source}")]
    DirectoryCreateError {
        /// The directory.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be converted to or written as structured text.
    #[error("Failed to serialize configuration: {source}")]
    SerializationError {
        /// Destination file, if the failure happened while writing.
        path: Option<PathBuf>,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A logger sink or a metric recorder could not open its target.
    #[error("Failed to attach sink at {path:?}: {source}")]
    SinkAttachError {
        /// Target of the sink.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Another logger is already registered for the `log` facade.
    #[error("Failed to install global logger: {0}")]
    GlobalLoggerError(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}

impl MlgError {
    pub(crate) fn config_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigPathError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn sink_attach(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SinkAttachError {
            path: path.into(),
            source,
        }
    }
}
