use crate::desktop::DesktopError;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for errors that end the whole run.
pub type RunResult<T> = Result<T, RunError>;

/// Run-fatal errors. Per-item launch failures are reported as
/// `LaunchOutcome::Failed` instead and never reach this type.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Icon selection aborted: no anchor can be established")]
    SelectionAborted,

    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cannot create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Desktop unavailable: {source}")]
    Desktop {
        #[from]
        source: DesktopError,
    },
}
