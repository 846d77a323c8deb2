use thiserror::Error;

/// A specialized `Result` type for desktop collaborator operations.
pub type DesktopResult<T> = Result<T, DesktopError>;

/// The error type for screen capture, input simulation and window queries.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("'{program}' not found in PATH. Install it or run with --scan=<frame.png> instead.")]
    ToolNotFound { program: String },

    #[error("Failed to run '{program}': {source}")]
    SpawnFailed {
        program: String,
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Failed to decode captured frame: {source}")]
    FrameDecode {
        #[from]
        source: image::ImageError,
    },

    #[error("Failed to read frame file {path:?}: {source}")]
    FrameRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Window {id} could not be activated: {description}")]
    ActivationFailed { id: String, description: String },
}

impl DesktopError {
    /// Missing tooling cannot be fixed by retrying
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DesktopError::ToolNotFound { .. })
    }
}
