use std::path::{Path, PathBuf};

/// Convenience result type used across mediaprep.
pub type MediaprepResult<T> = Result<T, MediaprepError>;

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum MediaprepError {
    /// Malformed caller input (threshold range, channel count, config values).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A source file the operation depends on does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The external transcoder could not be spawned or exited unsuccessfully.
    #[error("process error: {0}")]
    Process(String),

    /// The HLS manifest could not be interpreted.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediaprepError {
    /// Build a [`MediaprepError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`MediaprepError::NotFound`] value.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(path.as_ref().to_path_buf())
    }

    /// Build a [`MediaprepError::Process`] value.
    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    /// Build a [`MediaprepError::Manifest`] value.
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }

    /// Whether this error reports a missing input file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
