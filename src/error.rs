use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems with the invocation itself, reported before any planning.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Directory is required")]
    MissingDirectory,

    #[error("Extension must not be empty")]
    EmptyExtension,

    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot read directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of the single mutation behind one planned operation.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Target file '{0}' already exists")]
    AlreadyExists(PathBuf),

    #[error("Source file '{0}' not found")]
    SourceNotFound(PathBuf),

    #[error("Target directory '{0}' does not exist")]
    TargetDirectoryNotFound(PathBuf),

    #[error("No permission to modify '{0}'")]
    NoPermission(PathBuf),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Tag error on '{path}': {message}")]
    Tag { path: PathBuf, message: String },

    #[error("No action planned for '{0}'")]
    NoAction(PathBuf),
}

impl MutationError {
    /// Maps an I/O error from touching `path` onto the matching variant.
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => MutationError::SourceNotFound(path),
            io::ErrorKind::PermissionDenied => MutationError::NoPermission(path),
            io::ErrorKind::AlreadyExists => MutationError::AlreadyExists(path),
            _ => MutationError::Io { path, source: err },
        }
    }
}
